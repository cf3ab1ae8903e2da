//! CORS configuration for the gateway.

use actix_cors::Cors;

/// Build the gateway CORS middleware: any origin, read-only methods.
pub fn build_cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allowed_methods(vec!["GET", "HEAD"])
        .allowed_headers(vec![
            actix_web::http::header::ACCEPT,
            actix_web::http::header::CONTENT_TYPE,
        ])
        .max_age(3600)
}
