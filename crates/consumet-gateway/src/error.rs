use actix_web::{HttpResponse, ResponseError};

pub const DEMO_PAGE_UNAVAILABLE: &str = "Could not load the demo page. Please try again later.";

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Activation page could not be read
    #[error("demo page unavailable: {0}")]
    DemoPageUnavailable(std::io::Error),
    /// No route matched
    #[error("page not found")]
    NotFound,
    /// Handler panicked or failed unexpectedly
    #[error("internal error: {0}")]
    Internal(String),
}

/// Body of every 404 the gateway produces.
pub fn not_found_body() -> serde_json::Value {
    serde_json::json!({
        "message": "",
        "error": "page not found"
    })
}

impl ResponseError for GatewayError {
    fn error_response(&self) -> HttpResponse {
        match self {
            GatewayError::DemoPageUnavailable(e) => {
                tracing::error!("Failed to read demo page: {}", e);
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "message": DEMO_PAGE_UNAVAILABLE
                }))
            }
            GatewayError::NotFound => HttpResponse::NotFound().json(not_found_body()),
            GatewayError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                HttpResponse::InternalServerError().json(serde_json::json!({
                    "message": "",
                    "error": "internal server error"
                }))
            }
        }
    }
}
