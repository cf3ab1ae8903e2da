use actix_web::http::header;
use actix_web::{web, HttpRequest, HttpResponse};
use prometheus::{Encoder, TextEncoder};

use crate::metrics::REGISTRY;
use crate::state::AppState;

/// Paths answered regardless of demo session state.
pub const UNGATED_PATHS: &[&str] = &["/status", "/robots.txt", "/metrics"];

const ROBOTS_TXT: &str = "User-agent: *\nDisallow: /\n";

/// GET|HEAD /status - liveness probe
pub async fn status(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "ok": true,
        "uptime": state.uptime_secs(),
    }))
}

/// GET|HEAD /robots.txt - keep crawlers off every route
pub async fn robots() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain")
        .body(ROBOTS_TXT)
}

/// Compare the presented /metrics token against METRICS_TOKEN. Both sides
/// are hashed first so timing reveals neither content nor length.
fn token_matches(presented: &[u8], expected: &[u8]) -> bool {
    use sha2::{Digest, Sha256};
    let presented = Sha256::digest(presented);
    let expected = Sha256::digest(expected);
    presented
        .iter()
        .zip(expected.iter())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}

fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// GET /metrics - demo gate and panic counters in Prometheus text format.
///
/// Never behind the demo gate. Requires `Authorization: Bearer <METRICS_TOKEN>`
/// when a token is configured.
pub async fn metrics(req: HttpRequest, state: web::Data<AppState>) -> HttpResponse {
    if let Some(expected) = state.config.metrics_token.as_deref() {
        let authorized = bearer_token(&req)
            .is_some_and(|token| token_matches(token.as_bytes(), expected.as_bytes()));
        if !authorized {
            return HttpResponse::Unauthorized().json(serde_json::json!({
                "message": "",
                "error": "metrics token required",
            }));
        }
    }

    let mut buffer = Vec::new();
    if let Err(e) = TextEncoder::new().encode(&REGISTRY.gather(), &mut buffer) {
        tracing::error!(error = %e, "metrics encoding failed");
        return HttpResponse::InternalServerError().finish();
    }

    HttpResponse::Ok()
        .content_type(prometheus::TEXT_FORMAT)
        .body(buffer)
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/status")
            .route(web::get().to(status))
            .route(web::head().to(status)),
    )
    .service(
        web::resource("/robots.txt")
            .route(web::get().to(robots))
            .route(web::head().to(robots)),
    )
    .route("/metrics", web::get().to(metrics));
}
