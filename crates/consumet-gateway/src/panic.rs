//! Crash containment.
//!
//! A panicking handler must not take the worker (and every connection on it)
//! down with it. [`catch_panic`] turns a panic inside a request into a 500 and
//! [`install_panic_hook`] makes every panic in the process visible in the
//! logs, including those in spawned tasks that tokio already isolates.

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::middleware::Next;
use actix_web::Error;
use futures::future::FutureExt;
use std::panic::AssertUnwindSafe;

use crate::error::GatewayError;
use crate::metrics::PANICS_CONTAINED;

/// Route panic reports through tracing instead of stderr.
pub fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        PANICS_CONTAINED.inc();
        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()))
            .unwrap_or_else(|| "unknown".to_string());
        tracing::error!(
            location = %location,
            thread = std::thread::current().name().unwrap_or("unnamed"),
            "panic contained: {}",
            panic_message(info.payload())
        );
    }));
}

/// Best-effort text of a panic payload.
pub fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Middleware converting a panicking request into a 500 response.
/// Attach via `actix_web::middleware::from_fn`.
///
/// The request is handed to the inner service whole; actix needs sole
/// ownership of it while routing, so nothing here may hold a copy.
pub async fn catch_panic(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let path = req.path().to_string();

    match AssertUnwindSafe(next.call(req)).catch_unwind().await {
        Ok(res) => res,
        Err(payload) => Err(GatewayError::Internal(format!(
            "handler for {} panicked: {}",
            path,
            panic_message(payload.as_ref())
        ))
        .into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::middleware::from_fn;
    use actix_web::{test as atest, web, App, HttpResponse};

    async fn boom() -> HttpResponse {
        panic!("provider exploded");
    }

    async fn fine() -> HttpResponse {
        HttpResponse::Ok().body("fine")
    }

    #[test]
    fn test_panic_message() {
        let payload: Box<dyn std::any::Any + Send> = Box::new("static");
        assert_eq!(panic_message(payload.as_ref()), "static");
        let payload: Box<dyn std::any::Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(payload.as_ref()), "owned");
        let payload: Box<dyn std::any::Any + Send> = Box::new(7u8);
        assert_eq!(panic_message(payload.as_ref()), "non-string panic payload");
    }

    #[actix_web::test]
    async fn test_routed_requests_pass_through() {
        let app = atest::init_service(
            App::new().wrap(from_fn(catch_panic)).service(
                web::scope("/anime")
                    .route("", web::get().to(fine))
                    .route("/{id}", web::get().to(fine)),
            ),
        )
        .await;

        for uri in ["/anime", "/anime/naruto"] {
            let req = atest::TestRequest::get().uri(uri).to_request();
            let resp = atest::call_service(&app, req).await;
            assert_eq!(resp.status(), 200, "{uri}");
            assert_eq!(atest::read_body(resp).await, "fine");
        }
    }

    #[actix_web::test]
    async fn test_panicking_handler_becomes_500() {
        let app = atest::init_service(
            App::new()
                .wrap(from_fn(catch_panic))
                .route("/boom", web::get().to(boom))
                .route("/fine", web::get().to(fine)),
        )
        .await;

        let req = atest::TestRequest::get().uri("/boom").to_request();
        let err = atest::try_call_service(&app, req)
            .await
            .err()
            .expect("panic surfaces as an error");
        let resp = err.error_response();
        assert_eq!(resp.status(), 500);
        let body = actix_web::body::to_bytes(resp.into_body()).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["error"], "internal server error");

        // the service keeps answering
        let req = atest::TestRequest::get().uri("/fine").to_request();
        let resp = atest::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
    }
}
