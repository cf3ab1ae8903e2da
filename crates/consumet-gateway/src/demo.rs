//! Demo-mode HTTP surface: the gate middleware and the activation routes.

use actix_web::body::{BoxBody, MessageBody};
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::http::header;
use actix_web::middleware::Next;
use actix_web::{web, Error, HttpRequest, HttpResponse};
use chrono::Utc;
use consumet_demo::{ActivationOutcome, ClientId, DemoAccess, GateDecision, SessionState};
use std::sync::Arc;

use crate::error::GatewayError;
use crate::metrics;
use crate::state::AppState;

/// Derive the client identity from the request.
///
/// Uses the socket peer address unless `trust_proxy` is set, in which case
/// `Forwarded` / `X-Forwarded-For` win.
pub fn client_id(req: &HttpRequest, trust_proxy: bool) -> ClientId {
    if trust_proxy {
        if let Some(ip) = req.connection_info().realip_remote_addr() {
            return ClientId::new(normalize_ip(ip));
        }
    }
    req.peer_addr()
        .map(|addr| ClientId::new(addr.ip().to_string()))
        .unwrap_or_else(ClientId::unknown)
}

/// `ip:port` and bare addresses map to the same identity.
fn normalize_ip(addr: &str) -> String {
    addr.parse::<std::net::SocketAddr>()
        .map(|a| a.ip().to_string())
        .unwrap_or_else(|_| addr.to_string())
}

fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Middleware enforcing the demo gate. Passes everything through when demo
/// mode is off. Attach via `actix_web::middleware::from_fn`.
pub async fn demo_gate(
    state: web::Data<AppState>,
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let Some(demo) = state.demo.as_ref() else {
        return next.call(req).await.map(ServiceResponse::map_into_left_body::<BoxBody>);
    };

    // Gate on the path the router will match, with unreserved escapes
    // (`/%61pidemo`) already decoded.
    let path = req.match_info().as_str().to_string();
    let client = client_id(req.request(), state.config.trust_proxy);

    match demo.gate().evaluate(&client, &path, Utc::now()) {
        GateDecision::Proceed => next
            .call(req)
            .await
            .map(ServiceResponse::map_into_left_body::<BoxBody>),
        GateDecision::Redirect { location, state: reason } => {
            metrics::DEMO_GATE_REDIRECTS
                .with_label_values(&[reason.as_str()])
                .inc();
            if reason == SessionState::ExpiredSession {
                metrics::DEMO_SESSIONS.set(demo.store().len() as i64);
            }
            tracing::debug!(
                path = %path,
                to = %location,
                state = reason.as_str(),
                "demo gate redirect"
            );
            Ok(req.into_response(redirect(&location)).map_into_right_body())
        }
    }
}

/// GET {activation} - serve the static activation page
pub async fn activation_page(
    state: web::Data<AppState>,
    req: HttpRequest,
) -> Result<HttpResponse, GatewayError> {
    let path = state
        .config
        .demo
        .as_ref()
        .map(|d| d.page_path.clone())
        .ok_or(GatewayError::NotFound)?;

    let file = actix_files::NamedFile::open_async(&path)
        .await
        .map_err(GatewayError::DemoPageUnavailable)?;
    Ok(file
        .set_content_type(actix_web::mime::TEXT_HTML_UTF_8)
        .into_response(&req))
}

/// POST {activation} - create a session for the caller, then go home
pub async fn activate(
    demo: web::Data<DemoAccess>,
    state: web::Data<AppState>,
    req: HttpRequest,
) -> HttpResponse {
    let client = client_id(&req, state.config.trust_proxy);
    let outcome = demo.activation().activate(&client, Utc::now());

    let label = match outcome {
        ActivationOutcome::Activated(_) => "activated",
        ActivationOutcome::AlreadyActive(_) => "already_active",
    };
    metrics::DEMO_ACTIVATIONS.with_label_values(&[label]).inc();
    metrics::DEMO_SESSIONS.set(demo.store().len() as i64);

    redirect(demo.activation().redirect_to())
}

/// Mount the activation page and endpoint for `demo`.
pub fn configure(cfg: &mut web::ServiceConfig, demo: &Arc<DemoAccess>) {
    cfg.service(
        web::resource(demo.activation_path())
            .app_data(web::Data::from(demo.clone()))
            .route(web::get().to(activation_page))
            .route(web::post().to(activate)),
    );
}
