//! App assembly.
//!
//! Registration order matters: health and robots come before the demo routes
//! and providers, and the demo gate wraps everything so no provider is
//! reachable without a session. The health paths are exempted inside the
//! gate itself.

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::middleware::{from_fn, Logger};
use actix_web::{web, App, Error};

use crate::demo;
use crate::panic::catch_panic;
use crate::routes::{self, providers::ProviderRoutes};
use crate::state::AppState;

/// Build the gateway app with the standard provider mounts.
pub fn build_app(
    state: web::Data<AppState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
> {
    build_app_with(state, ProviderRoutes::standard())
}

pub fn build_app_with(
    state: web::Data<AppState>,
    providers: ProviderRoutes,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
> {
    let demo = state.demo.clone();

    // wrap order: the last wrap runs first on the way in
    App::new()
        .app_data(state)
        .wrap(from_fn(demo::demo_gate))
        .wrap(from_fn(catch_panic))
        .wrap(Logger::default())
        .wrap(crate::cors::build_cors())
        .configure(routes::health::configure)
        .configure(|cfg| {
            if let Some(ref demo) = demo {
                demo::configure(cfg, demo);
            }
        })
        .configure(|cfg| providers.configure(cfg))
        .configure(routes::root::configure)
        .default_service(web::to(routes::fallback::not_found))
}
