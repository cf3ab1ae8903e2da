pub mod app;
pub mod config;
pub mod cors;
pub mod demo;
pub mod error;
pub mod metrics;
pub mod panic;
pub mod routes;
pub mod state;

pub use app::{build_app, build_app_with};
pub use config::GatewayConfig;
pub use error::GatewayError;
pub use state::AppState;
