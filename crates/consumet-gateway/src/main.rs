use actix_web::{web, HttpServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use consumet_gateway::{
    build_app, config::GatewayConfig, metrics::register_metrics, panic::install_panic_hook,
    state::AppState,
};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,actix_web=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Panics anywhere are logged; the process keeps serving
    install_panic_hook();

    // Load configuration
    let config = match GatewayConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };
    let host = config.host;
    let port = config.port;

    if config.demo_mode() {
        tracing::warn!("DEMO MODE ENABLED");
    }

    register_metrics();

    // Create shared state (arms the demo gate and sweeper in demo mode)
    let state = web::Data::new(AppState::new(config));

    tracing::info!("Starting consumet-gateway on {}:{}", host, port);

    let server = HttpServer::new(move || build_app(state.clone()))
        .bind((host, port))
        .map_err(|e| {
            tracing::error!("Failed to bind {}:{}: {}", host, port, e);
            e
        })?;

    tracing::info!("server listening on http://{}:{}", host, port);
    server.run().await
}
