use consumet_demo::{DemoAccess, DemoSettings, InMemorySessionStore, SessionStore};
use std::sync::Arc;
use std::time::Instant;

use crate::config::GatewayConfig;
use crate::metrics;
use crate::routes::health::UNGATED_PATHS;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GatewayConfig>,
    /// Process start, for /status uptime
    pub started_at: Instant,
    /// Demo bundle (when NODE_ENV=DEMO). Gate, activation and sweeper live
    /// and die together inside it.
    pub demo: Option<Arc<DemoAccess>>,
}

impl AppState {
    /// Build the state. In demo mode this arms the gate and starts the
    /// sweeper, so it must run inside a tokio runtime.
    pub fn new(config: GatewayConfig) -> Self {
        let demo = config.demo.as_ref().map(|demo| {
            let settings = DemoSettings::default()
                .with_session_duration(demo.session_duration)
                .with_sweep_interval(demo.sweep_interval)
                .with_ungated_paths(UNGATED_PATHS.iter().copied());
            let store = Arc::new(InMemorySessionStore::new());
            let gauge_store = store.clone();

            Arc::new(DemoAccess::launch_with_store(settings, store, move |purged| {
                metrics::DEMO_SESSIONS_SWEPT.inc_by(purged as u64);
                metrics::DEMO_SESSIONS.set(gauge_store.len() as i64);
            }))
        });

        Self {
            config: Arc::new(config),
            started_at: Instant::now(),
            demo,
        }
    }

    pub fn uptime_secs(&self) -> f64 {
        self.started_at.elapsed().as_secs_f64()
    }
}
