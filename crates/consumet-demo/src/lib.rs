//! Demo-mode access gating for the consumet gateway.
//!
//! In demo mode every client (identified by its network address) must first
//! activate a short-lived session before reaching the API.
//!
//! # Pieces
//!
//! - **Store** ([`SessionStore`]): client identity → expiry timestamp
//! - **Gate** ([`AccessGate`]): per-request policy: proceed or redirect
//! - **Activation** ([`Activation`]): the only path that creates sessions
//! - **Sweeper** ([`ExpirySweeper`]): periodic eviction of stale sessions
//!
//! All four share one store and are built together by [`DemoAccess`]; a
//! gate without a sweeper (or vice versa) cannot be constructed through it.
//!
//! ```no_run
//! use consumet_demo::{ClientId, DemoAccess, DemoSettings};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let demo = DemoAccess::launch(DemoSettings::default());
//! let client = ClientId::from("203.0.113.7");
//!
//! let decision = demo.gate().evaluate(&client, "/anime", chrono::Utc::now());
//! assert_eq!(decision.location(), Some("/apidemo"));
//! # }
//! ```

pub mod activation;
pub mod gate;
pub mod session;
pub mod settings;
pub mod store;
pub mod sweeper;

use std::sync::Arc;
use tokio::task::JoinHandle;

pub use activation::{Activation, ActivationOutcome};
pub use gate::{AccessGate, GateDecision, SessionState};
pub use session::{ClientId, Session};
pub use settings::DemoSettings;
pub use store::{InMemorySessionStore, SessionStore};
pub use sweeper::ExpirySweeper;

/// The demo bundle: store, gate, activation, and a running sweeper.
///
/// Dropping the bundle stops its sweeper.
pub struct DemoAccess {
    settings: DemoSettings,
    store: Arc<dyn SessionStore>,
    gate: AccessGate,
    activation: Activation,
    sweeper: JoinHandle<()>,
}

impl DemoAccess {
    /// Build the bundle over an in-memory store and start sweeping.
    ///
    /// Must be called from within a tokio runtime.
    pub fn launch(settings: DemoSettings) -> Self {
        Self::launch_with_store(settings, Arc::new(InMemorySessionStore::new()), |_| {})
    }

    /// Build the bundle over `store`. `on_sweep` observes each sweep's count.
    pub fn launch_with_store<F>(
        settings: DemoSettings,
        store: Arc<dyn SessionStore>,
        on_sweep: F,
    ) -> Self
    where
        F: Fn(usize) + Send + 'static,
    {
        let gate = AccessGate::new(store.clone(), &settings);
        let activation = Activation::new(store.clone(), &settings);
        let sweeper = ExpirySweeper::new(store.clone(), settings.sweep_interval).spawn(on_sweep);

        tracing::info!(
            session_secs = settings.session_duration.as_secs(),
            sweep_secs = settings.sweep_interval.as_secs(),
            activation_path = %settings.activation_path,
            "demo access gate armed"
        );

        Self {
            settings,
            store,
            gate,
            activation,
            sweeper,
        }
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    pub fn gate(&self) -> &AccessGate {
        &self.gate
    }

    pub fn activation(&self) -> &Activation {
        &self.activation
    }

    pub fn activation_path(&self) -> &str {
        &self.settings.activation_path
    }
}

impl Drop for DemoAccess {
    fn drop(&mut self) {
        self.sweeper.abort();
    }
}
