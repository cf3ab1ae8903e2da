use chrono::{DateTime, Utc};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::store::SessionStore;

/// Periodically evicts expired sessions so the store stays bounded.
///
/// Advisory only: between sweeps a stale session may still be visible, which
/// is fine because the gate re-checks expiry on every request.
pub struct ExpirySweeper {
    store: Arc<dyn SessionStore>,
    interval: Duration,
}

impl ExpirySweeper {
    pub fn new(store: Arc<dyn SessionStore>, interval: Duration) -> Self {
        Self { store, interval }
    }

    /// Run one sweep at `now`. Returns number of sessions removed.
    ///
    /// A panic inside the store is caught and logged; the sweep reports zero
    /// and the next cycle runs as usual.
    pub fn sweep(&self, now: DateTime<Utc>) -> usize {
        match std::panic::catch_unwind(AssertUnwindSafe(|| self.store.purge_expired(now))) {
            Ok(purged) => {
                if purged > 0 {
                    tracing::info!(purged, remaining = self.store.len(), "swept expired demo sessions");
                }
                purged
            }
            Err(_) => {
                tracing::error!("demo session sweep panicked, skipping this cycle");
                0
            }
        }
    }

    /// Spawn the sweep loop. The first sweep happens one full interval after
    /// start. `on_sweep` receives the count of each completed sweep.
    pub fn spawn<F>(self, on_sweep: F) -> JoinHandle<()>
    where
        F: Fn(usize) + Send + 'static,
    {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + self.interval, self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let purged = self.sweep(Utc::now());
                on_sweep(purged);
            }
        })
    }
}
