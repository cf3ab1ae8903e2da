use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;

use crate::session::{ClientId, Session};
use crate::settings::DemoSettings;
use crate::store::SessionStore;

/// Result of an activation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationOutcome {
    /// A new session was written (no session, or only a stale one, existed).
    Activated(Session),
    /// The client already had a live session; nothing changed.
    AlreadyActive(Session),
}

impl ActivationOutcome {
    pub fn session(&self) -> Session {
        match self {
            ActivationOutcome::Activated(s) | ActivationOutcome::AlreadyActive(s) => *s,
        }
    }
}

/// The only writer that creates sessions. A live session is never extended.
pub struct Activation {
    store: Arc<dyn SessionStore>,
    session_duration: Duration,
    root_path: String,
}

impl Activation {
    pub fn new(store: Arc<dyn SessionStore>, settings: &DemoSettings) -> Self {
        Self {
            store,
            session_duration: settings.session_span(),
            root_path: settings.root_path.clone(),
        }
    }

    /// Where the client is sent after activation, whatever the outcome.
    pub fn redirect_to(&self) -> &str {
        &self.root_path
    }

    pub fn activate(&self, client: &ClientId, now: DateTime<Utc>) -> ActivationOutcome {
        if let Some(existing) = self.store.get(client) {
            if existing.is_live(now) {
                return ActivationOutcome::AlreadyActive(existing);
            }
        }

        let session = Session::starting_at(now, self.session_duration);
        self.store.put(client.clone(), session);
        tracing::info!(
            client = %client,
            expires_at = %session.expires_at,
            "demo session activated"
        );
        ActivationOutcome::Activated(session)
    }
}
