//! Request-interception policy for demo mode.
//!
//! Evaluated for every request before any provider route. The gate only ever
//! reads sessions or deletes an expired one; creating and renewing sessions
//! is left to [`Activation`](crate::activation::Activation).

use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::session::ClientId;
use crate::settings::DemoSettings;
use crate::store::SessionStore;

/// What the gate saw for the requesting client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    NoSession,
    LiveSession,
    ExpiredSession,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::NoSession => "no_session",
            SessionState::LiveSession => "live_session",
            SessionState::ExpiredSession => "expired_session",
        }
    }
}

/// Terminal outcome of one gate evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Hand the request to the next handler.
    Proceed,
    /// Answer with a redirect to `location` instead.
    Redirect {
        location: String,
        state: SessionState,
    },
}

impl GateDecision {
    pub fn is_proceed(&self) -> bool {
        matches!(self, GateDecision::Proceed)
    }

    pub fn location(&self) -> Option<&str> {
        match self {
            GateDecision::Proceed => None,
            GateDecision::Redirect { location, .. } => Some(location),
        }
    }
}

pub struct AccessGate {
    store: Arc<dyn SessionStore>,
    activation_path: String,
    root_path: String,
    ungated_paths: Vec<String>,
}

impl AccessGate {
    pub fn new(store: Arc<dyn SessionStore>, settings: &DemoSettings) -> Self {
        Self {
            store,
            activation_path: settings.activation_path.clone(),
            root_path: settings.root_path.clone(),
            ungated_paths: settings.ungated_paths.clone(),
        }
    }

    /// Whether `path` skips the gate altogether.
    pub fn is_ungated(&self, path: &str) -> bool {
        self.ungated_paths.iter().any(|p| p == path)
    }

    /// Evaluate the policy for `client` requesting `path` at `now`.
    pub fn evaluate(&self, client: &ClientId, path: &str, now: DateTime<Utc>) -> GateDecision {
        if self.is_ungated(path) {
            return GateDecision::Proceed;
        }

        let on_activation = path == self.activation_path;

        match self.store.get(client) {
            None => {
                if on_activation {
                    GateDecision::Proceed
                } else {
                    self.redirect(&self.activation_path, SessionState::NoSession)
                }
            }
            Some(session) if session.is_expired(now) => {
                // Evict now rather than wait for the next sweep.
                self.store.delete(client);
                tracing::debug!(client = %client, "demo session expired, evicted by gate");
                // Expired clients are bounced off the activation page so they
                // come back on a fresh request.
                if on_activation {
                    self.redirect(&self.root_path, SessionState::ExpiredSession)
                } else {
                    self.redirect(&self.activation_path, SessionState::ExpiredSession)
                }
            }
            Some(_) => {
                if on_activation {
                    self.redirect(&self.root_path, SessionState::LiveSession)
                } else {
                    GateDecision::Proceed
                }
            }
        }
    }

    fn redirect(&self, location: &str, state: SessionState) -> GateDecision {
        GateDecision::Redirect {
            location: location.to_string(),
            state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Session;
    use crate::store::InMemorySessionStore;
    use chrono::Duration;

    fn gate_with_store() -> (AccessGate, Arc<InMemorySessionStore>) {
        let store = Arc::new(InMemorySessionStore::new());
        let settings = DemoSettings::default().with_ungated_paths(["/status", "/robots.txt"]);
        (AccessGate::new(store.clone(), &settings), store)
    }

    #[test]
    fn test_no_session_redirects_to_activation() {
        let (gate, _) = gate_with_store();
        let client = ClientId::from("1.1.1.1");

        for path in ["/", "/anime/gogoanime/naruto", "/books", "/nope"] {
            let decision = gate.evaluate(&client, path, Utc::now());
            assert_eq!(
                decision,
                GateDecision::Redirect {
                    location: "/apidemo".to_string(),
                    state: SessionState::NoSession,
                }
            );
        }
    }

    #[test]
    fn test_no_session_may_reach_activation() {
        let (gate, store) = gate_with_store();
        let client = ClientId::from("1.1.1.1");

        assert!(gate.evaluate(&client, "/apidemo", Utc::now()).is_proceed());
        assert!(store.is_empty());
    }

    #[test]
    fn test_live_session_proceeds() {
        let (gate, store) = gate_with_store();
        let client = ClientId::from("1.1.1.1");
        let now = Utc::now();
        store.put(client.clone(), Session::new(now + Duration::hours(1)));

        assert!(gate.evaluate(&client, "/movies/flixhq", now).is_proceed());
        assert!(gate.evaluate(&client, "/", now).is_proceed());
    }

    #[test]
    fn test_live_session_bounced_off_activation() {
        let (gate, store) = gate_with_store();
        let client = ClientId::from("1.1.1.1");
        let now = Utc::now();
        store.put(client.clone(), Session::new(now + Duration::hours(1)));

        let decision = gate.evaluate(&client, "/apidemo", now);
        assert_eq!(decision.location(), Some("/"));
        assert!(store.get(&client).is_some());
    }

    #[test]
    fn test_session_live_at_exact_expiry() {
        let (gate, store) = gate_with_store();
        let client = ClientId::from("1.1.1.1");
        let now = Utc::now();
        store.put(client.clone(), Session::new(now));

        assert!(gate.evaluate(&client, "/news", now).is_proceed());
        assert!(store.get(&client).is_some());
    }

    #[test]
    fn test_expired_session_evicted_and_redirected() {
        let (gate, store) = gate_with_store();
        let client = ClientId::from("1.1.1.1");
        let now = Utc::now();
        store.put(client.clone(), Session::new(now - Duration::seconds(1)));

        let decision = gate.evaluate(&client, "/manga", now);
        assert_eq!(
            decision,
            GateDecision::Redirect {
                location: "/apidemo".to_string(),
                state: SessionState::ExpiredSession,
            }
        );
        assert!(store.get(&client).is_none());
    }

    #[test]
    fn test_expired_session_on_activation_goes_to_root() {
        let (gate, store) = gate_with_store();
        let client = ClientId::from("1.1.1.1");
        let now = Utc::now();
        store.put(client.clone(), Session::new(now - Duration::seconds(1)));

        let decision = gate.evaluate(&client, "/apidemo", now);
        assert_eq!(decision.location(), Some("/"));
        assert!(store.get(&client).is_none());

        // next request is treated like a new client
        assert!(gate.evaluate(&client, "/apidemo", now).is_proceed());
    }

    #[test]
    fn test_eviction_only_touches_requesting_client() {
        let (gate, store) = gate_with_store();
        let now = Utc::now();
        let stale = ClientId::from("1.1.1.1");
        let other = ClientId::from("2.2.2.2");
        store.put(stale.clone(), Session::new(now - Duration::seconds(1)));
        store.put(other.clone(), Session::new(now - Duration::seconds(1)));

        gate.evaluate(&stale, "/", now);
        assert!(store.get(&stale).is_none());
        assert!(store.get(&other).is_some());
    }

    #[test]
    fn test_ungated_paths_skip_lookup() {
        let (gate, store) = gate_with_store();
        let client = ClientId::from("1.1.1.1");
        let now = Utc::now();
        store.put(client.clone(), Session::new(now - Duration::hours(1)));

        assert!(gate.evaluate(&client, "/status", now).is_proceed());
        assert!(gate.evaluate(&client, "/robots.txt", now).is_proceed());
        // no self-heal happened on an ungated path
        assert!(store.get(&client).is_some());
    }
}
