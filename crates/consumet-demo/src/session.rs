use chrono::{DateTime, Duration, Utc};
use std::fmt;

/// Opaque client identity, taken from the network origin of a request.
///
/// Not authenticated in any way. Two clients behind the same address share
/// an identity, and a client that changes address is a new client.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClientId(String);

impl ClientId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Identity used when the transport reports no peer address.
    pub fn unknown() -> Self {
        Self("unknown".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ClientId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// A demo session: unrestricted access until `expires_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn new(expires_at: DateTime<Utc>) -> Self {
        Self { expires_at }
    }

    /// Session starting at `now` and lasting `duration`. Saturates at the
    /// latest representable timestamp.
    pub fn starting_at(now: DateTime<Utc>, duration: Duration) -> Self {
        Self::new(
            now.checked_add_signed(duration)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        )
    }

    /// Expiry is strict: a session is still live at exactly `expires_at`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        !self.is_expired(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_live_at_boundary() {
        let now = Utc::now();
        let session = Session::new(now);
        assert!(session.is_live(now));
        assert!(session.is_expired(now + Duration::milliseconds(1)));
    }

    #[test]
    fn test_starting_at_adds_duration() {
        let now = Utc::now();
        let session = Session::starting_at(now, Duration::hours(5));
        assert_eq!(session.expires_at, now + Duration::hours(5));
        assert!(session.is_live(now + Duration::hours(1)));
    }

    #[test]
    fn test_client_id_display() {
        assert_eq!(ClientId::from("10.0.0.1").to_string(), "10.0.0.1");
        assert_eq!(ClientId::unknown().as_str(), "unknown");
    }
}
