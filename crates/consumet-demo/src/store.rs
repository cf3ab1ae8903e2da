use chrono::{DateTime, Utc};
use dashmap::DashMap;

use crate::session::{ClientId, Session};

/// Trait for session storage backends.
///
/// Implementations must be thread-safe (`Send + Sync`). Every operation acts
/// on a single key and must be atomic for that key; nothing here may fail.
/// Stores never evict on their own: a present session may already be stale,
/// so callers always check [`Session::is_expired`] themselves.
pub trait SessionStore: Send + Sync {
    /// Look up the session for a client.
    fn get(&self, client: &ClientId) -> Option<Session>;

    /// Create or overwrite the session for a client.
    fn put(&self, client: ClientId, session: Session);

    /// Remove the session for a client, if any.
    fn delete(&self, client: &ClientId);

    /// Snapshot of every stored session.
    fn entries(&self) -> Vec<(ClientId, Session)>;

    /// Number of stored sessions, live or stale.
    fn len(&self) -> usize {
        self.entries().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove every session that is expired at `now`. Returns number purged.
    ///
    /// The default walks a snapshot and deletes stale keys one by one, which
    /// can drop a session renewed between the snapshot and the delete.
    /// Backends with a conditional remove should override it.
    fn purge_expired(&self, now: DateTime<Utc>) -> usize {
        let mut purged = 0;
        for (client, session) in self.entries() {
            if session.is_expired(now) {
                self.delete(&client);
                purged += 1;
            }
        }
        purged
    }
}

/// In-memory session store backed by DashMap. Lost on restart.
pub struct InMemorySessionStore {
    sessions: DashMap<ClientId, Session>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore for InMemorySessionStore {
    fn get(&self, client: &ClientId) -> Option<Session> {
        self.sessions.get(client).map(|entry| *entry.value())
    }

    fn put(&self, client: ClientId, session: Session) {
        self.sessions.insert(client, session);
    }

    fn delete(&self, client: &ClientId) {
        self.sessions.remove(client);
    }

    fn entries(&self) -> Vec<(ClientId, Session)> {
        self.sessions
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect()
    }

    fn len(&self) -> usize {
        self.sessions.len()
    }

    fn purge_expired(&self, now: DateTime<Utc>) -> usize {
        // retain holds each shard's write lock, so a concurrent put for the
        // same key is either fully before or fully after the check
        let before = self.sessions.len();
        self.sessions.retain(|_, session| !session.is_expired(now));
        before.saturating_sub(self.sessions.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_in_memory_store_basic() {
        let store = InMemorySessionStore::new();
        let client = ClientId::from("127.0.0.1");
        let session = Session::new(Utc::now() + Duration::hours(1));

        assert!(store.get(&client).is_none());
        store.put(client.clone(), session);
        assert_eq!(store.get(&client), Some(session));

        store.delete(&client);
        assert!(store.get(&client).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_put_overwrites() {
        let store = InMemorySessionStore::new();
        let client = ClientId::from("127.0.0.1");
        let now = Utc::now();

        store.put(client.clone(), Session::new(now - Duration::hours(1)));
        store.put(client.clone(), Session::new(now + Duration::hours(1)));

        assert_eq!(store.len(), 1);
        assert!(store.get(&client).unwrap().is_live(now));
    }

    #[test]
    fn test_independent_clients() {
        let store = InMemorySessionStore::new();
        let a = ClientId::from("10.0.0.1");
        let b = ClientId::from("10.0.0.2");

        store.put(a.clone(), Session::new(Utc::now()));
        assert!(store.get(&a).is_some());
        assert!(store.get(&b).is_none());
    }

    #[test]
    fn test_purge_keeps_live_sessions() {
        let store = InMemorySessionStore::new();
        let now = Utc::now();
        for i in 0..5 {
            store.put(
                ClientId::new(format!("stale-{i}")),
                Session::new(now - Duration::seconds(i + 1)),
            );
        }
        store.put(ClientId::from("live"), Session::new(now + Duration::hours(1)));
        store.put(ClientId::from("edge"), Session::new(now));

        assert_eq!(store.purge_expired(now), 5);
        assert_eq!(store.len(), 2);
        assert!(store.get(&ClientId::from("live")).is_some());
        assert!(store.get(&ClientId::from("edge")).is_some());
    }

    /// Store relying on the trait's default sweep.
    struct SnapshotStore(InMemorySessionStore);

    impl SessionStore for SnapshotStore {
        fn get(&self, client: &ClientId) -> Option<Session> {
            self.0.get(client)
        }
        fn put(&self, client: ClientId, session: Session) {
            self.0.put(client, session)
        }
        fn delete(&self, client: &ClientId) {
            self.0.delete(client)
        }
        fn entries(&self) -> Vec<(ClientId, Session)> {
            self.0.entries()
        }
    }

    #[test]
    fn test_default_purge_via_entries() {
        let store = SnapshotStore(InMemorySessionStore::new());
        let now = Utc::now();
        store.put(ClientId::from("old"), Session::new(now - Duration::minutes(1)));
        store.put(ClientId::from("new"), Session::new(now + Duration::minutes(1)));

        assert_eq!(store.purge_expired(now), 1);
        assert_eq!(store.len(), 1);
        assert!(store.get(&ClientId::from("new")).is_some());
    }
}
