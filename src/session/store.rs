//! Server-side session storage.
//!
//! Sessions are addressed by an opaque [`SessionId`]. The [`SessionStore`]
//! trait is the only way session records are read or mutated, so the
//! in-memory backend here can be swapped for an external one without
//! touching callers.

use dashmap::DashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use uuid::Uuid;

use crate::notes::Note;

/// Opaque session identifier carried in the session cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    /// Mint a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Everything the server keeps for one session.
#[derive(Debug, Clone)]
pub struct SessionRecord {
    /// Notes in insertion order.
    pub notes: Vec<Note>,
    last_seen: Instant,
}

impl SessionRecord {
    fn new() -> Self {
        Self {
            notes: Vec::new(),
            last_seen: Instant::now(),
        }
    }

    fn touch(&mut self) {
        self.last_seen = Instant::now();
    }

    /// Time since the session was last read or written.
    pub fn idle_for(&self) -> Duration {
        self.last_seen.elapsed()
    }
}

/// Session-keyed storage backend.
pub trait SessionStore: Send + Sync {
    /// Whether a record exists for `id`.
    fn contains(&self, id: &SessionId) -> bool;

    /// Snapshot of the record for `id`, if any. Never creates a record.
    fn read(&self, id: &SessionId) -> Option<SessionRecord>;

    /// Run `f` against the record for `id`, creating an empty one first if
    /// needed. Calls for the same id are serialized.
    fn modify(&self, id: &SessionId, f: &mut dyn FnMut(&mut SessionRecord));

    /// Drop every record idle for at least `max_idle`. Returns how many.
    fn purge_idle(&self, max_idle: Duration) -> usize;

    /// Number of live sessions.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-process session store.
#[derive(Clone, Default)]
pub struct MemorySessionStore {
    inner: Arc<DashMap<SessionId, SessionRecord>>,
}

impl MemorySessionStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn contains(&self, id: &SessionId) -> bool {
        self.inner.contains_key(id)
    }

    fn read(&self, id: &SessionId) -> Option<SessionRecord> {
        self.inner.get_mut(id).map(|mut r| {
            r.touch();
            r.value().clone()
        })
    }

    fn modify(&self, id: &SessionId, f: &mut dyn FnMut(&mut SessionRecord)) {
        // The entry guard holds the shard write lock until dropped.
        let mut record = self.inner.entry(*id).or_insert_with(SessionRecord::new);
        record.touch();
        f(record.value_mut());
    }

    fn purge_idle(&self, max_idle: Duration) -> usize {
        let mut purged = 0;
        self.inner.retain(|_, record| {
            let keep = record.idle_for() < max_idle;
            if !keep {
                purged += 1;
            }
            keep
        });
        purged
    }

    fn len(&self) -> usize {
        self.inner.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_does_not_create() {
        let store = MemorySessionStore::new();
        let id = SessionId::generate();

        assert!(store.read(&id).is_none());
        assert!(store.read(&id).is_none());
        assert!(!store.contains(&id));
        assert!(store.is_empty());
    }

    #[test]
    fn test_modify_creates_on_first_write() {
        let store = MemorySessionStore::new();
        let id = SessionId::generate();

        let mut seen_len = None;
        store.modify(&id, &mut |record| seen_len = Some(record.notes.len()));

        assert_eq!(seen_len, Some(0));
        assert!(store.contains(&id));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_purge_idle() {
        let store = MemorySessionStore::new();
        let a = SessionId::generate();
        let b = SessionId::generate();
        store.modify(&a, &mut |_| {});
        store.modify(&b, &mut |_| {});

        assert_eq!(store.purge_idle(Duration::from_secs(3600)), 0);
        assert_eq!(store.len(), 2);

        assert_eq!(store.purge_idle(Duration::ZERO), 2);
        assert!(!store.contains(&a));
        assert!(store.is_empty());
    }

    #[test]
    fn test_session_id_round_trips_through_text() {
        let id = SessionId::generate();
        let parsed: SessionId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
        assert!("not-a-session".parse::<SessionId>().is_err());
    }
}
