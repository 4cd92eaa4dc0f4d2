//! Session store
//!
//! Maps session ids to exclusively owned session state. Lookup is
//! lock-free (`DashMap`); all state access goes through the returned
//! per-session mutex, so sessions never contend with each other.

use crate::session::SessionState;
use dashmap::DashMap;
use platen_order::SessionId;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared handle to one session's state
pub type SessionHandle = Arc<Mutex<SessionState>>;

/// All live sessions, keyed by session id
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: DashMap<SessionId, SessionHandle>,
}

impl SessionStore {
    /// Create empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the session for `id`, creating an idle one on first contact
    #[must_use]
    pub fn session(&self, id: SessionId) -> SessionHandle {
        self.sessions
            .entry(id)
            .or_insert_with(|| Arc::new(Mutex::new(SessionState::new())))
            .clone()
    }

    /// Whether a session exists for `id`
    #[inline]
    #[must_use]
    pub fn contains(&self, id: SessionId) -> bool {
        self.sessions.contains_key(&id)
    }

    /// Number of known sessions
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// True when no session exists
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Phase;

    #[tokio::test]
    async fn store_creates_session_on_first_contact() {
        let store = SessionStore::new();
        assert!(store.is_empty());

        let session = store.session(SessionId::new(1));
        assert_eq!(store.len(), 1);
        assert_eq!(session.lock().await.phase, Phase::Idle);
    }

    #[tokio::test]
    async fn store_returns_same_session_for_same_id() {
        let store = SessionStore::new();
        let first = store.session(SessionId::new(7));
        first.lock().await.phase = Phase::AwaitingOrder;

        let second = store.session(SessionId::new(7));
        assert_eq!(second.lock().await.phase, Phase::AwaitingOrder);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn store_keeps_sessions_independent() {
        let store = SessionStore::new();
        let a = store.session(SessionId::new(1));
        let b = store.session(SessionId::new(2));
        a.lock().await.phase = Phase::AwaitingFiles;

        assert_eq!(b.lock().await.phase, Phase::Idle);
        assert_eq!(store.len(), 2);
    }
}
