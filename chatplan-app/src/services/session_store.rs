//! In-memory session store
//!
//! Nothing is persisted. A session untouched for longer than the idle TTL is
//! dropped by the sweeper.

use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::models::SessionRecord;

/// Upper bound on the time between two eviction sweeps
pub const MAX_SWEEP_PERIOD: Duration = Duration::from_secs(60);

/// Session records keyed by session id
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, SessionRecord>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session with empty defaults and return its id
    pub async fn create(&self) -> Uuid {
        let session = SessionRecord::new();
        let session_id = session.session_id;
        self.sessions.write().await.insert(session_id, session);
        tracing::info!(session_id = %session_id, "Session created");
        session_id
    }

    /// Snapshot of a session
    pub async fn get(&self, session_id: Uuid) -> Option<SessionRecord> {
        self.sessions.read().await.get(&session_id).cloned()
    }

    pub async fn contains(&self, session_id: Uuid) -> bool {
        self.sessions.read().await.contains_key(&session_id)
    }

    /// Mutate a session under the write lock
    ///
    /// Returns `None` if the session does not exist.
    pub async fn update<F, R>(&self, session_id: Uuid, f: F) -> Option<R>
    where
        F: FnOnce(&mut SessionRecord) -> R,
    {
        let mut sessions = self.sessions.write().await;
        sessions.get_mut(&session_id).map(f)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Drop sessions whose `updated_at` is older than `max_idle`
    ///
    /// Returns the number of sessions removed.
    pub async fn evict_idle(&self, max_idle: Duration) -> usize {
        // A TTL too large for chrono never expires anything
        let Ok(max_idle) = chrono::Duration::from_std(max_idle) else {
            return 0;
        };
        let cutoff = Utc::now() - max_idle;

        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| session.updated_at >= cutoff);
        let evicted = before - sessions.len();

        if evicted > 0 {
            tracing::info!(evicted, remaining = sessions.len(), "Evicted idle sessions");
        }
        evicted
    }

    /// Start a background task that evicts idle sessions periodically
    ///
    /// Returns `None` when `max_idle` is zero (expiry disabled).
    pub fn spawn_sweeper(&self, max_idle: Duration) -> Option<JoinHandle<()>> {
        if max_idle.is_zero() {
            return None;
        }

        let store = self.clone();
        let period = max_idle.min(MAX_SWEEP_PERIOD);
        Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                store.evict_idle(max_idle).await;
            }
        }))
    }
}
