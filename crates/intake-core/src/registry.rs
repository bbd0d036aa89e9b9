use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, MutexGuard, RwLock};

use crate::session::CallSession;
use crate::snapshot::ChunkSnapshot;

/// One registered session. The mutex is the per-session serialization
/// boundary: it is FIFO-fair, so chunks queue in arrival order and finalize
/// drains whatever is in flight before taking the last snapshot.
pub(crate) struct SessionSlot {
    state: Mutex<CallSession>,
}

impl SessionSlot {
    fn new(session_id: &str) -> Self {
        Self {
            state: Mutex::new(CallSession::new(session_id)),
        }
    }

    pub(crate) async fn lock(&self) -> MutexGuard<'_, CallSession> {
        self.state.lock().await
    }
}

/// Index of live sessions. The outer lock guards only the index; work on two
/// different sessions never contends.
pub(crate) struct SessionRegistry {
    sessions: RwLock<HashMap<String, Arc<SessionSlot>>>,
}

impl SessionRegistry {
    pub(crate) fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the session for `session_id`, creating it on first contact.
    /// Lookup-or-insert is atomic: two concurrent first chunks for a new id
    /// resolve to the same slot.
    pub(crate) async fn get_or_create(&self, session_id: &str) -> Arc<SessionSlot> {
        {
            let sessions = self.sessions.read().await;
            if let Some(slot) = sessions.get(session_id) {
                return Arc::clone(slot);
            }
        }

        let mut sessions = self.sessions.write().await;
        let slot = sessions
            .entry(session_id.to_string())
            .or_insert_with(|| Arc::new(SessionSlot::new(session_id)));
        Arc::clone(slot)
    }

    pub(crate) async fn get(&self, session_id: &str) -> Option<Arc<SessionSlot>> {
        self.sessions.read().await.get(session_id).cloned()
    }

    /// Removes the session if present. Repeat calls return `None`.
    pub(crate) async fn remove(&self, session_id: &str) -> Option<Arc<SessionSlot>> {
        self.sessions.write().await.remove(session_id)
    }

    pub(crate) async fn active_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Sweeps out sessions idle for longer than `max_idle` and returns their
    /// last snapshots. A slot locked by an in-flight chunk is left for the
    /// next sweep; that chunk refreshes the session's activity anyway.
    pub(crate) async fn evict_idle(&self, max_idle: Duration) -> Vec<(String, ChunkSnapshot)> {
        let mut sessions = self.sessions.write().await;
        let mut evicted = Vec::new();

        sessions.retain(|session_id, slot| match slot.state.try_lock() {
            Ok(session) => {
                if session.last_activity().elapsed() > max_idle {
                    evicted.push((session_id.clone(), session.snapshot("")));
                    false
                } else {
                    true
                }
            }
            Err(_) => true,
        });

        evicted
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
