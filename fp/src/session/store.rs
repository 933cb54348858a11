//! Session registry
//!
//! Maps session IDs to isolated session states. Each state sits behind its
//! own async mutex; a caller holds the lock for the whole of one action so
//! the actions of one session run strictly in arrival order.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tokio::sync::Mutex;
use tracing::{debug, info};

use super::SessionState;
use crate::domain::SessionId;

/// Shared handle to one session's state
pub type SessionHandle = Arc<Mutex<SessionState>>;

/// Registry of live sessions
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<SessionId, SessionHandle>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new empty session
    pub fn create(&self) -> SessionId {
        let id = SessionId::new();
        info!(session = %id.short(), "Session created");
        self.write().insert(id.clone(), Arc::new(Mutex::new(SessionState::new())));
        id
    }

    pub fn get(&self, id: &SessionId) -> Option<SessionHandle> {
        debug!(session = %id.short(), "SessionStore::get: called");
        self.read().get(id).cloned()
    }

    /// End a session, dropping its plan and transcript
    pub fn remove(&self, id: &SessionId) -> bool {
        let removed = self.write().remove(id).is_some();
        info!(session = %id.short(), removed, "Session removed");
        removed
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // Poisoning is ignored: the map is never left half-updated.
    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<SessionId, SessionHandle>> {
        self.sessions.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<SessionId, SessionHandle>> {
        self.sessions.write().unwrap_or_else(|e| e.into_inner())
    }
}
