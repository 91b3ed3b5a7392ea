//! Core session manager structure and lifecycle management
//!
//! Provides the `SessionManager` struct, its session table, and shutdown.

use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::manager::session::Session;
use crate::observer::ObserverHub;
use crate::types::SessionId;

// ============================================================================
// SESSION TABLE
// ============================================================================

/// Live sessions plus the id counter, guarded by one lock
///
/// Ids only grow, so iterating the map yields accept order.
pub(crate) struct SessionTable {
    next_id: u64,
    sessions: BTreeMap<SessionId, Arc<Session>>,
}

impl SessionTable {
    fn new() -> Self {
        Self {
            next_id: 1,
            sessions: BTreeMap::new(),
        }
    }

    /// Reserve the next session id
    pub(crate) fn allocate_id(&mut self) -> SessionId {
        let id = SessionId::new(self.next_id);
        self.next_id += 1;
        id
    }

    pub(crate) fn insert(&mut self, session: Arc<Session>) {
        self.sessions.insert(session.id(), session);
    }

    pub(crate) fn get(&self, id: SessionId) -> Option<Arc<Session>> {
        self.sessions.get(&id).cloned()
    }

    pub(crate) fn remove(&mut self, id: SessionId) -> Option<Arc<Session>> {
        self.sessions.remove(&id)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Arc<Session>> {
        self.sessions.values()
    }

    pub(crate) fn take_all(&mut self) -> Vec<Arc<Session>> {
        std::mem::take(&mut self.sessions).into_values().collect()
    }
}

// ============================================================================
// SESSION MANAGER CORE
// ============================================================================

/// Registry of live peer sessions
///
/// The `SessionManager` coordinates every accepted connection:
/// - Id allocation and registration
/// - Listing, lookup and removal
/// - Live attach/detach with buffer hand-off
/// - Command capture over the raw stream
///
/// Instances are independent; nothing is process-global.
pub struct SessionManager {
    pub(crate) sessions: Arc<RwLock<SessionTable>>,
    pub(crate) observer: ObserverHub,
}

impl SessionManager {
    /// Create an empty manager reporting to `observer`
    #[must_use]
    pub fn new(observer: ObserverHub) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(SessionTable::new())),
            observer,
        }
    }

    /// Close and evict every session
    ///
    /// Used at shutdown. No observer notifications are sent for sessions
    /// closed this way. Returns how many sessions were closed.
    pub fn close_all(&self) -> usize {
        log::info!("Shutting down SessionManager...");

        let sessions = self.sessions.write().take_all();
        for session in &sessions {
            log::debug!("Closing session: {}", session.id());
            session.close();
        }

        log::info!("SessionManager shutdown complete");
        sessions.len()
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new(ObserverHub::disabled())
    }
}
