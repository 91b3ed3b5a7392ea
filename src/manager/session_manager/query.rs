//! Session listing and lookup

use std::sync::Arc;

use crate::manager::session::Session;
use crate::types::{SessionId, SessionSummary};

use super::core::SessionManager;

impl SessionManager {
    /// List all live sessions in accept order
    ///
    /// The registry lock is held only while the session handles are copied.
    #[must_use]
    pub fn list(&self) -> Vec<SessionSummary> {
        let sessions: Vec<Arc<Session>> = self.sessions.read().iter().cloned().collect();
        sessions.iter().map(|s| s.summary()).collect()
    }

    /// Look up a live session
    #[must_use]
    pub fn find(&self, id: SessionId) -> Option<Arc<Session>> {
        self.sessions.read().get(id)
    }

    /// Number of live sessions
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.read().iter().count()
    }

    /// Whether no sessions are live
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
