//! Manual session removal

use crate::error::{LinkError, Result};
use crate::types::{SessionEvent, SessionId, SessionSummary};

use super::core::SessionManager;

impl SessionManager {
    /// Close a session on operator request
    ///
    /// Evicts the session, tells its worker to drop the socket, and notifies
    /// observers. Closing an id that is not registered (never was, or already
    /// gone) returns `SessionNotFound` and changes nothing.
    pub fn close(&self, id: SessionId) -> Result<SessionSummary> {
        let session = self
            .sessions
            .write()
            .remove(id)
            .ok_or(LinkError::SessionNotFound(id))?;

        let summary = session.summary();
        session.close();

        log::info!("Connection manually closed: {} (ID: {id})", summary.address);
        self.observer
            .notify(SessionEvent::ManuallyClosed, id, &summary.address);
        Ok(summary)
    }
}
