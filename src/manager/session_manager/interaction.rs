//! Session interaction methods
//!
//! Live attach/detach with buffer hand-off, buffer draining, and writes.

use crate::error::{LinkError, Result};
use crate::manager::session::LiveSink;
use crate::types::{AttachOutcome, SessionId};

use super::core::SessionManager;

impl SessionManager {
    /// Start forwarding a session's output to `sink`
    ///
    /// Installing the sink and draining the buffer happen under the session
    /// lock, so every chunk lands either in the returned text or in the
    /// sink. Fails with `AlreadyAttached` if a different sink is live.
    pub fn attach_live(&self, id: SessionId, sink: LiveSink) -> Result<AttachOutcome> {
        let session = self.find(id).ok_or(LinkError::SessionNotFound(id))?;
        let buffered = session.attach_sink(sink)?;
        log::debug!("[{id}] Controller attached ({} bytes handed over)", buffered.len());
        Ok(AttachOutcome {
            session: session.summary(),
            buffered,
        })
    }

    /// Stop forwarding to `sink`; output is buffered again from now on
    ///
    /// Returns `false` if the session is gone or `sink` wasn't attached.
    pub fn detach_live(&self, id: SessionId, sink: &LiveSink) -> bool {
        let detached = self
            .find(id)
            .is_some_and(|session| session.detach_sink(sink));
        if detached {
            log::debug!("[{id}] Controller detached");
        }
        detached
    }

    /// Take a session's buffered output
    pub fn drain(&self, id: SessionId) -> Result<String> {
        let session = self.find(id).ok_or(LinkError::SessionNotFound(id))?;
        Ok(session.drain())
    }

    /// Write `line` followed by a newline to a session's peer
    pub async fn send_line(&self, id: SessionId, line: &str) -> Result<()> {
        let session = self.find(id).ok_or(LinkError::SessionNotFound(id))?;
        session.write_line(line).await
    }
}
