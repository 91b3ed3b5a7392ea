//! Attach controller
//!
//! Tracks which session one controller (the operator console) is driving.
//! Each controller owns a live sink; attaching installs that sink on the
//! session, which is how exclusivity between controllers is enforced.

use std::sync::Arc;

use super::session::LiveSink;
use super::session_manager::SessionManager;
use crate::error::{LinkError, Result};
use crate::types::{AttachOutcome, SessionId};

/// Controller state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    /// Not driving any session
    Detached,
    /// Receiving live output from and sending input to a session
    Attached(SessionId),
}

/// Single-owner attach state machine for one controller
pub struct AttachController {
    manager: Arc<SessionManager>,
    sink: LiveSink,
    state: ControllerState,
}

impl AttachController {
    /// Create a detached controller that forwards live output to `sink`
    #[must_use]
    pub fn new(manager: Arc<SessionManager>, sink: LiveSink) -> Self {
        Self {
            manager,
            sink,
            state: ControllerState::Detached,
        }
    }

    /// Current state
    #[must_use]
    pub fn state(&self) -> ControllerState {
        self.state
    }

    /// Session currently attached, if any
    #[must_use]
    pub fn attached_session(&self) -> Option<SessionId> {
        match self.state {
            ControllerState::Attached(id) => Some(id),
            ControllerState::Detached => None,
        }
    }

    /// Attach to a session and take its buffered output
    ///
    /// Any previous attachment is released first. On failure the controller
    /// is left detached.
    ///
    /// # Errors
    /// `SessionNotFound` for an unknown id, `AlreadyAttached` if another
    /// controller holds the session
    pub fn attach(&mut self, id: SessionId) -> Result<AttachOutcome> {
        self.detach();
        let outcome = self.manager.attach_live(id, self.sink.clone())?;
        self.state = ControllerState::Attached(id);
        Ok(outcome)
    }

    /// Send one line of input to the attached session
    ///
    /// A failed write detaches the controller before the error is returned.
    ///
    /// # Errors
    /// `NotAttached` when detached, otherwise the write failure
    pub async fn send(&mut self, line: &str) -> Result<()> {
        let id = self.attached_session().ok_or(LinkError::NotAttached)?;
        if let Err(e) = self.manager.send_line(id, line).await {
            self.detach();
            return Err(e);
        }
        Ok(())
    }

    /// Return to the detached state; the session resumes buffering
    ///
    /// Returns the session that was attached, if any.
    pub fn detach(&mut self) -> Option<SessionId> {
        let id = self.attached_session()?;
        self.manager.detach_live(id, &self.sink);
        self.state = ControllerState::Detached;
        Some(id)
    }
}

impl Drop for AttachController {
    fn drop(&mut self) {
        self.detach();
    }
}
