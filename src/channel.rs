//! External command channel
//!
//! The three operations a chat/bot integration needs: list sessions, bind
//! the requester to a session, and run a command on the bound session. Every
//! call produces exactly one reply text; failures are rendered into the
//! reply instead of being returned, so a requester is never left waiting.

use std::collections::HashSet;
use std::sync::Arc;

use crate::error::{LinkError, Result};
use crate::manager::{CaptureOptions, SessionManager};
use crate::observer::ObserverHub;
use crate::registry::BindingRegistry;
use crate::types::{RequesterId, SessionId};

/// Command channel front end over a [`SessionManager`]
pub struct CommandChannel {
    bindings: BindingRegistry,
    observer: ObserverHub,
    options: CaptureOptions,
    allowed: Option<HashSet<RequesterId>>,
}

impl CommandChannel {
    /// Create a channel open to every requester
    #[must_use]
    pub fn new(manager: Arc<SessionManager>, observer: ObserverHub, options: CaptureOptions) -> Self {
        Self {
            bindings: BindingRegistry::new(manager),
            observer,
            options,
            allowed: None,
        }
    }

    /// Restrict the channel to the given requesters
    #[must_use]
    pub fn with_allow_list(mut self, allowed: impl IntoIterator<Item = RequesterId>) -> Self {
        self.allowed = Some(allowed.into_iter().collect());
        self
    }

    /// Binding registry backing this channel
    #[must_use]
    pub fn bindings(&self) -> &BindingRegistry {
        &self.bindings
    }

    fn authorize(&self, requester: &RequesterId) -> Result<()> {
        match &self.allowed {
            Some(allowed) if !allowed.contains(requester) => {
                log::warn!("Rejected command channel request from {requester}");
                Err(LinkError::Unauthorized(requester.clone()))
            }
            _ => Ok(()),
        }
    }

    /// Reply listing every live session
    pub fn list_sessions(&self, requester: &RequesterId) -> String {
        if let Err(e) = self.authorize(requester) {
            return e.to_string();
        }

        let sessions = self.bindings.list_all();
        if sessions.is_empty() {
            return "No active connections".to_string();
        }

        let mut reply = String::from("Active connections:");
        for session in sessions {
            reply.push_str(&format!("\n  {session}"));
        }
        reply
    }

    /// Bind the requester to the session named by `id_text`
    ///
    /// The reply includes any output the session buffered before binding.
    pub async fn bind(&self, requester: &RequesterId, id_text: &str) -> String {
        match self.try_bind(requester, id_text).await {
            Ok(reply) => reply,
            Err(e) => e.to_string(),
        }
    }

    async fn try_bind(&self, requester: &RequesterId, id_text: &str) -> Result<String> {
        self.authorize(requester)?;
        let id: SessionId = id_text
            .parse()
            .map_err(|_| LinkError::invalid_input("Invalid ID"))?;

        let outcome = self.bindings.bind(requester, id).await?;
        let mut reply = format!(
            "Selected connection {} ({})",
            outcome.session.id, outcome.session.address
        );
        let buffered = outcome.buffered.trim();
        if !buffered.is_empty() {
            reply.push_str("\nBuffered messages:\n");
            reply.push_str(buffered);
        }
        Ok(reply)
    }

    /// Release the requester's binding
    pub async fn unbind(&self, requester: &RequesterId) -> String {
        match self.bindings.unbind(requester).await {
            Some(id) => format!("Released connection {id}"),
            None => LinkError::NotBound(requester.clone()).to_string(),
        }
    }

    /// Run `command` on the requester's bound session
    ///
    /// The rendered output (or the failure message) is returned and also
    /// handed to observers as a command result.
    pub async fn run(&self, requester: &RequesterId, command: &str) -> String {
        let output = match self.try_run(requester, command).await {
            Ok(output) => output,
            Err(e) => format!("Error: {e}"),
        };
        self.observer.deliver_result(requester, command, &output);
        output
    }

    async fn try_run(&self, requester: &RequesterId, command: &str) -> Result<String> {
        self.authorize(requester)?;
        let id = self.bindings.get_session_id(requester).await?;

        match self
            .bindings
            .manager()
            .capture(id, command, &self.options)
            .await
        {
            Err(e @ (LinkError::SessionNotFound(_) | LinkError::SessionClosed(_))) => {
                self.bindings.cleanup_session(id).await;
                Err(e)
            }
            other => other,
        }
    }
}
