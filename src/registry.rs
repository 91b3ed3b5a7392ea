//! Requester-to-session bindings for the external command channel

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::error::{LinkError, Result};
use crate::manager::SessionManager;
use crate::types::{AttachOutcome, RequesterId, SessionId, SessionSummary};

// Maps requester identity to the session it last selected
type BindingMap = HashMap<RequesterId, SessionId>;

/// Binding registry for command-channel requesters.
///
/// Each requester identity is bound to at most one session at a time.
/// Bindings don't install a live sink: the bound session keeps buffering so
/// the capture protocol can drain responses from it.
#[derive(Clone)]
pub struct BindingRegistry {
    bindings: Arc<Mutex<BindingMap>>,
    manager: Arc<SessionManager>,
}

impl BindingRegistry {
    /// Create a new binding registry over the given SessionManager.
    pub fn new(manager: Arc<SessionManager>) -> Self {
        Self {
            bindings: Arc::new(Mutex::new(HashMap::new())),
            manager,
        }
    }

    /// Bind `requester` to session `id`, replacing any earlier binding
    ///
    /// Output buffered by the session so far is drained and returned once.
    pub async fn bind(&self, requester: &RequesterId, id: SessionId) -> Result<AttachOutcome> {
        let mut bindings = self.bindings.lock().await;
        let session = self
            .manager
            .find(id)
            .ok_or(LinkError::SessionNotFound(id))?;
        let buffered = self.manager.drain(id)?;
        bindings.insert(requester.clone(), id);
        log::debug!("Requester {requester} bound to session {id}");
        Ok(AttachOutcome {
            session: session.summary(),
            buffered,
        })
    }

    /// Session bound to `requester`, or `NotBound`
    pub async fn get_session_id(&self, requester: &RequesterId) -> Result<SessionId> {
        self.bindings
            .lock()
            .await
            .get(requester)
            .copied()
            .ok_or_else(|| LinkError::NotBound(requester.clone()))
    }

    /// Remove a requester's binding
    pub async fn unbind(&self, requester: &RequesterId) -> Option<SessionId> {
        self.bindings.lock().await.remove(requester)
    }

    /// All sessions, in accept order
    pub fn list_all(&self) -> Vec<SessionSummary> {
        self.manager.list()
    }

    /// Get reference to SessionManager
    pub fn manager(&self) -> &Arc<SessionManager> {
        &self.manager
    }

    /// Drop every binding that points at session `id` (called once it is gone)
    pub async fn cleanup_session(&self, id: SessionId) -> usize {
        let mut bindings = self.bindings.lock().await;
        let before = bindings.len();
        bindings.retain(|requester, bound| {
            let keep = *bound != id;
            if !keep {
                log::debug!("Releasing binding of {requester} to closed session {id}");
            }
            keep
        });
        before - bindings.len()
    }
}
