//! Session registration
//!
//! Turns an accepted socket into a registered session with a running worker.

use std::sync::Arc;
use tokio::net::TcpStream;
use tokio::sync::mpsc;

use crate::manager::session::Session;
use crate::manager::worker::{WorkerContext, spawn_session_worker};
use crate::types::{SessionEvent, SessionSummary};

use super::core::SessionManager;

impl SessionManager {
    /// Register an accepted connection
    ///
    /// Allocates the next id, stores the session with an empty buffer in the
    /// detached state, spawns its worker and notifies observers. Must be
    /// called from within a tokio runtime.
    pub fn register(&self, stream: TcpStream, address: impl Into<String>) -> SessionSummary {
        let address = address.into();
        let (command_tx, command_rx) = mpsc::unbounded_channel();

        let session = {
            let mut table = self.sessions.write();
            let id = table.allocate_id();
            let session = Arc::new(Session::new(id, address, command_tx));
            table.insert(Arc::clone(&session));
            session
        };

        let summary = session.summary();
        log::info!(
            "New connection from {} (ID: {})",
            summary.address,
            summary.id
        );

        // Queued before the worker exists, so `Connected` always precedes `Disconnected`
        self.observer
            .notify(SessionEvent::Connected, summary.id, &summary.address);

        let ctx = WorkerContext {
            session,
            sessions: Arc::clone(&self.sessions),
            observer: self.observer.clone(),
        };
        spawn_session_worker(stream, command_rx, ctx);
        summary
    }
}
