//! Session state structures
//!
//! A `Session` is shared between its worker task, the registry and any
//! controller that holds it. The pending buffer and the live sink sit behind
//! one lock so a chunk is either buffered or forwarded, never both.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;

use super::commands::SessionCommand;
use crate::error::{LinkError, Result};
use crate::types::{SessionId, SessionSummary};

/// Destination for live output while a controller is attached
pub type LiveSink = mpsc::UnboundedSender<String>;

/// Buffer and attachment state, guarded together
#[derive(Default)]
struct OutputState {
    /// Bytes received while detached, in read order
    pending: Vec<u8>,
    /// Live sink of the attached controller, if any
    sink: Option<LiveSink>,
}

impl OutputState {
    fn live_sink(&mut self) -> Option<&LiveSink> {
        // A sink whose receiver is gone counts as detached
        if self.sink.as_ref().is_some_and(LiveSink::is_closed) {
            self.sink = None;
        }
        self.sink.as_ref()
    }
}

/// One registered peer connection
pub struct Session {
    id: SessionId,
    address: String,
    connected_at: DateTime<Utc>,
    output: Mutex<OutputState>,
    command_tx: mpsc::UnboundedSender<SessionCommand>,
    cancel: CancellationToken,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("address", &self.address)
            .field("connected_at", &self.connected_at)
            .finish_non_exhaustive()
    }
}

impl Session {
    pub(super) fn new(
        id: SessionId,
        address: String,
        command_tx: mpsc::UnboundedSender<SessionCommand>,
    ) -> Self {
        Self {
            id,
            address,
            connected_at: Utc::now(),
            output: Mutex::new(OutputState::default()),
            command_tx,
            cancel: CancellationToken::new(),
        }
    }

    /// Session number
    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Peer address
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Accept time
    #[must_use]
    pub fn connected_at(&self) -> DateTime<Utc> {
        self.connected_at
    }

    /// Whether a controller is receiving live output
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.output.lock().live_sink().is_some()
    }

    /// Number of buffered bytes not yet drained
    #[must_use]
    pub fn pending_bytes(&self) -> usize {
        self.output.lock().pending.len()
    }

    /// Snapshot for listings
    #[must_use]
    pub fn summary(&self) -> SessionSummary {
        let mut output = self.output.lock();
        let attached = output.live_sink().is_some();
        SessionSummary {
            id: self.id,
            address: self.address.clone(),
            connected_at: self.connected_at,
            attached,
            pending_bytes: output.pending.len(),
        }
    }

    /// Route one chunk read from the socket
    pub(super) fn accept_chunk(&self, chunk: &[u8]) {
        let mut output = self.output.lock();
        if let Some(sink) = output.live_sink() {
            let text = String::from_utf8_lossy(chunk).into_owned();
            match sink.send(text) {
                Ok(()) => return,
                Err(_) => output.sink = None,
            }
        }
        output.pending.extend_from_slice(chunk);
    }

    /// Install a live sink and hand over the buffered output in one step
    pub(super) fn attach_sink(&self, sink: LiveSink) -> Result<String> {
        let mut output = self.output.lock();
        if let Some(current) = output.live_sink()
            && !current.same_channel(&sink)
        {
            return Err(LinkError::AlreadyAttached(self.id));
        }
        output.sink = Some(sink);
        let buffered = std::mem::take(&mut output.pending);
        Ok(String::from_utf8_lossy(&buffered).into_owned())
    }

    /// Remove the live sink if it belongs to the caller
    ///
    /// Returns whether a sink was removed.
    pub(super) fn detach_sink(&self, sink: &LiveSink) -> bool {
        let mut output = self.output.lock();
        if output.sink.as_ref().is_some_and(|s| s.same_channel(sink)) {
            output.sink = None;
            true
        } else {
            false
        }
    }

    /// Take everything buffered so far
    pub(super) fn drain(&self) -> String {
        let buffered = std::mem::take(&mut self.output.lock().pending);
        String::from_utf8_lossy(&buffered).into_owned()
    }

    /// Discard everything buffered so far
    pub(super) fn clear(&self) {
        self.output.lock().pending.clear();
    }

    /// Write `line` plus a line terminator to the peer
    pub(super) async fn write_line(&self, line: &str) -> Result<()> {
        let mut data = Vec::with_capacity(line.len() + 1);
        data.extend_from_slice(line.as_bytes());
        data.push(b'\n');

        let (response_tx, response_rx) = oneshot::channel();
        self.command_tx
            .send(SessionCommand::Write { data, response_tx })
            .map_err(|_| LinkError::SessionClosed(self.id))?;

        response_rx
            .await
            .map_err(|_| LinkError::SessionClosed(self.id))?
    }

    /// Ask the worker to drop the socket
    pub(super) fn close(&self) {
        self.cancel.cancel();
    }

    pub(super) fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }
}
