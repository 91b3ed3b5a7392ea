//! Session command protocol
//!
//! The worker task owns the socket; everything else reaches it through
//! these commands.

use tokio::sync::oneshot;

use crate::error::Result;

/// Commands that can be sent to a session worker
pub(super) enum SessionCommand {
    /// Write raw bytes to the peer
    Write {
        /// Bytes to write, line terminator included
        data: Vec<u8>,
        /// Channel to send the write result back
        response_tx: oneshot::Sender<Result<()>>,
    },
}
