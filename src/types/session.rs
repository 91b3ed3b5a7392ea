//! Session snapshot and response types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::identifiers::SessionId;

/// Point-in-time view of a registered session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Session number
    pub id: SessionId,
    /// Peer address as reported at accept time
    pub address: String,
    /// When the connection was accepted
    pub connected_at: DateTime<Utc>,
    /// Whether a controller is receiving live output
    pub attached: bool,
    /// Bytes buffered while detached and not yet drained
    pub pending_bytes: usize,
}

impl fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.id, self.address)
    }
}

/// Result of attaching a controller to a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachOutcome {
    /// Session that is now attached
    pub session: SessionSummary,
    /// Output buffered while detached; handed over exactly once
    pub buffered: String,
}
