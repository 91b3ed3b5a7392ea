//! Observer notification types

use serde::{Deserialize, Serialize};
use std::fmt;

use super::identifiers::{RequesterId, SessionId};

/// Session lifecycle events reported to observers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionEvent {
    /// A peer connected and was registered
    Connected,
    /// The peer closed the connection or the socket failed
    Disconnected,
    /// An operator closed the session
    ManuallyClosed,
}

/// Message handed to the observer delivery task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Notification {
    /// Session lifecycle change
    Session {
        /// What happened
        event: SessionEvent,
        /// Session number
        id: SessionId,
        /// Peer address
        address: String,
    },
    /// Captured output of a command-channel request
    CommandResult {
        /// Who asked
        requester: RequesterId,
        /// Command text as sent to the peer
        command: String,
        /// Rendered output (or failure message)
        output: String,
    },
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Session {
                event: SessionEvent::Connected,
                id,
                address,
            } => write!(f, "🟢 New connection from {address} (ID: {id})"),
            Self::Session {
                event: SessionEvent::Disconnected,
                id,
                address,
            } => write!(f, "🔴 Connection closed: {address} (ID: {id})"),
            Self::Session {
                event: SessionEvent::ManuallyClosed,
                id,
                address,
            } => write!(f, "🔴 Connection manually closed: {address} (ID: {id})"),
            Self::CommandResult {
                command, output, ..
            } => write!(f, "$ {command}\n{output}"),
        }
    }
}
