//! Error types for stellarlink

use thiserror::Error;

use crate::types::identifiers::{RequesterId, SessionId};

/// Main error type for stellarlink
#[derive(Error, Debug)]
pub enum LinkError {
    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON decode error when parsing configuration
    #[error("JSON decode error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Listening address could not be bound
    #[error("Couldn't listen on {address}: {source}")]
    Bind {
        /// Address that was requested
        address: String,
        /// Underlying socket error
        #[source]
        source: std::io::Error,
    },

    /// No session with the given id is registered
    #[error("No connection with ID {0}")]
    SessionNotFound(SessionId),

    /// The session's socket is gone (peer disconnected or session closed)
    #[error("Connection {0} is closed")]
    SessionClosed(SessionId),

    /// Another controller is already receiving live output from the session
    #[error("Connection {0} is already attached to another controller")]
    AlreadyAttached(SessionId),

    /// Operation requires an attached controller
    #[error("No connection selected")]
    NotAttached,

    /// Requester has not bound a session yet
    #[error("Requester {0} has no connection selected")]
    NotBound(RequesterId),

    /// Requester is not on the command channel allow-list
    #[error("Requester {0} is not authorized")]
    Unauthorized(RequesterId),

    /// Observer delivery failure
    #[error("Observer error: {0}")]
    Observer(String),

    /// Malformed operator or requester input
    #[error("{0}")]
    InvalidInput(String),
}

/// Result type alias for stellarlink operations
pub type Result<T> = std::result::Result<T, LinkError>;

impl LinkError {
    /// Create an invalid configuration error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create a bind error for the given address
    pub fn bind(address: impl Into<String>, source: std::io::Error) -> Self {
        Self::Bind {
            address: address.into(),
            source,
        }
    }

    /// Create an observer error
    pub fn observer(msg: impl Into<String>) -> Self {
        Self::Observer(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
