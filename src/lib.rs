//! # stellarlink
//!
//! A multi-session TCP rendezvous point. Remote peers connect over plain TCP;
//! each connection becomes a numbered session whose output is buffered until
//! a controller attaches. The operator console attaches to one session at a
//! time, reads what it buffered, and forwards keystrokes to it. An external
//! command channel (a chat bot, say) can bind to a session and run commands
//! with approximate request/response semantics.
//!
//! Bytes are relayed verbatim: there is no framing, encryption or
//! acknowledgement scheme.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use stellarlink::{SessionManager, server};
//! use stellarlink::observer::ObserverHub;
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (observer, _delivery) = ObserverHub::builder()
//!         .add_callback(ObserverHub::log_callback())
//!         .spawn();
//!     let manager = Arc::new(SessionManager::new(observer));
//!
//!     let listener = server::bind("127.0.0.1:8080").await?;
//!     let cancel = CancellationToken::new();
//!     tokio::spawn(server::run_listener(listener, Arc::clone(&manager), cancel.clone()));
//!
//!     for session in manager.list() {
//!         log::info!("{session}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Capturing command output
//!
//! Peers send no end-of-response marker, so [`SessionManager::capture`]
//! clears the session buffer, writes the command, waits a quiescence
//! interval and drains whatever arrived:
//!
//! ```no_run
//! # use stellarlink::{CaptureOptions, SessionManager, SessionId};
//! # async fn example(manager: &SessionManager) -> stellarlink::Result<()> {
//! let output = manager
//!     .capture(SessionId::new(1), "whoami", &CaptureOptions::default())
//!     .await?;
//! log::info!("{output}");
//! # Ok(())
//! # }
//! ```
//!
//! This is a heuristic: output arriving after the window is attributed to
//! the next command.
//!
//! ## Architecture
//!
//! - [`manager`]: session registry, per-session worker, attach controller,
//!   capture protocol
//! - [`registry`]: requester-to-session bindings
//! - [`channel`]: external command channel operations
//! - [`console`]: line-oriented operator console
//! - [`server`]: listener loop
//! - [`observer`]: notification queue and delivery task
//! - [`config`]: JSON configuration
//! - [`types`]: identifiers, snapshots, notifications
//! - [`error`]: error types
//!
//! ## Feature Flags
//!
//! - `http` (default) - webhook observer via `reqwest`

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod channel;
pub mod config;
pub mod console;
pub mod error;
pub mod manager;
pub mod observer;
pub mod registry;
pub mod server;
pub mod types;

// Re-export commonly used types for external API
pub use channel::CommandChannel;
pub use config::LinkConfig;
pub use error::{LinkError, Result};
pub use manager::{AttachController, CaptureOptions, ControllerState, SessionManager};
pub use observer::ObserverHub;
pub use registry::BindingRegistry;
pub use types::{AttachOutcome, Notification, RequesterId, SessionEvent, SessionId, SessionSummary};

/// Version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
