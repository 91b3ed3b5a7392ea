//! Type definitions for stellarlink
//!
//! - [`identifiers`] - Type-safe ID wrappers (`SessionId`, `RequesterId`)
//! - [`session`] - Session snapshots and attach results
//! - [`events`] - Observer notifications

pub mod events;
pub mod identifiers;
pub mod session;

// Re-export commonly used types
pub use events::{Notification, SessionEvent};
pub use identifiers::{RequesterId, SessionId};
pub use session::{AttachOutcome, SessionSummary};
