//! Session manager implementation
//!
//! This module is organized into logical submodules:
//! - `core`: Core struct, session table, and shutdown
//! - `register`: Registration of accepted connections
//! - `query`: Listing and lookup
//! - `close`: Manual removal
//! - `interaction`: Attach, detach, drain, and writes
//! - `capture`: Command/response capture

mod capture;
mod close;
mod core;
mod interaction;
mod query;
mod register;

pub use capture::CaptureOptions;
pub use self::core::SessionManager;
pub(crate) use self::core::SessionTable;
