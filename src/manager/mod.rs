//! Peer session management
//!
//! Provides `SessionManager` for registering, listing, attaching to and
//! driving TCP peer sessions, with per-session output buffering while no
//! controller is attached.
//!
//! # Module Structure
//!
//! - `session_manager` - Core `SessionManager` with public API
//! - `session` - Per-session state and buffer hand-off
//! - `controller` - Attach state machine for one controller
//! - `commands` - Command protocol for the session worker
//! - `worker` - Per-session socket task
//! - `helpers` - Pure helpers for captured output

mod commands;
mod controller;
mod helpers;
mod session;
mod session_manager;
mod worker;

pub use controller::{AttachController, ControllerState};
pub use helpers::{NO_RESPONSE, TRUNCATION_MARKER, is_prompt_line, render_capture};
pub use session::{LiveSink, Session};
pub use session_manager::{CaptureOptions, SessionManager};
