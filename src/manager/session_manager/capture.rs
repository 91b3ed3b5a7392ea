//! Command capture over a raw stream
//!
//! Peers send no end-of-response marker, so a command's response is
//! approximated as whatever arrives within a fixed quiescence window after
//! the write. Output that arrives later is attributed to the next command.

use std::time::Duration;

use crate::config::{DEFAULT_MAX_OUTPUT_CHARS, DEFAULT_QUIESCENCE_MS};
use crate::error::{LinkError, Result};
use crate::manager::helpers::render_capture;
use crate::types::SessionId;

use super::core::SessionManager;

/// Timing and size limits for [`SessionManager::capture`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureOptions {
    /// How long to wait after writing before draining the buffer
    pub quiescence: Duration,
    /// Longest response returned before truncation
    pub max_output_chars: usize,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            quiescence: Duration::from_millis(DEFAULT_QUIESCENCE_MS),
            max_output_chars: DEFAULT_MAX_OUTPUT_CHARS,
        }
    }
}

impl SessionManager {
    /// Run `command` on a session and return its rendered output
    ///
    /// Clears stale buffered output, writes the command, waits the full
    /// quiescence interval, then drains and renders whatever arrived. A
    /// write failure is returned immediately without waiting. Output only
    /// accumulates while no live controller is attached to the session.
    pub async fn capture(
        &self,
        id: SessionId,
        command: &str,
        options: &CaptureOptions,
    ) -> Result<String> {
        let session = self.find(id).ok_or(LinkError::SessionNotFound(id))?;

        session.clear();
        session.write_line(command).await?;

        tokio::time::sleep(options.quiescence).await;

        let raw = session.drain();
        log::debug!("[{id}] Captured {} bytes for command", raw.len());
        Ok(render_capture(&raw, options.max_output_chars))
    }
}
