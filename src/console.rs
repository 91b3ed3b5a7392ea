//! Line-oriented operator console
//!
//! While detached the console reads menu commands (`list`, `select <id>`,
//! `close <id>`, `help`, `exit`). After `select` every line is passed through to
//! the selected session until the literal line `exit`.
//!
//! All console text and the attached session's live output share one output
//! channel, drained by a single writer task, so they never interleave
//! mid-chunk.

use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::{LinkError, Result};
use crate::manager::{AttachController, LiveSink, SessionManager};
use crate::types::SessionId;

const MENU: &str = "\nCommands:\n  list - Show all connections\n  select <id> - Select a connection\n  close <id> - Close a connection\n  help - Show this menu\n  exit - Exit the server\n> ";

const UNKNOWN_COMMAND: &str =
    "Unknown command. Type 'list', 'select <id>', 'close <id>', or 'exit'";

/// Parsed menu command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleCommand {
    /// Blank line
    Empty,
    /// Show all connections
    List,
    /// Attach to a connection
    Select(SessionId),
    /// Close a connection
    Close(SessionId),
    /// Show the menu again
    Help,
    /// Shut down
    Exit,
}

impl ConsoleCommand {
    /// Parse one menu line
    ///
    /// # Errors
    /// `InvalidInput` carrying the message to show the operator
    pub fn parse(line: &str) -> Result<Self> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some(&name) = parts.first() else {
            return Ok(Self::Empty);
        };

        match name {
            "list" => Ok(Self::List),
            "exit" => Ok(Self::Exit),
            "help" => Ok(Self::Help),
            "select" => parse_id(&parts, "select").map(Self::Select),
            "close" => parse_id(&parts, "close").map(Self::Close),
            _ => Err(LinkError::invalid_input(UNKNOWN_COMMAND)),
        }
    }
}

fn parse_id(parts: &[&str], name: &str) -> Result<SessionId> {
    if parts.len() != 2 {
        return Err(LinkError::invalid_input(format!("Usage: {name} <id>")));
    }
    parts[1]
        .parse()
        .map_err(|_| LinkError::invalid_input("Invalid ID"))
}

/// Whether the console keeps running after a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleFlow {
    /// Keep reading input
    Continue,
    /// Operator asked to exit
    Exit,
}

/// Interactive operator console
pub struct Console {
    manager: Arc<SessionManager>,
    controller: AttachController,
    out: LiveSink,
}

impl Console {
    /// Create a console writing to `out`
    ///
    /// `out` doubles as the live sink for the selected session.
    #[must_use]
    pub fn new(manager: Arc<SessionManager>, out: LiveSink) -> Self {
        let controller = AttachController::new(Arc::clone(&manager), out.clone());
        Self {
            manager,
            controller,
            out,
        }
    }

    /// Session currently selected, if any
    #[must_use]
    pub fn selected(&self) -> Option<SessionId> {
        self.controller.attached_session()
    }

    fn print(&self, text: impl Into<String>) {
        // Output writer gone means nobody is watching; nothing to report to
        let _ = self.out.send(text.into());
    }

    fn println(&self, text: impl AsRef<str>) {
        self.print(format!("{}\n", text.as_ref()));
    }

    fn prompt(&self) {
        if self.selected().is_some() {
            self.print("> ");
        } else {
            self.print(MENU);
        }
    }

    /// Read lines from `input` until `exit` or end of input
    ///
    /// Either way every session is closed before returning.
    ///
    /// # Errors
    /// Returns error if reading input fails
    pub async fn run<R>(&mut self, input: R) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = input.lines();
        loop {
            self.prompt();
            let Some(line) = lines.next_line().await? else {
                log::debug!("Console input closed");
                self.shutdown();
                return Ok(());
            };
            if self.handle_line(&line).await == ConsoleFlow::Exit {
                return Ok(());
            }
        }
    }

    /// Handle one line of operator input
    pub async fn handle_line(&mut self, line: &str) -> ConsoleFlow {
        if self.selected().is_some() {
            self.handle_passthrough(line).await;
            return ConsoleFlow::Continue;
        }

        match ConsoleCommand::parse(line.trim()) {
            Ok(ConsoleCommand::Empty) => {}
            Ok(ConsoleCommand::List) => self.list(),
            Ok(ConsoleCommand::Help) => self.print(MENU.trim_end_matches("> ")),
            Ok(ConsoleCommand::Select(id)) => self.select(id),
            Ok(ConsoleCommand::Close(id)) => match self.manager.close(id) {
                Ok(_) => self.println(format!("Closed connection {id}")),
                Err(e) => self.println(e.to_string()),
            },
            Ok(ConsoleCommand::Exit) => {
                self.shutdown();
                return ConsoleFlow::Exit;
            }
            Err(e) => self.println(e.to_string()),
        }
        ConsoleFlow::Continue
    }

    async fn handle_passthrough(&mut self, line: &str) {
        if line == "exit" {
            self.controller.detach();
            return;
        }
        if let Err(e) = self.controller.send(line).await {
            self.println(format!("Error writing to connection: {e}"));
        }
    }

    fn list(&self) {
        let mut text = String::from("\nActive connections:\n");
        for session in self.manager.list() {
            text.push_str(&format!("  {session}\n"));
        }
        self.print(text);
    }

    fn select(&mut self, id: SessionId) {
        match self.controller.attach(id) {
            Ok(outcome) => {
                if !outcome.buffered.is_empty() {
                    self.print(format!("\nBuffered messages:\n{}", outcome.buffered));
                }
                self.println(format!(
                    "\nConnected to {} (ID: {}). Type 'exit' to return to connection menu.",
                    outcome.session.address, outcome.session.id
                ));
            }
            Err(e) => self.println(e.to_string()),
        }
    }

    fn shutdown(&mut self) {
        self.println("Shutting down server...");
        self.controller.detach();
        let closed = self.manager.close_all();
        log::debug!("Closed {closed} session(s) on exit");
    }
}

/// Spawn the task that owns the console's output stream
///
/// Returns the sender to hand to [`Console::new`]. The task ends when every
/// sender is dropped.
pub fn spawn_output_writer<W>(mut writer: W) -> (LiveSink, JoinHandle<()>)
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    let handle = tokio::spawn(async move {
        while let Some(text) = rx.recv().await {
            let result = async {
                writer.write_all(text.as_bytes()).await?;
                writer.flush().await
            }
            .await;
            if let Err(e) = result {
                log::warn!("Console output failed: {e}");
                break;
            }
        }
    });
    (tx, handle)
}
