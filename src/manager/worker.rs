//! Per-session worker task
//!
//! Contains the task that owns a session's socket: it reads peer output into
//! the session (buffer or live sink), performs queued writes, and cleans up
//! when the connection ends.

use parking_lot::RwLock;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;

use super::commands::SessionCommand;
use super::session::Session;
use super::session_manager::SessionTable;
use crate::error::LinkError;
use crate::observer::ObserverHub;
use crate::types::SessionEvent;

/// Read buffer size per socket read
const READ_CHUNK_SIZE: usize = 1024;

/// Shared state for a session worker
pub(super) struct WorkerContext {
    pub session: Arc<Session>,
    pub sessions: Arc<RwLock<SessionTable>>,
    pub observer: ObserverHub,
}

/// Why a worker loop ended
enum Exit {
    /// Peer hung up or the socket failed
    Disconnected,
    /// Session was closed locally (manual close or shutdown)
    Cancelled,
}

/// Spawn the worker task for a freshly registered session
///
/// The task runs until the peer disconnects, a socket operation fails, or
/// the session is cancelled. A broken connection is never retried.
pub(super) fn spawn_session_worker(
    mut stream: TcpStream,
    mut command_rx: mpsc::UnboundedReceiver<SessionCommand>,
    ctx: WorkerContext,
) {
    tokio::spawn(async move {
        let id = ctx.session.id();
        let cancel = ctx.session.cancel_token();
        let mut buf = [0u8; READ_CHUNK_SIZE];

        let exit = {
            let (mut reader, mut writer) = stream.split();
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break Exit::Cancelled,

                    Some(cmd) = command_rx.recv() => {
                        match cmd {
                            SessionCommand::Write { data, response_tx } => {
                                // A peer that stops reading must not keep a closed session alive
                                let result = tokio::select! {
                                    result = async {
                                        writer.write_all(&data).await?;
                                        writer.flush().await
                                    } => result,
                                    _ = cancel.cancelled() => {
                                        let _ = response_tx.send(Err(LinkError::SessionClosed(id)));
                                        break Exit::Cancelled;
                                    }
                                };
                                match result {
                                    Ok(()) => {
                                        let _ = response_tx.send(Ok(()));
                                    }
                                    Err(e) => {
                                        log::debug!("[{id}] Write error: {e}");
                                        let _ = response_tx.send(Err(LinkError::Io(e)));
                                        break Exit::Disconnected;
                                    }
                                }
                            }
                        }
                    }

                    result = reader.read(&mut buf) => {
                        match result {
                            Ok(0) => break Exit::Disconnected,
                            Ok(n) => ctx.session.accept_chunk(&buf[..n]),
                            Err(e) => {
                                log::debug!("[{id}] Read error: {e}");
                                break Exit::Disconnected;
                            }
                        }
                    }
                }
            }
        };

        let _ = stream.shutdown().await;
        drop(stream);

        match exit {
            Exit::Cancelled => {
                log::debug!("[{id}] Session worker cancelled");
            }
            Exit::Disconnected => {
                // Only report if nobody else removed the session first
                let removed = ctx.sessions.write().remove(id);
                if let Some(session) = removed {
                    log::info!("Connection closed: {} (ID: {id})", session.address());
                    ctx.observer
                        .notify(SessionEvent::Disconnected, id, session.address());
                }
            }
        }
    });
}
