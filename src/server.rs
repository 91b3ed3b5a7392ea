//! TCP listener loop

use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::error::{LinkError, Result};
use crate::manager::SessionManager;

/// Pause after a failed accept so a persistent error can't spin the loop
const ACCEPT_ERROR_BACKOFF: Duration = Duration::from_millis(100);

/// Bind the listening socket
///
/// # Errors
/// `Bind` if the address can't be bound; this is fatal at startup
pub async fn bind(address: &str) -> Result<TcpListener> {
    let listener = TcpListener::bind(address)
        .await
        .map_err(|e| LinkError::bind(address, e))?;
    log::info!("Listening on {address}");
    Ok(listener)
}

/// Accept connections until `cancel` fires, registering each one
///
/// Accept errors are logged and the loop keeps going.
pub async fn run_listener(
    listener: TcpListener,
    manager: Arc<SessionManager>,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                log::debug!("Listener received cancel signal, stopping accept loop");
                break;
            }
            result = listener.accept() => {
                match result {
                    Ok((stream, addr)) => {
                        manager.register(stream, addr.to_string());
                    }
                    Err(e) => {
                        log::error!("Error accepting connection: {e}");
                        tokio::time::sleep(ACCEPT_ERROR_BACKOFF).await;
                    }
                }
            }
        }
    }
}
