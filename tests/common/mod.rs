//! Shared helpers for integration tests

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use stellarlink::observer::ObserverHub;
use stellarlink::{Notification, SessionManager, server};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Upper bound for any single wait in tests
pub const WAIT_LIMIT: Duration = Duration::from_secs(5);

/// A running listener on an ephemeral loopback port
pub struct TestServer {
    pub manager: Arc<SessionManager>,
    pub addr: SocketAddr,
    pub cancel: CancellationToken,
}

impl TestServer {
    /// Start a listener reporting to `observer`
    pub async fn start(observer: ObserverHub) -> Self {
        let _ = env_logger::builder().is_test(true).try_init();

        let listener = server::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let manager = Arc::new(SessionManager::new(observer));
        let cancel = CancellationToken::new();
        tokio::spawn(server::run_listener(
            listener,
            Arc::clone(&manager),
            cancel.clone(),
        ));

        Self {
            manager,
            addr,
            cancel,
        }
    }

    /// Start a listener with observers disabled
    pub async fn start_quiet() -> Self {
        Self::start(ObserverHub::disabled()).await
    }

    /// Connect a peer and wait until the manager has registered it
    pub async fn connect(&self) -> TcpStream {
        let before = self.manager.len();
        let stream = TcpStream::connect(self.addr).await.unwrap();
        let manager = Arc::clone(&self.manager);
        wait_until(move || manager.len() > before).await;
        stream
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.cancel.cancel();
        self.manager.close_all();
    }
}

/// Poll `cond` until it holds, panicking after [`WAIT_LIMIT`]
pub async fn wait_until<F>(cond: F)
where
    F: Fn() -> bool,
{
    let deadline = tokio::time::Instant::now() + WAIT_LIMIT;
    while !cond() {
        assert!(
            tokio::time::Instant::now() < deadline,
            "condition not met within {WAIT_LIMIT:?}"
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

/// Receive text chunks until their concatenation contains `needle`
pub async fn recv_until(rx: &mut mpsc::UnboundedReceiver<String>, needle: &str) -> String {
    let mut seen = String::new();
    tokio::time::timeout(WAIT_LIMIT, async {
        while !seen.contains(needle) {
            match rx.recv().await {
                Some(chunk) => seen.push_str(&chunk),
                None => break,
            }
        }
    })
    .await
    .unwrap_or_else(|_| panic!("did not receive {needle:?}, got {seen:?}"));
    seen
}

/// Observer hub whose notifications are forwarded to the returned receiver
pub fn recording_observer() -> (ObserverHub, mpsc::UnboundedReceiver<Notification>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let (hub, _delivery) = ObserverHub::builder()
        .add_callback(ObserverHub::callback(move |notification| {
            let tx = tx.clone();
            async move {
                let _ = tx.send(notification);
                Ok(())
            }
        }))
        .spawn();
    (hub, rx)
}

/// Next notification, panicking after [`WAIT_LIMIT`]
pub async fn next_notification(rx: &mut mpsc::UnboundedReceiver<Notification>) -> Notification {
    tokio::time::timeout(WAIT_LIMIT, rx.recv())
        .await
        .expect("no notification within limit")
        .expect("observer channel closed")
}
