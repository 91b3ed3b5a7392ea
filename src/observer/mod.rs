//! Observer notifications for session events and command results
//!
//! The core never calls observers directly. Notifications are pushed onto a
//! bounded queue and a dedicated delivery task invokes the registered
//! callbacks, so a slow or failing integration can't stall session handling.
//! When the queue is full the notification is dropped and logged.

#[cfg(feature = "http")]
pub mod webhook;

use futures::future::BoxFuture;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;

use crate::config::DEFAULT_OBSERVER_QUEUE;
use crate::error::Result;
use crate::types::{Notification, RequesterId, SessionEvent, SessionId};

/// Callback invoked by the delivery task for every notification
pub type ObserverCallback =
    Arc<dyn Fn(Notification) -> BoxFuture<'static, Result<()>> + Send + Sync>;

/// Cheap, cloneable handle for emitting notifications
#[derive(Clone, Default)]
pub struct ObserverHub {
    tx: Option<mpsc::Sender<Notification>>,
}

impl ObserverHub {
    /// A hub with no delivery task; every notification is discarded
    #[must_use]
    pub fn disabled() -> Self {
        Self { tx: None }
    }

    /// Start building a hub
    #[must_use]
    pub fn builder() -> ObserverHubBuilder {
        ObserverHubBuilder::new()
    }

    /// Report a session lifecycle event
    pub fn notify(&self, event: SessionEvent, id: SessionId, address: &str) {
        self.enqueue(Notification::Session {
            event,
            id,
            address: address.to_string(),
        });
    }

    /// Hand a command result to the requester's delivery path
    pub fn deliver_result(&self, requester: &RequesterId, command: &str, output: &str) {
        self.enqueue(Notification::CommandResult {
            requester: requester.clone(),
            command: command.to_string(),
            output: output.to_string(),
        });
    }

    fn enqueue(&self, notification: Notification) {
        let Some(tx) = &self.tx else {
            return;
        };
        match tx.try_send(notification) {
            Ok(()) => {}
            Err(TrySendError::Full(dropped)) => {
                log::warn!("Observer queue full, dropping notification: {dropped}");
            }
            Err(TrySendError::Closed(dropped)) => {
                log::debug!("Observer delivery task gone, dropping notification: {dropped}");
            }
        }
    }

    /// Create an observer callback from a closure
    pub fn callback<F, Fut>(f: F) -> ObserverCallback
    where
        F: Fn(Notification) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Result<()>> + Send + 'static,
    {
        Arc::new(move |notification| Box::pin(f(notification)))
    }

    /// Callback that writes every notification to the log
    #[must_use]
    pub fn log_callback() -> ObserverCallback {
        Self::callback(|notification| async move {
            log::info!("{notification}");
            Ok(())
        })
    }
}

/// Builder for an [`ObserverHub`] and its delivery task
pub struct ObserverHubBuilder {
    capacity: usize,
    callbacks: Vec<ObserverCallback>,
}

impl ObserverHubBuilder {
    /// Create a builder with the default queue depth and no callbacks
    #[must_use]
    pub fn new() -> Self {
        Self {
            capacity: DEFAULT_OBSERVER_QUEUE,
            callbacks: Vec::new(),
        }
    }

    /// Set the queue depth (clamped to at least 1)
    #[must_use]
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self
    }

    /// Add a callback
    #[must_use]
    pub fn add_callback(mut self, callback: ObserverCallback) -> Self {
        self.callbacks.push(callback);
        self
    }

    /// Spawn the delivery task and return the hub handle
    ///
    /// The task ends once every hub clone has been dropped and the queue is
    /// drained.
    #[must_use]
    pub fn spawn(self) -> (ObserverHub, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::channel::<Notification>(self.capacity);
        let callbacks = self.callbacks;

        let handle = tokio::spawn(async move {
            while let Some(notification) = rx.recv().await {
                for callback in &callbacks {
                    if let Err(e) = callback(notification.clone()).await {
                        log::warn!("Observer delivery failed: {e}");
                    }
                }
            }
            log::debug!("Observer delivery task stopped");
        });

        (ObserverHub { tx: Some(tx) }, handle)
    }
}

impl Default for ObserverHubBuilder {
    fn default() -> Self {
        Self::new()
    }
}
