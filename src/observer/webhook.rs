//! Chat webhook observer
//!
//! Posts each notification as `{"content": "..."}` JSON, the format accepted
//! by Discord-style incoming webhooks.

use std::time::Duration;

use serde_json::json;

use super::{ObserverCallback, ObserverHub};
use crate::error::{LinkError, Result};
use crate::types::Notification;

const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(10);

/// Webhook delivery target
#[derive(Clone, Debug)]
pub struct WebhookObserver {
    client: reqwest::Client,
    url: String,
}

impl WebhookObserver {
    /// Create a webhook observer for the given URL
    ///
    /// # Errors
    /// Returns error if the HTTP client can't be constructed
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(WEBHOOK_TIMEOUT)
            .build()
            .map_err(|e| LinkError::observer(format!("cannot build webhook client: {e}")))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// Post one notification
    ///
    /// # Errors
    /// Returns error on transport failure or a non-success status
    pub async fn post(&self, notification: &Notification) -> Result<()> {
        let body = json!({ "content": notification.to_string() });
        let response = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| LinkError::observer(format!("webhook request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LinkError::observer(format!(
                "webhook returned non-OK status: {status}"
            )));
        }
        Ok(())
    }

    /// Wrap this observer as a hub callback
    #[must_use]
    pub fn into_callback(self) -> ObserverCallback {
        ObserverHub::callback(move |notification| {
            let observer = self.clone();
            async move { observer.post(&notification).await }
        })
    }
}
