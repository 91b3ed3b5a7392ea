//! Startup configuration
//!
//! Loaded once from a JSON document. A missing or malformed file is a fatal
//! startup error; every field has a default so `{}` is a valid config.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;

use crate::error::{LinkError, Result};

/// Default quiescence wait for captured commands (600 ms)
pub const DEFAULT_QUIESCENCE_MS: u64 = 600;

/// Default maximum length of a captured response, sized for chat message limits
pub const DEFAULT_MAX_OUTPUT_CHARS: usize = 1900;

/// Default observer queue depth
pub const DEFAULT_OBSERVER_QUEUE: usize = 64;

/// Top-level configuration document
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct LinkConfig {
    /// Listen host
    pub host: String,
    /// Listen port
    pub port: u16,
    /// Default log filter when `RUST_LOG` is unset
    pub log_level: String,
    /// Observer delivery settings
    pub observer: ObserverConfig,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            log_level: "info".to_string(),
            observer: ObserverConfig::default(),
        }
    }
}

/// Observer delivery settings
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ObserverConfig {
    /// Bounded queue depth between the core and the delivery task
    pub queue_capacity: usize,
    /// Chat webhook receiving `{"content": ...}` posts
    pub webhook_url: Option<String>,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            queue_capacity: DEFAULT_OBSERVER_QUEUE,
            webhook_url: None,
        }
    }
}

impl LinkConfig {
    /// Load and validate configuration from a JSON file
    ///
    /// # Errors
    /// Returns error if the file can't be read, isn't valid JSON, or fails validation
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            LinkError::invalid_config(format!("cannot read {}: {e}", path.display()))
        })?;
        let config = Self::from_json(&content)?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse and validate configuration from a JSON string
    ///
    /// # Errors
    /// Returns error if the JSON is malformed or fails validation
    pub fn from_json(content: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges that serde can't express
    ///
    /// # Errors
    /// Returns the first invalid field found
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(LinkError::invalid_config("host must not be empty"));
        }
        if self.port == 0 {
            return Err(LinkError::invalid_config("port must be between 1 and 65535"));
        }
        if self.observer.queue_capacity == 0 {
            return Err(LinkError::invalid_config(
                "observer.queue_capacity must be greater than zero",
            ));
        }
        if let Some(url) = &self.observer.webhook_url
            && !(url.starts_with("http://") || url.starts_with("https://"))
        {
            return Err(LinkError::invalid_config(format!(
                "observer.webhook_url must be an http(s) URL, got {url}"
            )));
        }
        Ok(())
    }

    /// Listen address as `host:port`
    #[must_use]
    pub fn listen_address(&self) -> String {
        match self.host.parse::<std::net::IpAddr>() {
            Ok(ip) => SocketAddr::new(ip, self.port).to_string(),
            Err(_) => format!("{}:{}", self.host, self.port),
        }
    }
}
