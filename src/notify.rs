//! Notification delivery.
//!
//! The poll cycle sends one notification per new entry through a
//! [`NotificationSink`].  [`LogSink`] writes them to the log; [`GotifySink`]
//! pushes them to a Gotify server.

use std::time::Duration;

use anyhow::{Context, Result};
use serde::Serialize;

/// Delivers a single notification.
pub trait NotificationSink: Send + Sync {
    fn send(&self, title: &str, message: &str) -> Result<()>;
}

/// Emits each notification as an `info` event.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl NotificationSink for LogSink {
    fn send(&self, title: &str, message: &str) -> Result<()> {
        tracing::info!(%title, %message, "new feed entry");
        Ok(())
    }
}

#[derive(Serialize)]
struct GotifyMessage<'a> {
    title: &'a str,
    message: &'a str,
    priority: u8,
}

/// Pushes notifications to a Gotify server's `/message` endpoint.
pub struct GotifySink {
    endpoint: String,
    token: String,
    priority: u8,
    client: reqwest::blocking::Client,
}

impl GotifySink {
    /// `server` is the base URL of the Gotify instance, `token` an
    /// application token.
    pub fn new(server: &str, token: impl Into<String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("building gotify client")?;
        Ok(Self {
            endpoint: format!("{}/message", server.trim_end_matches('/')),
            token: token.into(),
            priority: 5,
            client,
        })
    }

    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority;
        self
    }
}

impl NotificationSink for GotifySink {
    fn send(&self, title: &str, message: &str) -> Result<()> {
        self.client
            .post(&self.endpoint)
            .header("X-Gotify-Key", &self.token)
            .json(&GotifyMessage {
                title,
                message,
                priority: self.priority,
            })
            .send()
            .with_context(|| format!("posting to {}", self.endpoint))?
            .error_for_status()?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
