//! Outbound delivery to irker and Discord webhooks.

use std::future::Future;
use std::time::Duration;

use github_notify::DiscordMessage;
use serde::Serialize;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("irker at {addr} unreachable: {source}")]
    IrkerConnect {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("irker at {addr} timed out")]
    IrkerTimeout { addr: String },

    #[error("Failed to write to irker: {0}")]
    IrkerWrite(#[source] std::io::Error),

    #[error("Failed to encode message: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Discord webhook request failed: {0}")]
    Discord(#[from] reqwest::Error),
}

/// Sends rendered notifications to their targets.
pub trait Deliver: Send + Sync + 'static {
    /// Sends every line of `message` to every irker target.
    fn send_irc(
        &self,
        targets: &[String],
        message: &str,
    ) -> impl Future<Output = Result<(), DeliveryError>> + Send;

    /// Posts `message` to every Discord webhook URL.
    fn send_discord(
        &self,
        webhooks: &[String],
        message: &DiscordMessage,
    ) -> impl Future<Output = Result<(), DeliveryError>> + Send;
}

/// irker's JSON request format, one object per line.
#[derive(Debug, Serialize)]
struct IrkerRequest<'a> {
    to: &'a str,
    privmsg: &'a str,
}

/// Newline-delimited irker requests for `message` to `targets`.
pub fn irker_payload(targets: &[String], message: &str) -> Result<String, serde_json::Error> {
    let mut payload = String::new();
    for target in targets {
        for line in message.lines().filter(|l| !l.is_empty()) {
            payload.push_str(&serde_json::to_string(&IrkerRequest {
                to: target,
                privmsg: line,
            })?);
            payload.push('\n');
        }
    }
    Ok(payload)
}

/// Production [`Deliver`]: irker over TCP, Discord over HTTPS.
#[derive(Debug, Clone)]
pub struct Relay {
    irker_addr: String,
    timeout: Duration,
    http: reqwest::Client,
}

impl Relay {
    pub fn new(irker_addr: impl Into<String>, timeout: Duration) -> Result<Self, DeliveryError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            irker_addr: irker_addr.into(),
            timeout,
            http,
        })
    }

    async fn write_irker(&self, payload: &[u8]) -> Result<(), DeliveryError> {
        let mut stream = TcpStream::connect(&self.irker_addr)
            .await
            .map_err(|source| DeliveryError::IrkerConnect {
                addr: self.irker_addr.clone(),
                source,
            })?;
        stream
            .write_all(payload)
            .await
            .map_err(DeliveryError::IrkerWrite)?;
        stream.shutdown().await.map_err(DeliveryError::IrkerWrite)?;
        Ok(())
    }
}

impl Deliver for Relay {
    async fn send_irc(&self, targets: &[String], message: &str) -> Result<(), DeliveryError> {
        let payload = irker_payload(targets, message)?;
        if payload.is_empty() {
            debug!("Nothing to send to irker");
            return Ok(());
        }

        tokio::time::timeout(self.timeout, self.write_irker(payload.as_bytes()))
            .await
            .map_err(|_| DeliveryError::IrkerTimeout {
                addr: self.irker_addr.clone(),
            })??;

        info!(targets = targets.len(), addr = %self.irker_addr, "Payload sent to irker");
        Ok(())
    }

    async fn send_discord(
        &self,
        webhooks: &[String],
        message: &DiscordMessage,
    ) -> Result<(), DeliveryError> {
        for webhook in webhooks {
            self.http
                .post(webhook)
                .json(message)
                .send()
                .await?
                .error_for_status()?;
        }

        info!(webhooks = webhooks.len(), "Payload sent to Discord");
        Ok(())
    }
}
