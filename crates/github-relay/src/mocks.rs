use std::sync::{Arc, Mutex};

use github_notify::DiscordMessage;

use crate::deliver::{Deliver, DeliveryError};

#[derive(Clone, Debug, PartialEq)]
pub struct SentIrc {
    pub targets: Vec<String>,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SentDiscord {
    pub webhooks: Vec<String>,
    pub message: DiscordMessage,
}

/// Records deliveries instead of sending them.
#[derive(Clone, Debug, Default)]
pub struct MockDeliver {
    irc: Arc<Mutex<Vec<SentIrc>>>,
    discord: Arc<Mutex<Vec<SentDiscord>>>,
    fail: bool,
}

impl MockDeliver {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mock whose every delivery fails as if irker were down.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn irc(&self) -> Vec<SentIrc> {
        self.irc.lock().unwrap().clone()
    }

    pub fn discord(&self) -> Vec<SentDiscord> {
        self.discord.lock().unwrap().clone()
    }

    fn failure(&self) -> DeliveryError {
        DeliveryError::IrkerTimeout {
            addr: "mock".to_string(),
        }
    }
}

impl Deliver for MockDeliver {
    async fn send_irc(&self, targets: &[String], message: &str) -> Result<(), DeliveryError> {
        if self.fail {
            return Err(self.failure());
        }
        self.irc.lock().unwrap().push(SentIrc {
            targets: targets.to_vec(),
            message: message.to_string(),
        });
        Ok(())
    }

    async fn send_discord(
        &self,
        webhooks: &[String],
        message: &DiscordMessage,
    ) -> Result<(), DeliveryError> {
        if self.fail {
            return Err(self.failure());
        }
        self.discord.lock().unwrap().push(SentDiscord {
            webhooks: webhooks.to_vec(),
            message: message.clone(),
        });
        Ok(())
    }
}
