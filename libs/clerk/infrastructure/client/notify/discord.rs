//! Discord webhook posts

use super::{expect_success, AlertSender, ChannelMessage, Result};
use crate::domain::Alert;
use crate::infrastructure::config::DiscordCredentials;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

pub struct DiscordSender {
    creds: DiscordCredentials,
    http: Client,
}

impl DiscordSender {
    pub fn new(creds: DiscordCredentials, http: Client) -> Self {
        Self { creds, http }
    }
}

/// JSON body for a webhook post
pub fn webhook_payload(alert: &Alert) -> serde_json::Value {
    json!({ "content": ChannelMessage::chat_webhook(alert).text() })
}

#[async_trait]
impl AlertSender for DiscordSender {
    fn channel(&self) -> &'static str {
        "discord"
    }

    async fn send(&self, alert: &Alert) -> Result<()> {
        let response = self
            .http
            .post(&self.creds.webhook_url)
            .json(&webhook_payload(alert))
            .send()
            .await;

        expect_success(self.channel(), response).await
    }
}
