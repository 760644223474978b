//! Telegram bot messages

use super::{expect_success, AlertSender, ChannelMessage, Result};
use crate::domain::Alert;
use crate::infrastructure::config::TelegramCredentials;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

const TELEGRAM_API: &str = "https://api.telegram.org";

#[derive(Debug, Serialize)]
pub struct SendMessage {
    pub chat_id: String,
    pub text: String,
    pub disable_web_page_preview: bool,
}

impl SendMessage {
    pub fn new(chat_id: &str, alert: &Alert) -> Self {
        let (text, disable_web_page_preview) = match ChannelMessage::chat_bot(alert) {
            ChannelMessage::ChatBot {
                text,
                disable_web_page_preview,
            } => (text, disable_web_page_preview),
            other => (other.text().to_string(), true),
        };

        Self {
            chat_id: format!("@{}", chat_id),
            text,
            disable_web_page_preview,
        }
    }
}

pub struct TelegramSender {
    creds: TelegramCredentials,
    http: Client,
}

impl TelegramSender {
    pub fn new(creds: TelegramCredentials, http: Client) -> Self {
        Self { creds, http }
    }

    fn send_message_url(&self) -> String {
        format!("{}/bot{}/sendMessage", TELEGRAM_API, self.creds.api_key)
    }
}

#[async_trait]
impl AlertSender for TelegramSender {
    fn channel(&self) -> &'static str {
        "telegram"
    }

    async fn send(&self, alert: &Alert) -> Result<()> {
        let response = self
            .http
            .post(self.send_message_url())
            .json(&SendMessage::new(&self.creds.chat_id, alert))
            .send()
            .await;

        expect_success(self.channel(), response).await
    }
}
