//! Notification channel clients
//!
//! Each channel implements [`AlertSender`]. `build_sender` turns a configured
//! [`NotificationChannel`] into the matching client.

pub mod discord;
pub mod message;
pub mod telegram;
pub mod toast;
pub mod twilio;
pub mod twitter;

use crate::domain::Alert;
use crate::infrastructure::config::NotificationChannel;
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

pub use discord::DiscordSender;
pub use message::ChannelMessage;
pub use telegram::TelegramSender;
pub use toast::ToastSender;
pub use twilio::TwilioSender;
pub use twitter::TwitterSender;

const NOTIFY_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("{channel} delivery failed: {reason}")]
    Delivery {
        channel: &'static str,
        reason: String,
    },

    #[error("All {attempted} notification channels failed")]
    AllChannelsFailed { attempted: usize },
}

impl NotifyError {
    pub fn delivery(channel: &'static str, reason: impl ToString) -> Self {
        Self::Delivery {
            channel,
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, NotifyError>;

/// One delivery channel
#[async_trait]
pub trait AlertSender: Send + Sync {
    /// Short channel name used in logs and errors
    fn channel(&self) -> &'static str;

    async fn send(&self, alert: &Alert) -> Result<()>;
}

/// HTTP client shared by the network channels
pub fn notify_http_client() -> Result<Client> {
    Client::builder()
        .timeout(NOTIFY_TIMEOUT)
        .build()
        .map_err(|e| NotifyError::delivery("http", e))
}

/// Build the sender for one configured channel
pub fn build_sender(channel: &NotificationChannel, http: &Client) -> Arc<dyn AlertSender> {
    match channel {
        NotificationChannel::Sms(creds) => Arc::new(TwilioSender::new(creds.clone(), http.clone())),
        NotificationChannel::ChatWebhook(creds) => {
            Arc::new(DiscordSender::new(creds.clone(), http.clone()))
        }
        NotificationChannel::SocialPost(creds) => {
            Arc::new(TwitterSender::new(creds.clone(), http.clone()))
        }
        NotificationChannel::ChatBot(creds) => {
            Arc::new(TelegramSender::new(creds.clone(), http.clone()))
        }
        NotificationChannel::DesktopToast => Arc::new(ToastSender::new()),
    }
}

/// Map a transport result into a delivery error for `channel`
pub(crate) async fn expect_success(
    channel: &'static str,
    response: std::result::Result<reqwest::Response, reqwest::Error>,
) -> Result<()> {
    let response = response.map_err(|e| NotifyError::delivery(channel, e))?;
    let status = response.status();
    if status.is_success() {
        return Ok(());
    }

    let body = response.text().await.unwrap_or_default();
    Err(NotifyError::delivery(
        channel,
        format!("HTTP {}: {}", status, body.trim()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::config::DiscordCredentials;

    #[test]
    fn test_build_sender_matches_channel() {
        let http = Client::new();
        let discord = build_sender(
            &NotificationChannel::ChatWebhook(DiscordCredentials {
                webhook_url: "https://discord.test/hook".to_string(),
            }),
            &http,
        );
        assert_eq!(discord.channel(), "discord");
        assert_eq!(
            build_sender(&NotificationChannel::DesktopToast, &http).channel(),
            "desktop"
        );
    }

    #[test]
    fn test_delivery_error_names_channel() {
        let err = NotifyError::delivery("sms", "HTTP 401");
        assert_eq!(err.to_string(), "sms delivery failed: HTTP 401");
    }
}
