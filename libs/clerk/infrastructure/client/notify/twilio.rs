//! Text messages through the Twilio Messages API

use super::{expect_success, AlertSender, ChannelMessage, Result};
use crate::domain::Alert;
use crate::infrastructure::config::TwilioCredentials;
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

const TWILIO_API: &str = "https://api.twilio.com/2010-04-01";

pub struct TwilioSender {
    creds: TwilioCredentials,
    http: Client,
    base_url: String,
}

impl TwilioSender {
    pub fn new(creds: TwilioCredentials, http: Client) -> Self {
        Self {
            creds,
            http,
            base_url: TWILIO_API.to_string(),
        }
    }

    /// Point the sender at another API root, e.g. a Twilio-compatible gateway
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn messages_url(&self) -> String {
        format!(
            "{}/Accounts/{}/Messages",
            self.base_url, self.creds.account_sid
        )
    }
}

#[async_trait]
impl AlertSender for TwilioSender {
    fn channel(&self) -> &'static str {
        "sms"
    }

    async fn send(&self, alert: &Alert) -> Result<()> {
        let message = ChannelMessage::sms(alert);
        let form = [
            ("To", self.creds.destination_number.as_str()),
            ("From", self.creds.source_number.as_str()),
            ("Body", message.text()),
        ];
        debug!("Sending SMS to {}", self.creds.destination_number);

        let response = self
            .http
            .post(self.messages_url())
            .basic_auth(&self.creds.account_sid, Some(&self.creds.token))
            .header("Accept", "application/json")
            .form(&form)
            .send()
            .await;

        expect_success(self.channel(), response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds() -> TwilioCredentials {
        TwilioCredentials {
            account_sid: "AC123".to_string(),
            token: "t".to_string(),
            source_number: "+15550001".to_string(),
            destination_number: "+15550002".to_string(),
        }
    }

    #[test]
    fn test_base_url_override() {
        let sender =
            TwilioSender::new(creds(), Client::new()).with_base_url("http://127.0.0.1:8089/");
        assert_eq!(
            sender.messages_url(),
            "http://127.0.0.1:8089/Accounts/AC123/Messages"
        );
    }

    #[test]
    fn test_messages_url() {
        let sender = TwilioSender::new(creds(), Client::new());
        assert_eq!(
            sender.messages_url(),
            "https://api.twilio.com/2010-04-01/Accounts/AC123/Messages"
        );
    }
}
