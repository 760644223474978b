//! Public status posts through the Twitter v2 API
//!
//! Only the headline is posted. Checkout links are private to the person
//! running the clerk.

use super::{expect_success, AlertSender, ChannelMessage, Result};
use crate::domain::Alert;
use crate::infrastructure::config::TwitterCredentials;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

const TWEETS_URL: &str = "https://api.twitter.com/2/tweets";

pub struct TwitterSender {
    creds: TwitterCredentials,
    http: Client,
}

impl TwitterSender {
    pub fn new(creds: TwitterCredentials, http: Client) -> Self {
        Self { creds, http }
    }
}

pub fn tweet_payload(alert: &Alert) -> serde_json::Value {
    json!({ "text": ChannelMessage::social_post(alert).text() })
}

#[async_trait]
impl AlertSender for TwitterSender {
    fn channel(&self) -> &'static str {
        "twitter"
    }

    async fn send(&self, alert: &Alert) -> Result<()> {
        let response = self
            .http
            .post(TWEETS_URL)
            .bearer_auth(&self.creds.access_token)
            .json(&tweet_payload(alert))
            .send()
            .await;

        expect_success(self.channel(), response).await
    }
}
