//! Notification channel credentials
//!
//! Credentials come from the environment (after `.env` is loaded). Lookups go
//! through a closure so tests can supply a map instead of mutating the
//! process environment.

use super::{ConfigError, Result};
use std::fmt;

pub const TWILIO_ACCOUNT_SID: &str = "TWILIO_ACCOUNT_SID";
pub const TWILIO_TOKEN: &str = "TWILIO_TOKEN";
pub const TWILIO_SOURCE_NUMBER: &str = "TWILIO_SOURCE_NUMBER";
pub const TWILIO_DESTINATION_NUMBER: &str = "TWILIO_DESTINATION_NUMBER";
pub const DISCORD_WEBHOOK_URL: &str = "DISCORD_WEBHOOK_URL";
pub const TWITTER_ACCESS_TOKEN: &str = "TWITTER_ACCESS_TOKEN";
pub const TELEGRAM_API_KEY: &str = "TELEGRAM_API_KEY";
pub const TELEGRAM_CHAT_ID: &str = "TELEGRAM_CHAT_ID";

#[derive(Clone)]
pub struct TwilioCredentials {
    pub account_sid: String,
    pub token: String,
    pub source_number: String,
    pub destination_number: String,
}

impl fmt::Debug for TwilioCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TwilioCredentials")
            .field("account_sid", &self.account_sid)
            .field("token", &"[REDACTED]")
            .field("source_number", &self.source_number)
            .field("destination_number", &self.destination_number)
            .finish()
    }
}

/// The webhook URL embeds its own secret, so it is redacted too
#[derive(Clone)]
pub struct DiscordCredentials {
    pub webhook_url: String,
}

impl fmt::Debug for DiscordCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscordCredentials")
            .field("webhook_url", &"[REDACTED]")
            .finish()
    }
}

/// OAuth 2.0 user-context token allowed to post tweets
#[derive(Clone)]
pub struct TwitterCredentials {
    pub access_token: String,
}

impl fmt::Debug for TwitterCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TwitterCredentials")
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}

#[derive(Clone)]
pub struct TelegramCredentials {
    pub api_key: String,
    /// Channel name without the leading `@`
    pub chat_id: String,
}

impl fmt::Debug for TelegramCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramCredentials")
            .field("api_key", &"[REDACTED]")
            .field("chat_id", &self.chat_id)
            .finish()
    }
}

/// One enabled delivery channel with its credential bundle
#[derive(Debug, Clone)]
pub enum NotificationChannel {
    Sms(TwilioCredentials),
    ChatWebhook(DiscordCredentials),
    SocialPost(TwitterCredentials),
    ChatBot(TelegramCredentials),
    DesktopToast,
}

impl NotificationChannel {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Sms(_) => "sms",
            Self::ChatWebhook(_) => "discord",
            Self::SocialPost(_) => "twitter",
            Self::ChatBot(_) => "telegram",
            Self::DesktopToast => "desktop",
        }
    }
}

/// Which channels the user switched on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChannelSelection {
    pub sms: bool,
    pub discord: bool,
    pub twitter: bool,
    pub telegram: bool,
    pub desktop: bool,
}

impl ChannelSelection {
    /// Resolve credentials using `lookup` for variable access
    ///
    /// Channels are returned in a fixed order: sms, discord, twitter,
    /// telegram, desktop.
    pub fn resolve<F>(&self, lookup: F) -> Result<Vec<NotificationChannel>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |name: &str| -> Result<String> {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| ConfigError::EnvVarMissing(name.to_string()))
        };

        let mut channels = Vec::new();

        if self.sms {
            channels.push(NotificationChannel::Sms(TwilioCredentials {
                account_sid: require(TWILIO_ACCOUNT_SID)?,
                token: require(TWILIO_TOKEN)?,
                source_number: require(TWILIO_SOURCE_NUMBER)?,
                destination_number: require(TWILIO_DESTINATION_NUMBER)?,
            }));
        }

        if self.discord {
            channels.push(NotificationChannel::ChatWebhook(DiscordCredentials {
                webhook_url: require(DISCORD_WEBHOOK_URL)?,
            }));
        }

        if self.twitter {
            channels.push(NotificationChannel::SocialPost(TwitterCredentials {
                access_token: require(TWITTER_ACCESS_TOKEN)?,
            }));
        }

        if self.telegram {
            let chat_id = require(TELEGRAM_CHAT_ID)?;
            channels.push(NotificationChannel::ChatBot(TelegramCredentials {
                api_key: require(TELEGRAM_API_KEY)?,
                chat_id: chat_id.trim_start_matches('@').to_string(),
            }));
        }

        if self.desktop {
            channels.push(NotificationChannel::DesktopToast);
        }

        Ok(channels)
    }
}

/// Per-region webhook variable used by the status binary
pub fn regional_webhook_var(region: &str) -> String {
    format!("{}_{}", DISCORD_WEBHOOK_URL, region.to_ascii_uppercase())
}

/// Discord channel for one region, if its webhook variable is set
pub fn regional_discord<F>(region: &str, lookup: F) -> Option<NotificationChannel>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(&regional_webhook_var(region))
        .filter(|v| !v.trim().is_empty())
        .map(|webhook_url| NotificationChannel::ChatWebhook(DiscordCredentials { webhook_url }))
}
