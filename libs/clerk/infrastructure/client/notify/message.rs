//! Per-channel message payloads built from an alert
//!
//! Every channel gets the same `(id, url)` pair, shaped for where it lands:
//! - text messages carry the link verbatim
//! - webhook posts wrap the link in `<...>` so no preview card unfurls
//! - public social posts never carry the link
//! - chat bot messages turn link previews off

use crate::domain::Alert;

/// Application name shown on desktop notifications
pub const APP_NAME: &str = "NVIDIA Clerk";

/// Title of the desktop notification
pub const TOAST_TITLE: &str = "NVIDIA Clerk Inventory Alert";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelMessage {
    Sms {
        body: String,
    },
    ChatWebhook {
        content: String,
    },
    SocialPost {
        status: String,
    },
    ChatBot {
        text: String,
        disable_web_page_preview: bool,
    },
    DesktopToast {
        title: String,
        body: String,
    },
}

impl ChannelMessage {
    pub fn sms(alert: &Alert) -> Self {
        Self::Sms {
            body: format!("{}: {}", alert.headline(), alert.url()),
        }
    }

    pub fn chat_webhook(alert: &Alert) -> Self {
        let url = if alert.has_link() {
            format!("<{}>", alert.url())
        } else {
            alert.url().to_string()
        };
        Self::ChatWebhook {
            content: format!("{}: {}", alert.headline(), url),
        }
    }

    pub fn social_post(alert: &Alert) -> Self {
        Self::SocialPost {
            status: alert.headline(),
        }
    }

    pub fn chat_bot(alert: &Alert) -> Self {
        Self::ChatBot {
            text: format!("{}: {}", alert.headline(), alert.url()),
            disable_web_page_preview: true,
        }
    }

    pub fn desktop_toast(alert: &Alert) -> Self {
        let body = match alert {
            Alert::ReadyForPurchase { id, .. } => format!("{} Is ready for checkout", id),
            Alert::StatusChange { .. } => alert.headline(),
        };
        Self::DesktopToast {
            title: TOAST_TITLE.to_string(),
            body,
        }
    }

    /// Main human-readable text of the message
    pub fn text(&self) -> &str {
        match self {
            Self::Sms { body } => body,
            Self::ChatWebhook { content } => content,
            Self::SocialPost { status } => status,
            Self::ChatBot { text, .. } => text,
            Self::DesktopToast { body, .. } => body,
        }
    }
}
