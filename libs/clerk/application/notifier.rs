//! Fan-out of alerts to every configured channel
//!
//! Channels are attempted concurrently and independently. One channel
//! failing is logged and never stops the others.

use crate::domain::Alert;
use crate::infrastructure::client::notify::{
    build_sender, notify_http_client, AlertSender, NotifyError,
};
use crate::infrastructure::config::NotificationChannel;
use futures::future::join_all;
use std::sync::Arc;
use tracing::{info, warn};

/// Per-channel results of one dispatch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub delivered: Vec<&'static str>,
    pub failed: Vec<(&'static str, String)>,
}

impl DispatchReport {
    pub fn attempted(&self) -> usize {
        self.delivered.len() + self.failed.len()
    }

    pub fn all_failed(&self) -> bool {
        self.attempted() > 0 && self.delivered.is_empty()
    }
}

pub struct Notifier {
    senders: Vec<Arc<dyn AlertSender>>,
}

impl Notifier {
    pub fn new(senders: Vec<Arc<dyn AlertSender>>) -> Self {
        Self { senders }
    }

    /// Notifier with no channels; every dispatch is a no-op
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Build one sender per configured channel over a shared HTTP client
    pub fn from_channels(channels: &[NotificationChannel]) -> Result<Self, NotifyError> {
        let http = notify_http_client()?;
        let senders = channels
            .iter()
            .map(|channel| build_sender(channel, &http))
            .collect();
        Ok(Self::new(senders))
    }

    pub fn len(&self) -> usize {
        self.senders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.senders.is_empty()
    }

    /// Attempt every channel and report what happened
    pub async fn dispatch_report(&self, alert: &Alert) -> DispatchReport {
        let attempts = self.senders.iter().map(|sender| async move {
            (sender.channel(), sender.send(alert).await)
        });

        let mut report = DispatchReport::default();
        for (channel, result) in join_all(attempts).await {
            match result {
                Ok(()) => report.delivered.push(channel),
                Err(e) => {
                    warn!("Error sending {} notification: {}", channel, e);
                    report.failed.push((channel, e.to_string()));
                }
            }
        }
        report
    }

    /// Dispatch an alert; errors only when every attempted channel failed
    pub async fn dispatch(&self, alert: &Alert) -> Result<DispatchReport, NotifyError> {
        let report = self.dispatch_report(alert).await;

        if report.all_failed() {
            return Err(NotifyError::AllChannelsFailed {
                attempted: report.attempted(),
            });
        }

        if !report.delivered.is_empty() {
            info!(
                "Sent '{}' via {}",
                alert.headline(),
                report.delivered.join(", ")
            );
        }
        Ok(report)
    }
}

/// Identifier used by the notification self-test
pub fn test_alert_id(model: &str) -> String {
    format!("TEST NOTIFICATION!!! {}", model)
}

/// Send a canned alert through every channel
pub async fn self_test(
    notifier: &Notifier,
    model: &str,
    product_page: &str,
) -> Result<DispatchReport, NotifyError> {
    let alert = Alert::ready_for_purchase(test_alert_id(model), product_page);
    info!(
        "Sending test notification through {} channel(s)",
        notifier.len()
    );
    notifier.dispatch(&alert).await
}
