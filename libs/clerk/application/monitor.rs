//! Per-target polling loop with edge-triggered alerts
//!
//! Each cycle:
//! 1. wait for the policy's delay (cut short by shutdown)
//! 2. poll; errors are logged and retried with the state untouched
//! 3. on stock, run the checkout stage if one is attached
//! 4. alert once when the classified state changed
//!
//! A successful checkout ends the monitor.

use super::checkout::{CheckoutAutomator, CheckoutError};
use super::credentials::{current_or_acquire, CredentialProvider, SharedSession};
use super::notifier::Notifier;
use super::poller::AvailabilityPoller;
use super::status::StatusBoard;
use crate::domain::{
    Alert, InventoryState, MonitorTarget, Observation, StateTracker, Transition,
    REMOTE_CHECKOUT_TEXT,
};
use crate::infrastructure::browser::{open_or_warn, BrowserLauncher};
use crate::infrastructure::config::product_page_url;
use crate::infrastructure::retry::RetryPolicy;
use crate::infrastructure::shutdown::ShutdownManager;
use std::sync::Arc;
use tracing::{info, warn};

/// How a monitor finished
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonitorOutcome {
    /// Checkout succeeded; carries the checkout URL
    CheckedOut { url: String },
    /// Shutdown was requested
    Cancelled,
    /// The retry policy refused another attempt
    RetriesExhausted,
}

impl MonitorOutcome {
    pub fn is_checked_out(&self) -> bool {
        matches!(self, Self::CheckedOut { .. })
    }
}

/// Everything needed to buy once stock shows up
pub struct CheckoutStage {
    automator: Arc<dyn CheckoutAutomator>,
    credentials: Arc<dyn CredentialProvider>,
    session: SharedSession,
    browser: Arc<dyn BrowserLauncher>,
    remote: bool,
}

impl CheckoutStage {
    pub fn new(
        automator: Arc<dyn CheckoutAutomator>,
        credentials: Arc<dyn CredentialProvider>,
        session: SharedSession,
        browser: Arc<dyn BrowserLauncher>,
        remote: bool,
    ) -> Self {
        Self {
            automator,
            credentials,
            session,
            browser,
            remote,
        }
    }

    async fn attempt(&self, target: &MonitorTarget) -> Result<String, CheckoutError> {
        let token = current_or_acquire(&self.session, self.credentials.as_ref())
            .await
            .map_err(CheckoutError::NoSession)?;
        self.automator.execute(target, &token).await
    }

    /// Text that goes into the purchase alert for a checkout URL
    fn alert_url(&self, checkout_url: &str) -> String {
        if self.remote {
            REMOTE_CHECKOUT_TEXT.to_string()
        } else {
            checkout_url.to_string()
        }
    }
}

pub struct RegionMonitor {
    target: MonitorTarget,
    poller: Arc<dyn AvailabilityPoller>,
    notifier: Arc<Notifier>,
    policy: Arc<dyn RetryPolicy>,
    shutdown: ShutdownManager,
    checkout: Option<CheckoutStage>,
    board: Option<Arc<StatusBoard>>,
    label: String,
    product_page: String,
}

impl RegionMonitor {
    pub fn new(
        target: MonitorTarget,
        poller: Arc<dyn AvailabilityPoller>,
        notifier: Arc<Notifier>,
        policy: Arc<dyn RetryPolicy>,
        shutdown: ShutdownManager,
    ) -> Self {
        let label = target.label();
        let product_page = product_page_url(&target.store_locale, &target.model);
        Self {
            target,
            poller,
            notifier,
            policy,
            shutdown,
            checkout: None,
            board: None,
            label,
            product_page,
        }
    }

    pub fn with_checkout(mut self, stage: CheckoutStage) -> Self {
        self.checkout = Some(stage);
        self
    }

    pub fn with_status_board(mut self, board: Arc<StatusBoard>) -> Self {
        self.board = Some(board);
        self
    }

    /// Override the label used for logs, alerts and the status board
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn target(&self) -> &MonitorTarget {
        &self.target
    }

    /// Poll until checkout, shutdown, or the policy gives up
    pub async fn run(self) -> MonitorOutcome {
        let mut tracker = StateTracker::new();
        let mut failures = 0usize;

        info!("[{}] Monitoring {}", self.label, self.target);

        loop {
            let Some(delay) = self.policy.next_delay(failures) else {
                warn!("[{}] Giving up after {} failed polls", self.label, failures);
                return MonitorOutcome::RetriesExhausted;
            };
            if !self.shutdown.interruptible_sleep(delay).await {
                return MonitorOutcome::Cancelled;
            }

            let observation = match self.poller.poll(&self.target).await {
                Ok(observation) => {
                    failures = 0;
                    observation
                }
                Err(e) => {
                    failures += 1;
                    warn!(
                        "[{}] Error getting product information, retrying: {}",
                        self.label, e
                    );
                    continue;
                }
            };

            self.log_observation(&observation);
            if let Some(board) = &self.board {
                board.record(&self.label, observation.state);
            }

            let checkout_url = if observation.state.is_in_stock() {
                self.try_checkout().await
            } else {
                None
            };

            let alert_url = match (&checkout_url, &self.checkout) {
                (Some(url), Some(stage)) => Some(stage.alert_url(url)),
                _ => None,
            };

            match tracker.observe(observation.state) {
                Some(transition) => {
                    let alert = self.transition_alert(&observation, transition, alert_url);
                    self.send(&alert).await;
                }
                None => {
                    if let Some(url) = alert_url {
                        let alert = Alert::ready_for_purchase(self.alert_id(&observation), url);
                        self.send(&alert).await;
                    }
                }
            }

            if let Some(url) = checkout_url {
                info!("[{}] Checkout complete", self.label);
                return MonitorOutcome::CheckedOut { url };
            }
        }
    }

    fn log_observation(&self, observation: &Observation) {
        info!(
            product_id = %observation.product_id,
            product_name = %observation.product_name,
            locale = %self.target.locale,
            status = %observation.status,
            "[{}] {}",
            self.label,
            observation.state
        );
    }

    /// Run the checkout stage once, returning the raw checkout URL on success
    async fn try_checkout(&self) -> Option<String> {
        let stage = self.checkout.as_ref()?;

        match stage.attempt(&self.target).await {
            Ok(url) => {
                if !stage.remote {
                    open_or_warn(stage.browser.as_ref(), &url).await;
                }
                Some(url)
            }
            Err(e) => {
                warn!("[{}] Checkout attempt failed: {}", self.label, e);
                None
            }
        }
    }

    fn alert_id(&self, observation: &Observation) -> String {
        if observation.product_name.is_empty() {
            self.label.clone()
        } else {
            observation.product_name.clone()
        }
    }

    fn transition_alert(
        &self,
        observation: &Observation,
        transition: Transition,
        checkout_alert_url: Option<String>,
    ) -> Alert {
        if transition.current == InventoryState::InStock {
            let url = checkout_alert_url.unwrap_or_else(|| self.product_page.clone());
            Alert::ready_for_purchase(self.alert_id(observation), url)
        } else {
            Alert::status_change(
                self.label.clone(),
                transition.previous,
                transition.current,
                self.product_page.clone(),
            )
        }
    }

    async fn send(&self, alert: &Alert) {
        if let Err(e) = self.notifier.dispatch(alert).await {
            warn!("[{}] {}", self.label, e);
        }
    }
}
