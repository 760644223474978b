//! Common test utilities for clerk integration tests
//!
//! In-memory stand-ins for the store, the notification channels and the
//! browser, so monitors can run against scripted inputs on paused time.

#![allow(dead_code)]

use async_trait::async_trait;
use clerk::application::{
    AvailabilityPoller, CartApi, CheckoutStage, CredentialProvider, Notifier, PollError,
    RegionMonitor, SessionCell, SharedSession, StoreCheckout,
};
use clerk::domain::{Alert, InventoryState, MonitorTarget, Observation, SessionToken};
use clerk::infrastructure::browser::BrowserLauncher;
use clerk::infrastructure::client::notify::{AlertSender, NotifyError};
use clerk::infrastructure::client::store::StoreError;
use clerk::infrastructure::retry::{JitteredDelay, RetryPolicy};
use clerk::infrastructure::shutdown::ShutdownManager;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub const CHECKOUT_URL: &str = "https://checkout.example/cart?token=abc";

pub mod fixtures {
    //! Test fixtures for common data types

    use super::*;

    pub fn usa_3080() -> MonitorTarget {
        MonitorTarget {
            region: "USA".to_string(),
            model: "3080".to_string(),
            sku: "5438481700".to_string(),
            locale: "en_us".to_string(),
            store_locale: "en_us".to_string(),
            currency: "USD".to_string(),
        }
    }

    pub fn gbr_3080() -> MonitorTarget {
        MonitorTarget {
            region: "GBR".to_string(),
            model: "3080".to_string(),
            sku: "5438792800".to_string(),
            locale: "en_gb".to_string(),
            store_locale: "en_gb".to_string(),
            currency: "GBP".to_string(),
        }
    }

    pub fn observation(state: InventoryState) -> Observation {
        let status = match state {
            InventoryState::InStock => "PRODUCT_INVENTORY_IN_STOCK",
            _ => "NOT_AVAILABLE",
        };
        Observation {
            state,
            product_id: "5438481700".to_string(),
            product_name: "NVIDIA GEFORCE RTX 3080".to_string(),
            status: status.to_string(),
        }
    }

    pub fn upstream_glitch() -> PollError {
        PollError::UpstreamInconsistency {
            sku: "5438481700".to_string(),
        }
    }

    /// One second between polls, no jitter
    pub fn steady_policy() -> Arc<dyn RetryPolicy> {
        Arc::new(JitteredDelay::new(Duration::from_secs(1), Duration::ZERO, None))
    }
}

// ============================================================================
// Poller
// ============================================================================

/// Replays a fixed list of poll results, then requests shutdown
pub struct ScriptedPoller {
    script: Mutex<VecDeque<Result<Observation, PollError>>>,
    shutdown: ShutdownManager,
    polls: AtomicUsize,
}

impl ScriptedPoller {
    pub fn new(script: Vec<Result<Observation, PollError>>, shutdown: ShutdownManager) -> Self {
        Self {
            script: Mutex::new(script.into()),
            shutdown,
            polls: AtomicUsize::new(0),
        }
    }

    pub fn states(states: &[InventoryState], shutdown: ShutdownManager) -> Self {
        Self::new(
            states.iter().map(|s| Ok(fixtures::observation(*s))).collect(),
            shutdown,
        )
    }

    pub fn polls(&self) -> usize {
        self.polls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AvailabilityPoller for ScriptedPoller {
    async fn poll(&self, _target: &MonitorTarget) -> Result<Observation, PollError> {
        self.polls.fetch_add(1, Ordering::SeqCst);
        let next = self.script.lock().pop_front();
        match next {
            Some(result) => result,
            None => {
                self.shutdown.trigger();
                Err(PollError::Transport(StoreError::ApiError(
                    "script exhausted".to_string(),
                )))
            }
        }
    }
}

/// Always fails
pub struct FailingPoller;

#[async_trait]
impl AvailabilityPoller for FailingPoller {
    async fn poll(&self, _target: &MonitorTarget) -> Result<Observation, PollError> {
        Err(PollError::Transport(StoreError::RateLimitExceeded))
    }
}

// ============================================================================
// Credentials
// ============================================================================

/// Hands out tokens from a list, repeating the last one
pub struct FakeCredentials {
    values: Mutex<VecDeque<Result<String, String>>>,
    last: Mutex<Option<String>>,
    calls: AtomicUsize,
}

impl FakeCredentials {
    pub fn fixed(value: &str) -> Self {
        Self::sequence(vec![Ok(value.to_string())])
    }

    pub fn sequence(values: Vec<Result<String, String>>) -> Self {
        Self {
            values: Mutex::new(values.into()),
            last: Mutex::new(None),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CredentialProvider for FakeCredentials {
    async fn acquire(&self) -> Result<SessionToken, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.values.lock().pop_front();
        match next {
            Some(Ok(value)) => {
                *self.last.lock() = Some(value.clone());
                Ok(SessionToken::new(value))
            }
            Some(Err(reason)) => Err(StoreError::ApiError(reason)),
            None => match self.last.lock().clone() {
                Some(value) => Ok(SessionToken::new(value)),
                None => Err(StoreError::ApiError("no token".to_string())),
            },
        }
    }
}

// ============================================================================
// Cart
// ============================================================================

/// In-memory cart keyed by session token, then SKU
#[derive(Default)]
pub struct FakeCart {
    carts: Mutex<HashMap<String, HashMap<String, u32>>>,
    add_calls: AtomicUsize,
    checkout_calls: AtomicUsize,
    failing_adds: AtomicUsize,
    failing_checkouts: AtomicUsize,
}

impl FakeCart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next `n` add-to-cart calls
    pub fn fail_adds(self, n: usize) -> Self {
        self.failing_adds.store(n, Ordering::SeqCst);
        self
    }

    /// Fail the next `n` checkout calls
    pub fn fail_checkouts(self, n: usize) -> Self {
        self.failing_checkouts.store(n, Ordering::SeqCst);
        self
    }

    pub fn quantity(&self, token: &str, sku: &str) -> u32 {
        self.carts
            .lock()
            .get(token)
            .and_then(|cart| cart.get(sku))
            .copied()
            .unwrap_or(0)
    }

    pub fn add_calls(&self) -> usize {
        self.add_calls.load(Ordering::SeqCst)
    }

    pub fn checkout_calls(&self) -> usize {
        self.checkout_calls.load(Ordering::SeqCst)
    }

    fn take_failure(counter: &AtomicUsize) -> bool {
        counter
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

#[async_trait]
impl CartApi for FakeCart {
    async fn add_to_cart(
        &self,
        target: &MonitorTarget,
        token: &SessionToken,
    ) -> Result<(), StoreError> {
        self.add_calls.fetch_add(1, Ordering::SeqCst);
        if Self::take_failure(&self.failing_adds) {
            return Err(StoreError::ApiError("cart unavailable".to_string()));
        }
        self.carts
            .lock()
            .entry(token.value().to_string())
            .or_default()
            .insert(target.sku.clone(), 1);
        Ok(())
    }

    async fn checkout_url(
        &self,
        _target: &MonitorTarget,
        _token: &SessionToken,
    ) -> Result<String, StoreError> {
        self.checkout_calls.fetch_add(1, Ordering::SeqCst);
        if Self::take_failure(&self.failing_checkouts) {
            return Err(StoreError::ApiError("checkout unavailable".to_string()));
        }
        Ok(CHECKOUT_URL.to_string())
    }
}

// ============================================================================
// Notification channels and browser
// ============================================================================

/// Records every alert it is asked to send
pub struct RecordingSender {
    name: &'static str,
    fail: bool,
    sent: Mutex<Vec<Alert>>,
}

impl RecordingSender {
    pub fn ok(name: &'static str) -> Arc<Self> {
        Arc::new(Self {
            name,
            fail: false,
            sent: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(name: &'static str) -> Arc<Self> {
        Arc::new(Self {
            name,
            fail: true,
            sent: Mutex::new(Vec::new()),
        })
    }

    pub fn sent(&self) -> Vec<Alert> {
        self.sent.lock().clone()
    }

    pub fn calls(&self) -> usize {
        self.sent.lock().len()
    }
}

#[async_trait]
impl AlertSender for RecordingSender {
    fn channel(&self) -> &'static str {
        self.name
    }

    async fn send(&self, alert: &Alert) -> Result<(), NotifyError> {
        self.sent.lock().push(alert.clone());
        if self.fail {
            return Err(NotifyError::delivery(self.name, "HTTP 500"));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingBrowser {
    opened: Mutex<Vec<String>>,
}

impl RecordingBrowser {
    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().clone()
    }
}

#[async_trait]
impl BrowserLauncher for RecordingBrowser {
    async fn open(&self, url: &str) -> io::Result<()> {
        self.opened.lock().push(url.to_string());
        Ok(())
    }
}

// ============================================================================
// Wiring
// ============================================================================

/// A monitor plus handles on all of its fakes
pub struct Harness {
    pub shutdown: ShutdownManager,
    pub poller: Arc<ScriptedPoller>,
    pub sender: Arc<RecordingSender>,
    pub cart: Arc<FakeCart>,
    pub credentials: Arc<FakeCredentials>,
    pub session: SharedSession,
    pub browser: Arc<RecordingBrowser>,
}

impl Harness {
    pub fn new(script: Vec<Result<Observation, PollError>>) -> Self {
        Self::with_cart(script, FakeCart::new())
    }

    pub fn with_cart(script: Vec<Result<Observation, PollError>>, cart: FakeCart) -> Self {
        let shutdown = ShutdownManager::new();
        Self {
            poller: Arc::new(ScriptedPoller::new(script, shutdown.clone())),
            shutdown,
            sender: RecordingSender::ok("recorder"),
            cart: Arc::new(cart),
            credentials: Arc::new(FakeCredentials::fixed("session-1")),
            session: SessionCell::shared(),
            browser: Arc::new(RecordingBrowser::default()),
        }
    }

    pub fn notifier(&self) -> Arc<Notifier> {
        let sender: Arc<dyn AlertSender> = self.sender.clone();
        Arc::new(Notifier::new(vec![sender]))
    }

    /// Monitor without a checkout stage
    pub fn watcher(&self, target: MonitorTarget) -> RegionMonitor {
        RegionMonitor::new(
            target,
            self.poller.clone(),
            self.notifier(),
            fixtures::steady_policy(),
            self.shutdown.clone(),
        )
    }

    /// Monitor that checks out on stock
    pub fn buyer(&self, target: MonitorTarget, remote: bool) -> RegionMonitor {
        let stage = CheckoutStage::new(
            Arc::new(StoreCheckout::new(self.cart.clone())),
            self.credentials.clone(),
            self.session.clone(),
            self.browser.clone(),
            remote,
        );
        self.watcher(target).with_checkout(stage)
    }
}
