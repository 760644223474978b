//! Application Layer
//!
//! Contains use cases and application services.
//! This layer depends on domain and infrastructure layers.

pub mod checkout;
pub mod credentials;
pub mod monitor;
pub mod notifier;
pub mod orchestrator;
pub mod poller;
pub mod status;

pub use checkout::{CartApi, CheckoutAutomator, CheckoutError, StoreCheckout};
pub use credentials::{
    current_or_acquire, CredentialProvider, RefreshStats, SessionCell, SharedSession,
    TokenRefresher,
};
pub use monitor::{CheckoutStage, MonitorOutcome, RegionMonitor};
pub use notifier::{self_test, test_alert_id, DispatchReport, Notifier};
pub use orchestrator::{Orchestrator, DEFAULT_STAGGER};
pub use poller::{classify, AvailabilityPoller, PollError, SessionProbe, StorePoller};
pub use status::{StatusBoard, StatusEntry};
