//! NVIDIA store clerk
//!
//! Watches store inventory for graphics card SKUs, buys on stock, and tells
//! you about it on every channel you configured.

pub mod application;
pub mod domain;
pub mod infrastructure;

// Re-export commonly used items
pub use application::{
    CheckoutStage, MonitorOutcome, Notifier, Orchestrator, RegionMonitor, SessionCell,
    StatusBoard, StoreCheckout, StorePoller, TokenRefresher,
};
pub use domain::{Alert, InventoryState, MonitorTarget, SessionToken};
pub use infrastructure::{
    init_tracing, init_tracing_with_level, ClerkConfig, ClerkSettings, ConfigError, Heartbeat,
    RegionCatalog, ShutdownManager, StoreClient,
};
