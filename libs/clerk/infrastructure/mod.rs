//! Infrastructure Layer
//!
//! Contains implementations of external interfaces (store API, notification
//! providers, configuration, process plumbing).
//! This layer depends on the domain layer but not on the application layer.

pub mod browser;
pub mod client;
pub mod config;
pub mod heartbeat;
pub mod logging;
pub mod platform;
pub mod retry;
pub mod shutdown;

pub use browser::{BrowserLauncher, SystemBrowser};
pub use client::{build_sender, AlertSender, ChannelMessage, NotifyError, StoreClient, StoreError};
pub use config::{
    ChannelSelection, ClerkConfig, ClerkSettings, ConfigError, NotificationChannel, RegionCatalog,
};
pub use heartbeat::Heartbeat;
pub use logging::{init_tracing, init_tracing_with_level};
pub use retry::{FixedDelay, JitteredDelay, RetryPolicy};
pub use shutdown::ShutdownManager;
