//! Configuration loading and validation
//!
//! Three sources feed a run:
//! - `ClerkSettings`: YAML file with store endpoints and timing knobs
//! - `RegionCatalog`: embedded region/model SKU table
//! - notification channel credentials from the environment

pub mod channels;
pub mod regions;

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

pub use channels::{
    ChannelSelection, DiscordCredentials, NotificationChannel, TelegramCredentials,
    TwilioCredentials, TwitterCredentials,
};
pub use regions::{product_page_url, RegionCatalog, RegionEntry};

use crate::domain::MonitorTarget;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load config file: {0}")]
    FileError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Environment variable not found: {0}")]
    EnvVarMissing(String),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),

    #[error("Unsupported region: {0}")]
    UnsupportedRegion(String),

    #[error("Unsupported model {model} for region {region}")]
    UnsupportedModel { region: String, model: String },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

// ============================================================================
// Settings file
// ============================================================================

/// Store endpoints used by the session, inventory, cart and checkout calls
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreEndpoints {
    #[serde(default = "default_session_url")]
    pub session_url: String,
    #[serde(default = "default_products_url")]
    pub products_url: String,
    #[serde(default = "default_cart_url")]
    pub cart_url: String,
    #[serde(default = "default_checkout_url")]
    pub checkout_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl StoreEndpoints {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for StoreEndpoints {
    fn default() -> Self {
        Self {
            session_url: default_session_url(),
            products_url: default_products_url(),
            cart_url: default_cart_url(),
            checkout_url: default_checkout_url(),
            user_agent: default_user_agent(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// Timing knobs for polling and the orchestrator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingSettings {
    /// Upper bound of the random jitter added to every poll delay
    #[serde(default = "default_max_jitter_ms")]
    pub max_jitter_ms: u64,
    /// Delay between monitor starts
    #[serde(default = "default_stagger_secs")]
    pub stagger_secs: u64,
    /// Base delay of the background session refresher
    #[serde(default = "default_token_refresh_ms")]
    pub token_refresh_ms: u64,
    /// Status summary interval in long-lived mode
    #[serde(default = "default_heartbeat_secs")]
    pub heartbeat_interval_secs: u64,
}

impl PollingSettings {
    pub fn max_jitter(&self) -> Duration {
        Duration::from_millis(self.max_jitter_ms)
    }

    pub fn stagger(&self) -> Duration {
        Duration::from_secs(self.stagger_secs)
    }

    pub fn token_refresh(&self) -> Duration {
        Duration::from_millis(self.token_refresh_ms)
    }
}

impl Default for PollingSettings {
    fn default() -> Self {
        Self {
            max_jitter_ms: default_max_jitter_ms(),
            stagger_secs: default_stagger_secs(),
            token_refresh_ms: default_token_refresh_ms(),
            heartbeat_interval_secs: default_heartbeat_secs(),
        }
    }
}

/// Contents of `config/clerk.yaml`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClerkSettings {
    #[serde(default)]
    pub store: StoreEndpoints,
    #[serde(default)]
    pub polling: PollingSettings,
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ClerkSettings {
    fn default() -> Self {
        Self {
            store: StoreEndpoints::default(),
            polling: PollingSettings::default(),
            log_level: default_log_level(),
        }
    }
}

impl ClerkSettings {
    /// Load settings from YAML file
    pub fn load(config_path: impl AsRef<Path>) -> Result<Self> {
        let yaml_content = std::fs::read_to_string(config_path)?;
        let settings: ClerkSettings = serde_yaml::from_str(&yaml_content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings, falling back to built-in defaults when the file is absent
    pub fn load_or_default(config_path: impl AsRef<Path>) -> Result<Self> {
        let path = config_path.as_ref();
        if !path.exists() {
            warn!("Config file {} not found, using defaults", path.display());
            let settings = Self::default();
            settings.validate()?;
            return Ok(settings);
        }
        Self::load(path)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        let urls = [
            ("store.session_url", &self.store.session_url),
            ("store.products_url", &self.store.products_url),
            ("store.cart_url", &self.store.cart_url),
            ("store.checkout_url", &self.store.checkout_url),
        ];
        for (name, url) in urls {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ConfigError::ValidationError(format!(
                    "{} must be an http(s) URL, got '{}'",
                    name, url
                )));
            }
        }

        if self.store.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "store.request_timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.polling.token_refresh_ms == 0 {
            return Err(ConfigError::ValidationError(
                "polling.token_refresh_ms must be greater than 0".to_string(),
            ));
        }

        if self.polling.heartbeat_interval_secs == 0 {
            return Err(ConfigError::ValidationError(
                "polling.heartbeat_interval_secs must be greater than 0".to_string(),
            ));
        }

        validate_log_level(&self.log_level)
    }

    /// Log configuration summary
    pub fn log(&self) {
        info!("Settings loaded:");
        info!("  Session endpoint: {}", self.store.session_url);
        info!("  Products endpoint: {}", self.store.products_url);
        info!("  Max jitter: {}ms", self.polling.max_jitter_ms);
        info!("  Start stagger: {}s", self.polling.stagger_secs);
        info!("  Log level: {}", self.log_level);
    }
}

/// Check a log level string against the levels tracing understands
pub fn validate_log_level(level: &str) -> Result<()> {
    let valid_levels = ["error", "warn", "info", "debug", "trace"];
    if !valid_levels.contains(&level.to_lowercase().as_str()) {
        return Err(ConfigError::ValidationError(format!(
            "log_level must be one of: {}",
            valid_levels.join(", ")
        )));
    }
    Ok(())
}

fn default_session_url() -> String {
    "https://store.nvidia.com/store/nvidia/SessionToken?format=json".to_string()
}

fn default_products_url() -> String {
    "https://api-prod.nvidia.com/direct-sales-shop/DR/products".to_string()
}

fn default_cart_url() -> String {
    "https://api-prod.nvidia.com/direct-sales-shop/DR/add-to-cart".to_string()
}

fn default_checkout_url() -> String {
    "https://api.digitalriver.com/v1/shoppers/me/carts/active/web-checkout".to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/85.0.4183.102 Safari/537.36".to_string()
}

fn default_request_timeout() -> u64 {
    15
}

fn default_max_jitter_ms() -> u64 {
    5000
}

fn default_stagger_secs() -> u64 {
    10
}

fn default_token_refresh_ms() -> u64 {
    30_000
}

fn default_heartbeat_secs() -> u64 {
    60
}

fn default_log_level() -> String {
    "info".to_string()
}

// ============================================================================
// Runtime configuration
// ============================================================================

/// Everything one `clerk` run needs, resolved and validated
#[derive(Debug, Clone)]
pub struct ClerkConfig {
    pub settings: ClerkSettings,
    pub target: MonitorTarget,
    /// Base poll delay before jitter
    pub delay: Duration,
    pub channels: Vec<NotificationChannel>,
    /// Running on a machine nobody is sitting at: no browser, no checkout link
    pub remote: bool,
    /// Send a test notification before monitoring
    pub self_test: bool,
}

impl ClerkConfig {
    pub fn log(&self) {
        info!("Configuration loaded:");
        info!("  Target: {}", self.target);
        info!("  Locale: {} ({})", self.target.locale, self.target.currency);
        info!("  Delay: {}ms", self.delay.as_millis());
        info!("  Remote: {}", self.remote);
        if self.channels.is_empty() {
            info!("  Notifications: none");
        } else {
            let kinds: Vec<&str> = self.channels.iter().map(|c| c.kind()).collect();
            info!("  Notifications: {}", kinds.join(", "));
        }
    }
}
