//! CLI utilities for binaries
//!
//! Handles command line parsing, settings file location and turning flags
//! plus environment into a validated run configuration.

use clap::Parser;
use clerk::infrastructure::config::{
    validate_log_level, ChannelSelection, ClerkConfig, ClerkSettings, ConfigError, RegionCatalog,
};
use std::path::PathBuf;
use std::time::Duration;

/// Type of configuration to load
#[derive(Debug, Clone)]
pub enum ConfigType {
    /// Single-target clerk settings (config/clerk.yaml)
    Clerk,
    /// Multi-region status settings (config/status.yaml)
    Status,
    /// Custom path
    Custom(String),
}

impl ConfigType {
    /// Get the default path for this config type
    pub fn default_path(&self) -> &str {
        match self {
            ConfigType::Clerk => "config/clerk.yaml",
            ConfigType::Status => "config/status.yaml",
            ConfigType::Custom(path) => path,
        }
    }

    /// Get the environment variable name for this config type
    pub fn env_var_name(&self) -> &str {
        match self {
            ConfigType::Clerk => "CLERK_CONFIG_PATH",
            ConfigType::Status => "STATUS_CONFIG_PATH",
            ConfigType::Custom(_) => "CLERK_CONFIG_PATH",
        }
    }
}

/// Load configuration path from environment or use default
pub fn load_config_from_env(config_type: ConfigType) -> PathBuf {
    std::env::var(config_type.env_var_name())
        .unwrap_or_else(|_| config_type.default_path().to_string())
        .into()
}

/// Command line of the `clerk` binary
#[derive(Parser, Debug, Clone)]
#[command(name = "clerk")]
#[command(about = "Watch the NVIDIA store for a GPU and check out as soon as it is in stock")]
#[command(version)]
pub struct ClerkArgs {
    /// 3 letter region code, e.g. USA, GBR, DEU
    #[arg(long, env = "CLERK_REGION")]
    pub region: String,

    /// GPU model number, e.g. 3080
    #[arg(long, env = "CLERK_MODEL")]
    pub model: String,

    /// Base delay between polls in milliseconds (a random 0-5s is added)
    #[arg(long, default_value_t = 1)]
    pub delay: u64,

    /// Send SMS notifications through Twilio
    #[arg(long)]
    pub sms: bool,

    /// Send Discord webhook notifications
    #[arg(long)]
    pub discord: bool,

    /// Post a (link-free) tweet
    #[arg(long)]
    pub twitter: bool,

    /// Send Telegram bot messages
    #[arg(long)]
    pub telegram: bool,

    /// Show desktop notifications
    #[arg(long)]
    pub desktop: bool,

    /// Remote mode: never open a browser, notify without the checkout link
    #[arg(long)]
    pub remote: bool,

    /// Send a test notification through every enabled channel first
    #[arg(long)]
    pub test: bool,

    /// Log level (error, warn, info, debug, trace), overrides the settings file
    #[arg(long)]
    pub log_level: Option<String>,
}

impl ClerkArgs {
    pub fn channel_selection(&self) -> ChannelSelection {
        ChannelSelection {
            sms: self.sms,
            discord: self.discord,
            twitter: self.twitter,
            telegram: self.telegram,
            desktop: self.desktop,
        }
    }

    /// Level to initialise logging with
    pub fn effective_log_level<'a>(&'a self, settings: &'a ClerkSettings) -> &'a str {
        self.log_level.as_deref().unwrap_or(&settings.log_level)
    }

    /// Resolve flags, settings and the process environment into a run configuration
    pub fn into_config(
        self,
        settings: ClerkSettings,
        catalog: &RegionCatalog,
    ) -> Result<ClerkConfig, ConfigError> {
        self.into_config_with(settings, catalog, |name| std::env::var(name).ok())
    }

    /// Same as [`ClerkArgs::into_config`], reading variables through `lookup`
    pub fn into_config_with<F>(
        self,
        settings: ClerkSettings,
        catalog: &RegionCatalog,
        lookup: F,
    ) -> Result<ClerkConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = &self.log_level {
            validate_log_level(level)?;
        }

        let target = catalog.target(&self.region, &self.model)?;
        let channels = self.channel_selection().resolve(lookup)?;

        Ok(ClerkConfig {
            settings,
            target,
            delay: Duration::from_millis(self.delay),
            channels,
            remote: self.remote,
            self_test: self.test,
        })
    }
}

/// Command line of the `clerk-status` binary
#[derive(Parser, Debug, Clone)]
#[command(name = "clerk-status")]
#[command(about = "Report store session and stock status for every region to Discord")]
#[command(version)]
pub struct StatusArgs {
    /// Region whose store session is probed for liveness
    #[arg(long, default_value = "USA")]
    pub home_region: String,

    /// Base delay between polls in milliseconds (a random 0-5s is added)
    #[arg(long, default_value_t = 1)]
    pub delay: u64,

    /// Log level (error, warn, info, debug, trace), overrides the settings file
    #[arg(long)]
    pub log_level: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_type_paths() {
        assert_eq!(ConfigType::Clerk.default_path(), "config/clerk.yaml");
        assert_eq!(ConfigType::Status.default_path(), "config/status.yaml");

        let custom = ConfigType::Custom("custom/path.yaml".to_string());
        assert_eq!(custom.default_path(), "custom/path.yaml");
    }

    #[test]
    fn test_config_type_env_vars() {
        assert_eq!(ConfigType::Clerk.env_var_name(), "CLERK_CONFIG_PATH");
        assert_eq!(ConfigType::Status.env_var_name(), "STATUS_CONFIG_PATH");
    }

    #[test]
    fn test_parse_flags() {
        let args = ClerkArgs::try_parse_from([
            "clerk", "--region", "USA", "--model", "3080", "--delay", "250", "--discord",
            "--remote",
        ])
        .unwrap();
        assert_eq!(args.region, "USA");
        assert_eq!(args.delay, 250);
        assert!(args.discord);
        assert!(args.remote);
        assert!(!args.sms);
        assert!(!args.test);
    }

    #[test]
    fn test_delay_defaults() {
        let args =
            ClerkArgs::try_parse_from(["clerk", "--region", "GBR", "--model", "3080"]).unwrap();
        assert_eq!(args.delay, 1);
    }

    #[test]
    fn test_status_defaults() {
        let args = StatusArgs::try_parse_from(["clerk-status"]).unwrap();
        assert_eq!(args.home_region, "USA");
        assert!(args.log_level.is_none());
    }
}
