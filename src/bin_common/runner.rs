//! Binary runner utilities
//!
//! Provides a standardized way to run binaries with proper
//! banners and graceful shutdown reporting.

use clerk::application::MonitorOutcome;
use tracing::info;

/// Configuration for running a binary application
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Name of the binary (for logging)
    pub name: String,
    /// Heartbeat interval in seconds
    pub heartbeat_interval_secs: u64,
}

impl RunConfig {
    /// Create a new run configuration
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            heartbeat_interval_secs: 60,
        }
    }

    /// Set heartbeat interval
    pub fn with_heartbeat(mut self, secs: u64) -> Self {
        self.heartbeat_interval_secs = secs;
        self
    }
}

/// One line per monitor for the shutdown banner
///
/// Checkout URLs are left out; they can carry the session token.
pub fn outcome_summary(outcomes: &[(String, MonitorOutcome)]) -> String {
    outcomes
        .iter()
        .map(|(label, outcome)| match outcome {
            MonitorOutcome::CheckedOut { .. } => format!("{}: checked out", label),
            MonitorOutcome::Cancelled => format!("{}: cancelled", label),
            MonitorOutcome::RetriesExhausted => format!("{}: gave up", label),
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// Trait for binary applications
pub trait BinaryRunner {
    /// Run the application to completion, returning a summary line
    async fn run(&mut self) -> anyhow::Result<Option<String>>;

    /// Get the run configuration
    fn config(&self) -> &RunConfig;

    /// Print startup banner
    fn print_banner(&self) {
        let config = self.config();
        info!("");
        info!("========================================");
        info!("Starting {}", config.name);
        info!("Press Ctrl+C to stop");
        info!("========================================");
        info!("");
    }

    /// Print shutdown banner
    fn print_shutdown(&self, stats: Option<&str>) {
        let config = self.config();
        info!("");
        info!("========================================");
        info!("{} stopped gracefully", config.name);
        if let Some(stats) = stats {
            info!("{}", stats);
        }
        info!("========================================");
    }

    /// Execute the binary with proper initialization and cleanup
    async fn execute(&mut self) -> anyhow::Result<()> {
        self.print_banner();
        let summary = self.run().await?;
        self.print_shutdown(summary.as_deref());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_config_builder() {
        let config = RunConfig::new("test-binary").with_heartbeat(120);

        assert_eq!(config.name, "test-binary");
        assert_eq!(config.heartbeat_interval_secs, 120);
    }

    #[test]
    fn test_summary_omits_checkout_url() {
        let outcomes = vec![
            (
                "USA/3080".to_string(),
                MonitorOutcome::CheckedOut {
                    url: "https://checkout.example/cart?token=secret".to_string(),
                },
            ),
            ("GBR/3080".to_string(), MonitorOutcome::Cancelled),
        ];

        let summary = outcome_summary(&outcomes);
        assert_eq!(summary, "USA/3080: checked out; GBR/3080: cancelled");
        assert!(!summary.contains("secret"));
    }

    #[test]
    fn test_default_config() {
        let config = RunConfig::new("default");
        assert_eq!(config.heartbeat_interval_secs, 60);
    }
}
