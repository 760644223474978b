//! clerk-status: long-lived store and stock status reporter
//!
//! Runs one session liveness monitor for the home region plus one product
//! monitor per catalogued region and model. Every monitor reports to its
//! region's Discord webhook; nothing is ever added to a cart.

use anyhow::{Context, Result};
use clap::Parser;
use clerk::application::{
    Notifier, Orchestrator, RegionMonitor, SessionProbe, StatusBoard, StorePoller,
};
use clerk::domain::MonitorTarget;
use clerk::infrastructure::config::channels::{regional_discord, regional_webhook_var};
use clerk::infrastructure::config::{ClerkSettings, RegionCatalog};
use clerk::infrastructure::retry::{JitteredDelay, RetryPolicy};
use clerk::infrastructure::{init_tracing_with_level, Heartbeat, ShutdownManager, StoreClient};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use stock_clerk::bin_common::{
    load_config_from_env, BinaryRunner, ConfigType, RunConfig, StatusArgs,
};
use tracing::{info, warn};

struct StatusApp {
    run_config: RunConfig,
    settings: ClerkSettings,
    catalog: RegionCatalog,
    home: MonitorTarget,
    delay: Duration,
    shutdown: ShutdownManager,
    board: Arc<StatusBoard>,
}

impl StatusApp {
    fn new(
        settings: ClerkSettings,
        catalog: RegionCatalog,
        home: MonitorTarget,
        delay: Duration,
    ) -> Self {
        let run_config = RunConfig::new("NVIDIA Clerk Status")
            .with_heartbeat(settings.polling.heartbeat_interval_secs);
        Self {
            run_config,
            settings,
            catalog,
            home,
            delay,
            shutdown: ShutdownManager::new(),
            board: Arc::new(StatusBoard::new()),
        }
    }

    fn policy(&self) -> Arc<dyn RetryPolicy> {
        Arc::new(JitteredDelay::new(
            self.delay,
            self.settings.polling.max_jitter(),
            None,
        ))
    }

    /// Notifier for one region's webhook, `None` when it is not configured
    fn regional_notifier(&self, region: &str) -> Result<Option<Arc<Notifier>>> {
        let Some(channel) = regional_discord(region, |name| std::env::var(name).ok()) else {
            warn!(
                "{} not set, skipping {} monitors",
                regional_webhook_var(region),
                region
            );
            return Ok(None);
        };
        let notifier = Notifier::from_channels(&[channel])
            .with_context(|| format!("Failed to build {} notifier", region))?;
        Ok(Some(Arc::new(notifier)))
    }

    fn build_monitors(&self, store: &StoreClient) -> Result<Vec<RegionMonitor>> {
        let mut monitors = Vec::new();

        if let Some(notifier) = self.regional_notifier(&self.home.region)? {
            let probe = SessionProbe::new(Arc::new(store.clone()));
            let label = format!("{}/session", self.home.region);
            monitors.push(
                RegionMonitor::new(
                    self.home.clone(),
                    Arc::new(probe),
                    notifier,
                    self.policy(),
                    self.shutdown.clone(),
                )
                .with_label(label)
                .with_status_board(self.board.clone()),
            );
        }

        let poller = Arc::new(StorePoller::new(store.clone()));
        for entry in self.catalog.regions() {
            let Some(notifier) = self.regional_notifier(&entry.code)? else {
                continue;
            };
            for target in self
                .catalog
                .all_targets()
                .into_iter()
                .filter(|t| t.region == entry.code)
            {
                monitors.push(
                    RegionMonitor::new(
                        target,
                        poller.clone(),
                        notifier.clone(),
                        self.policy(),
                        self.shutdown.clone(),
                    )
                    .with_status_board(self.board.clone()),
                );
            }
        }

        Ok(monitors)
    }
}

impl BinaryRunner for StatusApp {
    async fn run(&mut self) -> Result<Option<String>> {
        self.shutdown.spawn_signal_handler();

        let store = StoreClient::new(self.settings.store.clone())
            .context("Failed to build store client")?;
        let monitors = self.build_monitors(&store)?;
        if monitors.is_empty() {
            warn!("No regional webhooks configured, nothing to monitor");
            return Ok(None);
        }
        info!("Monitoring {} targets", monitors.len());

        let heartbeat = Heartbeat::new(self.run_config.heartbeat_interval_secs);
        let outcomes = Orchestrator::new(self.shutdown.clone())
            .with_stagger(self.settings.polling.stagger())
            .with_status_board(self.board.clone(), heartbeat)
            .run(monitors)
            .await;

        Ok(Some(format!(
            "{} monitors stopped, last status: {}",
            outcomes.len(),
            self.board.summary()
        )))
    }

    fn config(&self) -> &RunConfig {
        &self.run_config
    }
}

async fn run() -> Result<()> {
    dotenv::dotenv().ok();
    let args = StatusArgs::parse();

    let settings_path = load_config_from_env(ConfigType::Status);
    let settings = ClerkSettings::load_or_default(&settings_path)
        .with_context(|| format!("Failed to load {}", settings_path.display()))?;

    let level = args.log_level.as_deref().unwrap_or(&settings.log_level);
    init_tracing_with_level(level);
    settings.log();

    let catalog = RegionCatalog::embedded().context("Region table is invalid")?;
    let home_entry = catalog.region(&args.home_region)?;
    let home = catalog
        .all_targets()
        .into_iter()
        .find(|t| t.region == home_entry.code)
        .with_context(|| format!("No models catalogued for {}", home_entry.code))?;

    let delay = Duration::from_millis(args.delay);
    StatusApp::new(settings, catalog, home, delay).execute().await
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
