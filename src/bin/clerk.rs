//! clerk: watch one region/model and check out on the first stock drop

use anyhow::{bail, Context, Result};
use clap::Parser;
use clerk::application::{
    self_test, CheckoutStage, Notifier, Orchestrator, RegionMonitor, SessionCell,
    StoreCheckout, StorePoller, TokenRefresher,
};
use clerk::infrastructure::browser::SystemBrowser;
use clerk::infrastructure::config::{product_page_url, ClerkConfig, ClerkSettings, RegionCatalog};
use clerk::infrastructure::retry::JitteredDelay;
use clerk::infrastructure::{init_tracing_with_level, ShutdownManager, StoreClient};
use std::process::ExitCode;
use std::sync::Arc;
use stock_clerk::bin_common::{
    load_config_from_env, outcome_summary, BinaryRunner, ClerkArgs, ConfigType, RunConfig,
};
use tracing::{info, warn};

struct ClerkApp {
    run_config: RunConfig,
    config: ClerkConfig,
    shutdown: ShutdownManager,
}

impl ClerkApp {
    fn new(config: ClerkConfig) -> Self {
        let run_config = RunConfig::new(format!("NVIDIA Clerk ({})", config.target.label()))
            .with_heartbeat(config.settings.polling.heartbeat_interval_secs);
        Self {
            run_config,
            config,
            shutdown: ShutdownManager::new(),
        }
    }

    async fn send_test_notification(&self, notifier: &Notifier) -> Result<()> {
        let page = product_page_url(&self.config.target.store_locale, &self.config.target.model);
        match self_test(notifier, &self.config.target.model, &page).await {
            Ok(report) if report.failed.is_empty() => {
                info!("Test notification delivered to every channel");
                Ok(())
            }
            Ok(report) => {
                let failed: Vec<&str> = report.failed.iter().map(|(c, _)| *c).collect();
                warn!("Test notification failed on: {}", failed.join(", "));
                Ok(())
            }
            Err(e) => bail!("Notification self-test failed: {}", e),
        }
    }
}

impl BinaryRunner for ClerkApp {
    async fn run(&mut self) -> Result<Option<String>> {
        let notifier = Arc::new(
            Notifier::from_channels(&self.config.channels)
                .context("Failed to build notification channels")?,
        );

        if self.config.self_test {
            self.send_test_notification(&notifier).await?;
        }

        self.shutdown.spawn_signal_handler();

        let store = StoreClient::new(self.config.settings.store.clone())
            .context("Failed to build store client")?;
        let store = Arc::new(store);
        let session = SessionCell::shared();
        let polling = &self.config.settings.polling;

        let refresher = TokenRefresher::new(
            store.clone(),
            session.clone(),
            Arc::new(JitteredDelay::new(
                polling.token_refresh(),
                polling.max_jitter(),
                None,
            )),
            self.shutdown.clone(),
        );

        let stage = CheckoutStage::new(
            Arc::new(StoreCheckout::new(store.clone())),
            store.clone(),
            session,
            Arc::new(SystemBrowser),
            self.config.remote,
        );

        let monitor = RegionMonitor::new(
            self.config.target.clone(),
            Arc::new(StorePoller::new(store.as_ref().clone())),
            notifier,
            Arc::new(JitteredDelay::new(
                self.config.delay,
                polling.max_jitter(),
                None,
            )),
            self.shutdown.clone(),
        )
        .with_checkout(stage);

        let outcomes = Orchestrator::new(self.shutdown.clone())
            .with_stagger(polling.stagger())
            .stop_on_checkout(true)
            .with_refresher(refresher)
            .run(vec![monitor])
            .await;

        Ok(Some(outcome_summary(&outcomes)))
    }

    fn config(&self) -> &RunConfig {
        &self.run_config
    }
}

async fn run() -> Result<()> {
    dotenv::dotenv().ok();
    let args = ClerkArgs::parse();

    // Load settings first (before logging is initialized)
    let settings_path = load_config_from_env(ConfigType::Clerk);
    let settings = ClerkSettings::load_or_default(&settings_path)
        .with_context(|| format!("Failed to load {}", settings_path.display()))?;

    init_tracing_with_level(args.effective_log_level(&settings));
    settings.log();

    let catalog = RegionCatalog::embedded().context("Region table is invalid")?;
    let config = args.into_config(settings, &catalog)?;
    config.log();

    ClerkApp::new(config).execute().await
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
