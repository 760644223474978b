//! Starts monitors, staggered, and collects their outcomes

use super::credentials::TokenRefresher;
use super::monitor::{MonitorOutcome, RegionMonitor};
use super::status::StatusBoard;
use crate::infrastructure::heartbeat::Heartbeat;
use crate::infrastructure::shutdown::ShutdownManager;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::{error, info};

/// Default pause between two monitor starts
pub const DEFAULT_STAGGER: Duration = Duration::from_secs(10);

pub struct Orchestrator {
    shutdown: ShutdownManager,
    stagger: Duration,
    stop_on_checkout: bool,
    refresher: Option<TokenRefresher>,
    status: Option<(Arc<StatusBoard>, Heartbeat)>,
}

impl Orchestrator {
    pub fn new(shutdown: ShutdownManager) -> Self {
        Self {
            shutdown,
            stagger: DEFAULT_STAGGER,
            stop_on_checkout: false,
            refresher: None,
            status: None,
        }
    }

    pub fn with_stagger(mut self, stagger: Duration) -> Self {
        self.stagger = stagger;
        self
    }

    /// Single-shot mode: the first successful checkout cancels every other monitor
    pub fn stop_on_checkout(mut self, enabled: bool) -> Self {
        self.stop_on_checkout = enabled;
        self
    }

    /// Keep a session token fresh alongside the monitors
    pub fn with_refresher(mut self, refresher: TokenRefresher) -> Self {
        self.refresher = Some(refresher);
        self
    }

    /// Log a board summary every heartbeat interval
    pub fn with_status_board(mut self, board: Arc<StatusBoard>, heartbeat: Heartbeat) -> Self {
        self.status = Some((board, heartbeat));
        self
    }

    /// Run every monitor to a terminal state
    ///
    /// Returns one `(label, outcome)` per monitor that was started; monitors
    /// still waiting for their start slot when shutdown arrives are skipped.
    pub async fn run(self, monitors: Vec<RegionMonitor>) -> Vec<(String, MonitorOutcome)> {
        let refresher_handle = self.refresher.map(|refresher| tokio::spawn(refresher.run()));

        let heartbeat_handle = self.status.map(|(board, heartbeat)| {
            let shutdown = self.shutdown.clone();
            tokio::spawn(run_heartbeat(board, heartbeat, shutdown))
        });

        let total = monitors.len();
        let mut set = JoinSet::new();

        for (index, monitor) in monitors.into_iter().enumerate() {
            if index > 0 && !self.shutdown.interruptible_sleep(self.stagger).await {
                info!(
                    "Shutdown before all monitors started ({} of {})",
                    index, total
                );
                break;
            }
            if !self.shutdown.is_running() {
                break;
            }

            let label = monitor.label().to_string();
            let shutdown = self.shutdown.clone();
            let stop_on_checkout = self.stop_on_checkout;
            info!("Starting monitor {} ({} of {})", label, index + 1, total);

            set.spawn(async move {
                let outcome = monitor.run().await;
                if stop_on_checkout && outcome.is_checked_out() {
                    info!("{} checked out, stopping remaining monitors", label);
                    shutdown.trigger();
                }
                (label, outcome)
            });
        }

        let mut outcomes = Vec::with_capacity(total);
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok(result) => outcomes.push(result),
                Err(e) => error!("Monitor task failed: {}", e),
            }
        }

        // nothing left to refresh or report for
        self.shutdown.trigger();

        if let Some(handle) = refresher_handle {
            if let Err(e) = handle.await {
                error!("Session refresher task failed: {}", e);
            }
        }
        if let Some(handle) = heartbeat_handle {
            if let Err(e) = handle.await {
                error!("Heartbeat task failed: {}", e);
            }
        }

        outcomes
    }
}

async fn run_heartbeat(
    board: Arc<StatusBoard>,
    mut heartbeat: Heartbeat,
    shutdown: ShutdownManager,
) {
    while shutdown.interruptible_sleep(heartbeat.interval()).await {
        if heartbeat.should_beat() {
            info!("Status: {}", board.summary());
            heartbeat.beat();
        }
    }
}
