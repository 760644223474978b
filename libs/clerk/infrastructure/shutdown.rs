//! Graceful shutdown management

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio::time::sleep;
use tracing::info;

const CHECK_INTERVAL: Duration = Duration::from_millis(50);

/// Shared cancellation flag for monitors, the token refresher and the orchestrator
///
/// Cloning yields a handle to the same flag.
#[derive(Debug, Clone)]
pub struct ShutdownManager {
    flag: Arc<AtomicBool>,
}

impl ShutdownManager {
    /// Create a new shutdown manager with running state
    pub fn new() -> Self {
        Self {
            flag: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Spawn a Ctrl+C signal handler that triggers shutdown
    pub fn spawn_signal_handler(&self) {
        let flag = Arc::clone(&self.flag);
        tokio::spawn(async move {
            if signal::ctrl_c().await.is_ok() {
                info!("");
                info!("Received shutdown signal (Ctrl+C)");
                info!("Shutting down gracefully...");
                flag.store(false, Ordering::Release);
            }
        });
    }

    /// Request shutdown from inside the process
    pub fn trigger(&self) {
        self.flag.store(false, Ordering::Release);
    }

    /// Check if the process should continue running
    pub fn is_running(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    /// Sleep for a duration, but wake early if shutdown is triggered
    ///
    /// Returns `false` when the sleep was cut short by shutdown.
    pub async fn interruptible_sleep(&self, duration: Duration) -> bool {
        let mut remaining = duration;

        while !remaining.is_zero() {
            if !self.is_running() {
                return false;
            }
            let step = remaining.min(CHECK_INTERVAL);
            sleep(step).await;
            remaining -= step;
        }

        self.is_running()
    }
}

impl Default for ShutdownManager {
    fn default() -> Self {
        Self::new()
    }
}
