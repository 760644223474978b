//! Session credential lifecycle
//!
//! A [`CredentialProvider`] performs one acquisition per call and caches
//! nothing. The [`SessionCell`] holds the current token for every reader,
//! and the [`TokenRefresher`] keeps it fresh in the background.

use crate::domain::SessionToken;
use crate::infrastructure::client::store::{StoreClient, StoreError};
use crate::infrastructure::retry::RetryPolicy;
use crate::infrastructure::shutdown::ShutdownManager;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Perform one session-establishment call
    async fn acquire(&self) -> Result<SessionToken, StoreError>;
}

#[async_trait]
impl CredentialProvider for StoreClient {
    async fn acquire(&self) -> Result<SessionToken, StoreError> {
        self.session_token().await
    }
}

/// Single-writer, many-reader holder of the current session token
#[derive(Debug, Default)]
pub struct SessionCell {
    inner: RwLock<Option<SessionToken>>,
}

pub type SharedSession = Arc<SessionCell>;

impl SessionCell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedSession {
        Arc::new(Self::new())
    }

    /// Clone of the current token, if any
    pub fn get(&self) -> Option<SessionToken> {
        self.inner.read().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_none()
    }

    /// Store `token` unless an equal value is already held
    ///
    /// Returns whether the held value changed.
    pub fn publish(&self, token: SessionToken) -> bool {
        let mut guard = self.inner.write();
        match guard.as_ref() {
            Some(current) if current.same_value(&token) => false,
            _ => {
                *guard = Some(token);
                true
            }
        }
    }
}

/// Return the held token, acquiring and publishing one when the cell is empty
pub async fn current_or_acquire(
    cell: &SessionCell,
    provider: &dyn CredentialProvider,
) -> Result<SessionToken, StoreError> {
    if let Some(token) = cell.get() {
        return Ok(token);
    }

    let token = provider.acquire().await?;
    cell.publish(token.clone());
    Ok(token)
}

/// Background worker that re-acquires the session token on a cadence
pub struct TokenRefresher {
    provider: Arc<dyn CredentialProvider>,
    cell: SharedSession,
    policy: Arc<dyn RetryPolicy>,
    shutdown: ShutdownManager,
}

/// What a refresher did before it stopped
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshStats {
    pub acquired: usize,
    pub published: usize,
    pub failed: usize,
}

impl TokenRefresher {
    pub fn new(
        provider: Arc<dyn CredentialProvider>,
        cell: SharedSession,
        policy: Arc<dyn RetryPolicy>,
        shutdown: ShutdownManager,
    ) -> Self {
        Self {
            provider,
            cell,
            policy,
            shutdown,
        }
    }

    /// Acquire once and publish on change; `Err` leaves the cell untouched
    pub async fn refresh_once(&self) -> Result<bool, StoreError> {
        let token = self.provider.acquire().await?;
        let changed = self.cell.publish(token);
        if changed {
            info!("Session token refreshed");
        } else {
            debug!("Session token unchanged");
        }
        Ok(changed)
    }

    /// Refresh until shutdown or until the policy gives up
    pub async fn run(self) -> RefreshStats {
        let mut stats = RefreshStats::default();
        let mut failures = 0usize;

        while self.shutdown.is_running() {
            match self.refresh_once().await {
                Ok(changed) => {
                    stats.acquired += 1;
                    if changed {
                        stats.published += 1;
                    }
                    failures = 0;
                }
                Err(e) => {
                    warn!("Error getting session token, retrying: {}", e);
                    stats.failed += 1;
                    failures += 1;
                }
            }

            let Some(delay) = self.policy.next_delay(failures) else {
                warn!("Session refresher giving up after {} failures", failures);
                break;
            };
            if !self.shutdown.interruptible_sleep(delay).await {
                break;
            }
        }

        debug!("Session refresher stopped: {:?}", stats);
        stats
    }
}
