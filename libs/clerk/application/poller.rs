//! Availability polling and classification

use super::credentials::{CredentialProvider, SharedSession};
use crate::domain::{InventoryState, MonitorTarget, Observation, IN_STOCK_STATUS};
use crate::infrastructure::client::store::{ProductsResponse, StoreClient, StoreError};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Status reported by a session probe whose acquisition succeeded
pub const SESSION_ONLINE_STATUS: &str = "SESSION_TOKEN_ACQUIRED";
/// Status reported by a session probe whose acquisition failed
pub const SESSION_OFFLINE_STATUS: &str = "SESSION_TOKEN_UNAVAILABLE";

#[derive(Error, Debug)]
pub enum PollError {
    #[error("Store request failed: {0}")]
    Transport(#[from] StoreError),

    #[error("Store returned no product records for sku {sku}")]
    UpstreamInconsistency { sku: String },
}

pub type Result<T> = std::result::Result<T, PollError>;

/// One inventory lookup for a target
#[async_trait]
pub trait AvailabilityPoller: Send + Sync {
    async fn poll(&self, target: &MonitorTarget) -> Result<Observation>;
}

/// Turn a product lookup response into an observation
///
/// An empty product list is a known upstream glitch, not an out-of-stock
/// signal, so it surfaces as an error and leaves the monitor state alone.
pub fn classify(target: &MonitorTarget, response: &ProductsResponse) -> Result<Observation> {
    let product = response
        .first()
        .ok_or_else(|| PollError::UpstreamInconsistency {
            sku: target.sku.clone(),
        })?;

    let status = product.inventory_status.status.clone();
    let state = if status == IN_STOCK_STATUS {
        InventoryState::InStock
    } else {
        InventoryState::Online
    };

    Ok(Observation {
        state,
        product_id: product.id.to_string(),
        product_name: product.name.clone(),
        status,
    })
}

/// Polls the store's product endpoint
#[derive(Debug, Clone)]
pub struct StorePoller {
    client: StoreClient,
}

impl StorePoller {
    pub fn new(client: StoreClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AvailabilityPoller for StorePoller {
    async fn poll(&self, target: &MonitorTarget) -> Result<Observation> {
        let response = self.client.product_info(target).await?;
        classify(target, &response)
    }
}

/// Liveness probe for monitors without a product payload
///
/// A successful acquisition means `Online` (and the token is published when
/// a cell is attached); a failed one means `Offline`. The probe itself never
/// errors.
pub struct SessionProbe {
    provider: Arc<dyn CredentialProvider>,
    cell: Option<SharedSession>,
}

impl SessionProbe {
    pub fn new(provider: Arc<dyn CredentialProvider>) -> Self {
        Self {
            provider,
            cell: None,
        }
    }

    pub fn with_cell(mut self, cell: SharedSession) -> Self {
        self.cell = Some(cell);
        self
    }
}

#[async_trait]
impl AvailabilityPoller for SessionProbe {
    async fn poll(&self, target: &MonitorTarget) -> Result<Observation> {
        let (state, status) = match self.provider.acquire().await {
            Ok(token) => {
                if let Some(cell) = &self.cell {
                    cell.publish(token);
                }
                (InventoryState::Online, SESSION_ONLINE_STATUS)
            }
            Err(e) => {
                debug!("{} session probe failed: {}", target.label(), e);
                (InventoryState::Offline, SESSION_OFFLINE_STATUS)
            }
        };

        Ok(Observation {
            state,
            product_id: String::new(),
            product_name: format!("{} store session", target.region),
            status: status.to_string(),
        })
    }
}
