//! Add-to-cart and checkout automation

use crate::domain::{MonitorTarget, SessionToken};
use crate::infrastructure::client::store::{StoreClient, StoreError};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum CheckoutError {
    #[error("Add to cart failed: {0}")]
    AddToCart(#[source] StoreError),

    #[error("Checkout request failed: {0}")]
    Checkout(#[source] StoreError),

    #[error("No session token available: {0}")]
    NoSession(#[source] StoreError),
}

pub type Result<T> = std::result::Result<T, CheckoutError>;

/// Remote cart operations
#[async_trait]
pub trait CartApi: Send + Sync {
    /// Set the target's SKU in the active cart to quantity one
    async fn add_to_cart(
        &self,
        target: &MonitorTarget,
        token: &SessionToken,
    ) -> std::result::Result<(), StoreError>;

    /// URL of the checkout page for the active cart
    async fn checkout_url(
        &self,
        target: &MonitorTarget,
        token: &SessionToken,
    ) -> std::result::Result<String, StoreError>;
}

#[async_trait]
impl CartApi for StoreClient {
    async fn add_to_cart(
        &self,
        target: &MonitorTarget,
        token: &SessionToken,
    ) -> std::result::Result<(), StoreError> {
        let response = StoreClient::add_to_cart(self, target, token).await?;
        if let Some(location) = response.location {
            debug!("Cart location: {}", location);
        }
        Ok(())
    }

    async fn checkout_url(
        &self,
        target: &MonitorTarget,
        token: &SessionToken,
    ) -> std::result::Result<String, StoreError> {
        self.web_checkout_url(target, token).await
    }
}

#[async_trait]
pub trait CheckoutAutomator: Send + Sync {
    /// Run the whole purchase sequence, returning the checkout URL
    async fn execute(&self, target: &MonitorTarget, token: &SessionToken) -> Result<String>;
}

/// Two-step sequence: add to cart, then fetch the checkout URL
///
/// Always runs both steps. Repeating the first step is safe since the cart
/// quantity stays at one.
pub struct StoreCheckout {
    cart: Arc<dyn CartApi>,
}

impl StoreCheckout {
    pub fn new(cart: Arc<dyn CartApi>) -> Self {
        Self { cart }
    }
}

#[async_trait]
impl CheckoutAutomator for StoreCheckout {
    async fn execute(&self, target: &MonitorTarget, token: &SessionToken) -> Result<String> {
        self.cart
            .add_to_cart(target, token)
            .await
            .map_err(CheckoutError::AddToCart)?;
        info!("{} added to cart", target);

        let url = self
            .cart
            .checkout_url(target, token)
            .await
            .map_err(CheckoutError::Checkout)?;
        info!("{} checkout ready", target);

        Ok(url)
    }
}
