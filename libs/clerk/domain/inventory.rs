//! Inventory state and monitor targets

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status value the store reports when a product can be purchased
pub const IN_STOCK_STATUS: &str = "PRODUCT_INVENTORY_IN_STOCK";

/// Classification of the most recent successful observation of a target
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum InventoryState {
    /// Initial sentinel, never produced by a poll
    Unset,
    /// Session endpoint failed its liveness probe
    Offline,
    /// Endpoint answered but the product is not purchasable
    Online,
    /// Product is purchasable right now
    InStock,
}

impl InventoryState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unset => "unset",
            Self::Offline => "offline",
            Self::Online => "online",
            Self::InStock => "in_stock",
        }
    }

    pub fn is_in_stock(&self) -> bool {
        matches!(self, Self::InStock)
    }
}

impl Default for InventoryState {
    fn default() -> Self {
        Self::Unset
    }
}

impl fmt::Display for InventoryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One product in one region, watched by exactly one monitor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorTarget {
    /// Three letter region code (USA, GBR, DEU, ...)
    pub region: String,
    /// Model name as given on the command line (3080, 3090, ...)
    pub model: String,
    /// Store SKU polled for this region and model
    pub sku: String,
    /// Locale used by the inventory and cart API
    pub locale: String,
    /// Locale used by product pages on the public store site
    pub store_locale: String,
    /// ISO currency code
    pub currency: String,
}

impl MonitorTarget {
    /// Short label used as a log prefix and status board key
    pub fn label(&self) -> String {
        format!("{}/{}", self.region, self.model)
    }
}

impl fmt::Display for MonitorTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} (sku {})", self.region, self.model, self.sku)
    }
}

/// Result of one successful poll
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    pub state: InventoryState,
    pub product_id: String,
    pub product_name: String,
    /// Raw status string reported upstream, kept for logging
    pub status: String,
}

/// A change between two consecutive classified states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub previous: InventoryState,
    pub current: InventoryState,
}

/// Edge-triggered state holder
///
/// Starts at `Unset` so the first real observation always counts as a
/// transition. Re-observing the current state never yields one.
#[derive(Debug, Clone, Default)]
pub struct StateTracker {
    current: InventoryState,
}

impl StateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> InventoryState {
        self.current
    }

    /// Record a new classified state, returning the transition if it changed
    pub fn observe(&mut self, state: InventoryState) -> Option<Transition> {
        if state == self.current {
            return None;
        }

        let transition = Transition {
            previous: self.current,
            current: state,
        };
        self.current = state;
        Some(transition)
    }
}
