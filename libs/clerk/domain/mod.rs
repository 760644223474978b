//! Domain Layer
//!
//! Contains pure business entities and domain models.
//! This layer has no dependencies on infrastructure or application layers.

pub mod alert;
pub mod inventory;
pub mod session;

pub use alert::{Alert, REMOTE_CHECKOUT_TEXT};
pub use inventory::{
    InventoryState, MonitorTarget, Observation, StateTracker, Transition, IN_STOCK_STATUS,
};
pub use session::SessionToken;
