//! External API clients
//!
//! Provides the store client (session, inventory, cart, checkout) and the
//! notification channel clients.

pub mod notify;
pub mod store;

pub use notify::{build_sender, AlertSender, ChannelMessage, NotifyError};
pub use store::{StoreClient, StoreError};
