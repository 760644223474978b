//! Alerts handed from monitors to the notifier

use super::inventory::InventoryState;

/// Text sent in place of the checkout link when running in remote mode
pub const REMOTE_CHECKOUT_TEXT: &str = "Checkout available on system running this program";

/// Something worth telling the user about
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Alert {
    /// A monitored target moved between two non-purchasable states
    StatusChange {
        id: String,
        previous: InventoryState,
        current: InventoryState,
        url: String,
    },
    /// A monitored target can be bought
    ReadyForPurchase { id: String, url: String },
}

impl Alert {
    pub fn status_change(
        id: impl Into<String>,
        previous: InventoryState,
        current: InventoryState,
        url: impl Into<String>,
    ) -> Self {
        Self::StatusChange {
            id: id.into(),
            previous,
            current,
            url: url.into(),
        }
    }

    pub fn ready_for_purchase(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self::ReadyForPurchase {
            id: id.into(),
            url: url.into(),
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Self::StatusChange { id, .. } | Self::ReadyForPurchase { id, .. } => id,
        }
    }

    pub fn url(&self) -> &str {
        match self {
            Self::StatusChange { url, .. } | Self::ReadyForPurchase { url, .. } => url,
        }
    }

    /// Headline without any link, safe for public posting
    pub fn headline(&self) -> String {
        match self {
            Self::StatusChange {
                id,
                previous,
                current,
                ..
            } => format!("{} status changed: {} -> {}", id, previous, current),
            Self::ReadyForPurchase { id, .. } => format!("{} Ready for Purchase", id),
        }
    }

    /// True when the url is a real link rather than the remote-mode text
    pub fn has_link(&self) -> bool {
        let url = self.url();
        url.starts_with("http://") || url.starts_with("https://")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headlines() {
        let ready = Alert::ready_for_purchase("RTX 3080", "https://example.com/checkout");
        assert_eq!(ready.headline(), "RTX 3080 Ready for Purchase");

        let change = Alert::status_change(
            "USA/3080",
            InventoryState::Unset,
            InventoryState::Online,
            "https://example.com",
        );
        assert_eq!(change.headline(), "USA/3080 status changed: unset -> online");
    }

    #[test]
    fn test_remote_text_is_not_a_link() {
        let alert = Alert::ready_for_purchase("RTX 3080", REMOTE_CHECKOUT_TEXT);
        assert!(!alert.has_link());
        assert!(Alert::ready_for_purchase("x", "https://a.b").has_link());
    }
}
