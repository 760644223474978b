//! Latest known state of every running monitor

use crate::domain::InventoryState;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEntry {
    pub state: InventoryState,
    pub updated_at: DateTime<Utc>,
}

/// Shared table keyed by monitor label
#[derive(Debug, Default)]
pub struct StatusBoard {
    entries: RwLock<BTreeMap<String, StatusEntry>>,
}

impl StatusBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, label: &str, state: InventoryState) {
        self.entries.write().insert(
            label.to_string(),
            StatusEntry {
                state,
                updated_at: Utc::now(),
            },
        );
    }

    pub fn get(&self, label: &str) -> Option<StatusEntry> {
        self.entries.read().get(label).cloned()
    }

    pub fn snapshot(&self) -> BTreeMap<String, StatusEntry> {
        self.entries.read().clone()
    }

    /// Number of monitors currently in each state
    pub fn counts(&self) -> BTreeMap<InventoryState, usize> {
        let mut counts = BTreeMap::new();
        for entry in self.entries.read().values() {
            *counts.entry(entry.state).or_insert(0) += 1;
        }
        counts
    }

    /// One-line summary for heartbeat logs
    pub fn summary(&self) -> String {
        let counts = self.counts();
        if counts.is_empty() {
            return "no observations yet".to_string();
        }
        counts
            .iter()
            .map(|(state, n)| format!("{}={}", state, n))
            .collect::<Vec<_>>()
            .join(" ")
    }
}
