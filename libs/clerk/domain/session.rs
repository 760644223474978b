//! Store session credential

use chrono::{DateTime, Utc};
use std::fmt;

/// Opaque bearer credential required by cart and checkout calls
///
/// Fields never change once issued, so a token can be shared by cloning.
#[derive(Clone)]
pub struct SessionToken {
    value: String,
    acquired_at: DateTime<Utc>,
}

impl SessionToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            acquired_at: Utc::now(),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn acquired_at(&self) -> DateTime<Utc> {
        self.acquired_at
    }

    /// Compare by credential value, ignoring when it was acquired
    pub fn same_value(&self, other: &SessionToken) -> bool {
        self.value == other.value
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionToken")
            .field("value", &"[REDACTED]")
            .field("acquired_at", &self.acquired_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_value_ignores_acquisition_time() {
        let first = SessionToken::new("abc");
        let second = SessionToken::new("abc");
        let third = SessionToken::new("xyz");
        assert!(first.same_value(&second));
        assert!(!first.same_value(&third));
    }

    #[test]
    fn test_debug_redacts_value() {
        let token = SessionToken::new("secret-session");
        let debug_str = format!("{:?}", token);
        assert!(!debug_str.contains("secret-session"));
        assert!(debug_str.contains("[REDACTED]"));
    }
}
