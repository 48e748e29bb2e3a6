//! Core data types.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A short fact about an integer.
///
/// `(key, text)` is the content identity used for deduplication; `id` and
/// `created_at` are metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fact {
    pub id: Uuid,
    pub key: i64,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Fact {
    /// Create a fact stamped with the current time.
    ///
    /// Timestamps are truncated to milliseconds, the precision the
    /// durable store keeps.
    pub fn new(key: i64, text: impl Into<String>) -> Self {
        Self::with_timestamp(key, text, Utc::now().trunc_subsecs(3))
    }

    /// Create a fact with an explicit timestamp
    pub fn with_timestamp(key: i64, text: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            key,
            text: text.into(),
            created_at,
        }
    }

    /// Whether two facts share content identity.
    pub fn same_content(&self, other: &Fact) -> bool {
        self.key == other.key && self.text == other.text
    }

    /// Owned content identity, for use as a map key.
    pub fn content_key(&self) -> (i64, String) {
        (self.key, self.text.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_assigns_unique_ids() {
        let a = Fact::new(42, "42 is the answer.");
        let b = Fact::new(42, "42 is the answer.");
        assert_ne!(a.id, b.id);
        assert!(a.same_content(&b));
    }

    #[test]
    fn test_new_truncates_to_millis() {
        let fact = Fact::new(1, "one");
        assert_eq!(fact.created_at.timestamp_subsec_nanos() % 1_000_000, 0);
    }

    #[test]
    fn test_content_identity_ignores_metadata() {
        let t = DateTime::from_timestamp_millis(1_000).unwrap();
        let a = Fact::with_timestamp(7, "seven", t);
        let b = Fact::with_timestamp(7, "seven!", t);
        let c = Fact::with_timestamp(8, "seven", t);
        assert!(!a.same_content(&b));
        assert!(!a.same_content(&c));
        assert_eq!(a.content_key(), (7, "seven".to_string()));
    }

    #[test]
    fn test_serializes_camel_case() {
        let fact = Fact::new(3, "three");
        let json = serde_json::to_value(&fact).unwrap();
        assert!(json.get("createdAt").is_some());
        assert_eq!(json["key"], 3);
    }
}
