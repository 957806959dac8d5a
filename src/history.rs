//! Ledger of values already produced, keyed by domain.
//!
//! A domain that is absent reads as "nothing recorded yet". Values within a
//! domain are unique and keep their insertion order, so encoding is stable
//! across a save/load round-trip.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::MarqueeError;
use crate::types::{CorpusItem, DomainName};

/// Recorded values per domain.
pub type DomainItems = IndexSet<CorpusItem>;

/// Mutable domain → recorded-values mapping persisted as a flat JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History {
    domains: IndexMap<DomainName, DomainItems>,
}

impl History {
    /// Empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a history from literal `(domain, values)` pairs. Repeated values collapse.
    pub fn from_domains<D, I, V>(domains: impl IntoIterator<Item = (D, I)>) -> Self
    where
        D: Into<DomainName>,
        I: IntoIterator<Item = V>,
        V: Into<CorpusItem>,
    {
        let domains = domains
            .into_iter()
            .map(|(name, values)| (name.into(), values.into_iter().map(Into::into).collect()))
            .collect();
        Self { domains }
    }

    /// True iff `domain` has an entry (even an empty one).
    pub fn has_domain(&self, domain: &str) -> bool {
        self.domains.contains_key(domain)
    }

    /// Membership test; an unknown domain simply yields `false`.
    pub fn has_domain_item(&self, domain: &str, value: &str) -> bool {
        self.domains
            .get(domain)
            .is_some_and(|items| items.contains(value))
    }

    /// All values recorded for `domain`.
    pub fn all_domain_items(&self, domain: &str) -> Result<&DomainItems, MarqueeError> {
        self.domains
            .get(domain)
            .ok_or_else(|| MarqueeError::UnknownDomain {
                domain: domain.to_string(),
            })
    }

    /// Record `value` under `domain`, creating the domain when needed. Idempotent.
    pub fn add_domain_item(&mut self, domain: &str, value: &str) {
        if self.has_domain_item(domain, value) {
            return;
        }
        self.domains
            .entry(domain.to_string())
            .or_default()
            .insert(value.to_string());
    }

    /// Drop `domain` entirely.
    pub fn remove_domain(&mut self, domain: &str) -> Result<(), MarqueeError> {
        self.domains
            .shift_remove(domain)
            .map(|_| ())
            .ok_or_else(|| MarqueeError::UnknownDomain {
                domain: domain.to_string(),
            })
    }

    /// Domain names in insertion order.
    pub fn domain_names(&self) -> impl Iterator<Item = &str> {
        self.domains.keys().map(String::as_str)
    }

    /// Number of domains.
    pub fn len(&self) -> usize {
        self.domains.len()
    }

    /// True when no domain is recorded.
    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    /// Decode `{domain: [values...]}`.
    ///
    /// An empty JSON array (`[]`) is accepted as an empty history, since that is
    /// what freshly seeded history files contain.
    pub fn from_json_str(origin: &str, json: &str) -> Result<Self, MarqueeError> {
        let value: Value =
            serde_json::from_str(json).map_err(|err| MarqueeError::decode(origin, err))?;
        match value {
            Value::Array(entries) if entries.is_empty() => Ok(Self::new()),
            other => serde_json::from_value(other).map_err(|err| MarqueeError::decode(origin, err)),
        }
    }

    /// Compact (non-pretty) JSON encoding.
    pub fn to_json_string(&self) -> Result<String, MarqueeError> {
        serde_json::to_string(self).map_err(|err| MarqueeError::encode("history", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_then_has_domain_item() {
        let mut history = History::new();
        assert!(!history.has_domain_item("fruits", "apple"));
        history.add_domain_item("fruits", "apple");
        assert!(history.has_domain("fruits"));
        assert!(history.has_domain_item("fruits", "apple"));
    }

    #[test]
    fn add_domain_item_is_idempotent() {
        let mut history = History::new();
        history.add_domain_item("fruits", "apple");
        history.add_domain_item("fruits", "apple");
        assert_eq!(history.all_domain_items("fruits").unwrap().len(), 1);
    }

    #[test]
    fn has_domain_item_of_unknown_domain_is_false() {
        let history = History::from_domains([("domain", ["item1", "item2"])]);
        assert!(!history.has_domain_item("domain2", "item1"));
        assert!(history.has_domain_item("domain", "item1"));
        assert!(!history.has_domain_item("domain", "item3"));
    }

    #[test]
    fn all_domain_items_preserves_insertion_order() {
        let history = History::from_domains([("domain", ["item1", "item2"])]);
        let items: Vec<&str> = history
            .all_domain_items("domain")
            .unwrap()
            .iter()
            .map(String::as_str)
            .collect();
        assert_eq!(items, ["item1", "item2"]);
    }

    #[test]
    fn unknown_domain_errors() {
        let mut history = History::new();
        assert!(matches!(
            history.all_domain_items("missing"),
            Err(MarqueeError::UnknownDomain { .. })
        ));
        assert!(matches!(
            history.remove_domain("missing"),
            Err(MarqueeError::UnknownDomain { .. })
        ));
    }

    #[test]
    fn remove_domain_drops_entry() {
        let mut history = History::from_domains([("fruits", ["apple"]), ("colors", ["red"])]);
        history.remove_domain("fruits").unwrap();
        assert!(!history.has_domain("fruits"));
        assert_eq!(history.domain_names().collect::<Vec<_>>(), ["colors"]);
    }

    #[test]
    fn json_round_trip_is_compact_and_stable() {
        let history =
            History::from_domains([("fruits", vec!["apple", "raisin"]), ("colors", vec!["red"])]);
        let encoded = history.to_json_string().unwrap();
        assert_eq!(encoded, r#"{"fruits":["apple","raisin"],"colors":["red"]}"#);
        let decoded = History::from_json_str("history.json", &encoded).unwrap();
        assert_eq!(decoded, history);
    }

    #[test]
    fn empty_array_and_object_decode_as_empty() {
        assert!(History::from_json_str("a", "[]").unwrap().is_empty());
        assert!(History::from_json_str("b", "{}").unwrap().is_empty());
    }

    #[test]
    fn malformed_history_is_a_decode_error() {
        assert!(matches!(
            History::from_json_str("history.json", "{\"fruits\":"),
            Err(MarqueeError::Decode { .. })
        ));
        assert!(matches!(
            History::from_json_str("history.json", r#"{"fruits":"apple"}"#),
            Err(MarqueeError::Decode { .. })
        ));
        assert!(matches!(
            History::from_json_str("history.json", r#"["apple"]"#),
            Err(MarqueeError::Decode { .. })
        ));
    }
}
