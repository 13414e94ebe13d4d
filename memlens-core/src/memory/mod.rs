//! The memory store: an ordered list of [`Fact`]s owned by one chat session.
//!
//! Facts are kept in insertion order and identified only by position. The
//! store never shrinks during a session: the only mutations are appending a
//! new fact and rewriting the text of the most recent one. [`MemoryStore::clear`]
//! exists solely for starting a fresh session.

pub mod fact;

pub use fact::{Fact, StoredEntry};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Ordered collection of facts for one session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemoryStore {
    facts: Vec<Fact>,
}

impl MemoryStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from entries of either stored shape, normalizing each.
    #[must_use]
    pub fn from_entries(entries: impl IntoIterator<Item = StoredEntry>) -> Self {
        Self {
            facts: entries.into_iter().map(Fact::from).collect(),
        }
    }

    /// Parse a JSON array of entries (bare strings or `{"fact": ...}` objects).
    ///
    /// # Errors
    /// Returns `MemlensError::Serialization` if the JSON is not such an array.
    pub fn from_json(json: &str) -> Result<Self> {
        let entries: Vec<StoredEntry> = serde_json::from_str(json)?;
        Ok(Self::from_entries(entries))
    }

    /// Serialize as a pretty JSON array of `{"fact": ...}` objects.
    ///
    /// # Errors
    /// Returns `MemlensError::Serialization` on encoder failure.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Number of stored facts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.facts.len()
    }

    /// Whether nothing has been remembered yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    /// Facts in insertion order.
    #[must_use]
    pub fn facts(&self) -> &[Fact] {
        &self.facts
    }

    /// Iterate facts in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Fact> {
        self.facts.iter()
    }

    /// The most recently added fact, the only one eligible for rewriting.
    #[must_use]
    pub fn last(&self) -> Option<&Fact> {
        self.facts.last()
    }

    /// Append a fact. Returns its index.
    pub fn append(&mut self, text: impl Into<String>) -> usize {
        self.facts.push(Fact::new(text));
        self.facts.len() - 1
    }

    /// Replace the text of the most recent fact, returning the old text.
    ///
    /// Returns `None` (and changes nothing) when the store is empty.
    pub fn rewrite_last(&mut self, text: impl Into<String>) -> Option<String> {
        let last = self.facts.last_mut()?;
        Some(std::mem::replace(&mut last.text, text.into()))
    }

    /// Forget everything. Only used when a session restarts.
    pub fn clear(&mut self) {
        self.facts.clear();
    }
}

impl<'a> IntoIterator for &'a MemoryStore {
    type Item = &'a Fact;
    type IntoIter = std::slice::Iter<'a, Fact>;

    fn into_iter(self) -> Self::IntoIter {
        self.facts.iter()
    }
}

impl FromIterator<Fact> for MemoryStore {
    fn from_iter<I: IntoIterator<Item = Fact>>(iter: I) -> Self {
        Self {
            facts: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_preserves_order() {
        let mut store = MemoryStore::new();
        assert_eq!(store.append("我叫小明"), 0);
        assert_eq!(store.append("我住在北京"), 1);
        let texts: Vec<&str> = store.iter().map(|f| f.text.as_str()).collect();
        assert_eq!(texts, vec!["我叫小明", "我住在北京"]);
    }

    #[test]
    fn rewrite_last_touches_only_the_last_fact() {
        let mut store: MemoryStore = ["a", "b", "c"].into_iter().map(Fact::from).collect();
        let old = store.rewrite_last("z");
        assert_eq!(old.as_deref(), Some("c"));
        assert_eq!(store.len(), 3);
        assert_eq!(store.facts()[0].text, "a");
        assert_eq!(store.facts()[1].text, "b");
        assert_eq!(store.facts()[2].text, "z");
    }

    #[test]
    fn rewrite_last_on_empty_store_is_none() {
        let mut store = MemoryStore::new();
        assert_eq!(store.rewrite_last("x"), None);
        assert!(store.is_empty());
    }

    #[test]
    fn json_import_accepts_legacy_entries() {
        let store = MemoryStore::from_json(r#"["我喜欢猫", {"fact": "我养了一只狗"}]"#)
            .expect("mixed store parses");
        assert_eq!(store.len(), 2);
        assert_eq!(store.facts()[0].text, "我喜欢猫");
        assert_eq!(store.facts()[1].text, "我养了一只狗");
    }

    #[test]
    fn json_export_is_structured() {
        let store = MemoryStore::from_entries([StoredEntry::Legacy("我叫小明".to_string())]);
        let json = store.to_json().expect("serialize");
        let back = MemoryStore::from_json(&json).expect("reparse");
        assert_eq!(back, store);
        assert!(json.contains("\"fact\""));
    }

    #[test]
    fn json_import_rejects_non_array() {
        assert!(MemoryStore::from_json(r#"{"fact": "x"}"#).is_err());
        assert!(MemoryStore::from_json("[1, 2]").is_err());
    }
}
