//! Fact: "What the user told me"
//!
//! A single free-text sentence the user stated about themselves. Facts are
//! appended when a turn is classified NEW and rewritten in place when a
//! later turn corrects them.

use serde::{Deserialize, Serialize};

/// One remembered user statement.
///
/// Serializes as `{"fact": "..."}`. Deserialization also accepts the legacy
/// bare-string shape, see [`StoredEntry`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "StoredEntry")]
pub struct Fact {
    /// The sentence as it was stored, trailing punctuation removed.
    #[serde(rename = "fact")]
    pub text: String,
}

impl Fact {
    /// Create a fact from text.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl From<&str> for Fact {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for Fact {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

/// A memory entry as it may appear in older stores.
///
/// Early stores kept each fact as a bare string; later ones wrap it as
/// `{"fact": "..."}`. Both shapes normalize to the same [`Fact`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredEntry {
    /// Bare string entry.
    Legacy(String),
    /// Structured entry.
    Structured {
        /// The fact text.
        fact: String,
    },
}

impl From<StoredEntry> for Fact {
    fn from(entry: StoredEntry) -> Self {
        match entry {
            StoredEntry::Legacy(text) | StoredEntry::Structured { fact: text } => Self { text },
        }
    }
}
