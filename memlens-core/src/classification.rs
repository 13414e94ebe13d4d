//! Write classification: deciding what a turn does to the store (Step B).
//!
//! Two trigger lists drive the decision:
//!
//! - **edit** triggers ("其实", "不对", "改成", ...) mark a correction. If the
//!   store holds anything, the most recent fact is rewritten.
//! - **new** triggers ("叫", "喜欢", "住在", ...) mark a statement worth
//!   remembering; it is appended.
//!
//! Edit is checked first, so an input carrying both kinds of trigger updates
//! the last fact whenever one exists. Everything else is a no-op.

use serde::{Deserialize, Serialize};

use crate::config::ClassificationConfig;
use crate::memory::MemoryStore;
use crate::types::ChangeKind;

/// The single change-log entry produced by a turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum MemoryChange {
    /// A new fact was appended.
    New {
        /// Text of the appended fact.
        fact: String,
    },
    /// The last fact was rewritten.
    Update {
        /// Text before the rewrite.
        old: String,
        /// Text after the rewrite.
        new: String,
    },
    /// Nothing was written.
    Noop {
        /// Explanation shown in the change log.
        note: String,
    },
}

impl MemoryChange {
    /// Which kind of change this is.
    #[must_use]
    pub fn kind(&self) -> ChangeKind {
        match self {
            Self::New { .. } => ChangeKind::New,
            Self::Update { .. } => ChangeKind::Update,
            Self::Noop { .. } => ChangeKind::Noop,
        }
    }

    /// Change-log text for display.
    #[must_use]
    pub fn content(&self) -> String {
        match self {
            Self::New { fact } => fact.clone(),
            Self::Update { old, new } => format!("旧：{old}  →  新：{new}"),
            Self::Noop { note } => note.clone(),
        }
    }
}

/// Which branch an input falls into, before anything is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteDecision {
    /// Rewrite the most recent fact.
    Update,
    /// Append a new fact.
    New,
    /// Leave the store alone.
    Noop,
}

/// Trigger-word classifier.
#[derive(Debug, Clone)]
pub struct Classifier {
    config: ClassificationConfig,
}

impl Classifier {
    /// Create a classifier from trigger configuration.
    #[must_use]
    pub fn new(config: ClassificationConfig) -> Self {
        Self { config }
    }

    /// Whether `input` contains any edit trigger.
    #[must_use]
    pub fn is_edit(&self, input: &str) -> bool {
        contains_any(input, &self.config.edit_triggers)
    }

    /// Whether `input` contains any new-fact trigger.
    #[must_use]
    pub fn is_new(&self, input: &str) -> bool {
        contains_any(input, &self.config.new_triggers)
    }

    /// Decide the branch for `input` given whether the store has any facts.
    #[must_use]
    pub fn decide(&self, input: &str, store_is_empty: bool) -> WriteDecision {
        if self.is_edit(input) && !store_is_empty {
            WriteDecision::Update
        } else if self.is_new(input) {
            WriteDecision::New
        } else {
            WriteDecision::Noop
        }
    }

    /// Input text as it would be stored: configured punctuation removed
    /// from both ends.
    #[must_use]
    pub fn normalize<'a>(&self, input: &'a str) -> &'a str {
        input.trim_matches(|c: char| self.config.strip_chars.contains(&c))
    }

    /// Classify `input` and apply the resulting write to `store`.
    pub fn apply(&self, input: &str, store: &mut MemoryStore) -> MemoryChange {
        match self.decide(input, store.is_empty()) {
            WriteDecision::Update => {
                let new = self.normalize(input).to_string();
                match store.rewrite_last(new.clone()) {
                    Some(old) => MemoryChange::Update { old, new },
                    // `decide` only picks Update for a non-empty store.
                    None => self.noop(),
                }
            }
            WriteDecision::New => {
                let fact = self.normalize(input).to_string();
                store.append(fact.clone());
                MemoryChange::New { fact }
            }
            WriteDecision::Noop => self.noop(),
        }
    }

    fn noop(&self) -> MemoryChange {
        MemoryChange::Noop {
            note: self.config.noop_note.clone(),
        }
    }
}

fn contains_any(input: &str, triggers: &[String]) -> bool {
    triggers
        .iter()
        .any(|t| !t.is_empty() && input.contains(t.as_str()))
}
