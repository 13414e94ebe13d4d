//! Panel state: the per-turn bundle shown beside the chat.
//!
//! Four sections: retrieved facts, the change-log entry, the synthesized
//! prompt and the metrics. The whole panel is replaced after every turn;
//! before the first turn every section is empty.

use serde::{Deserialize, Serialize};

use crate::classification::MemoryChange;
use crate::metrics::TurnMetrics;
use crate::pipeline::TurnOutcome;
use crate::retrieval::RetrievalResult;

/// Snapshot of the most recent turn's pipeline output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PanelState {
    /// Retrieved facts, descending score.
    pub retrieved: Vec<RetrievalResult>,
    /// The turn's change-log entry. `None` before the first turn.
    pub change: Option<MemoryChange>,
    /// Final prompt. Empty before the first turn.
    pub final_prompt: String,
    /// Turn metrics. `None` before the first turn.
    pub metrics: Option<TurnMetrics>,
}

impl PanelState {
    /// Panel for a completed turn.
    #[must_use]
    pub fn from_outcome(outcome: &TurnOutcome) -> Self {
        Self {
            retrieved: outcome.retrieved.clone(),
            change: Some(outcome.change.clone()),
            final_prompt: outcome.prompt.clone(),
            metrics: Some(outcome.metrics),
        }
    }

    /// Whether no turn has populated this panel yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.change.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MemlensConfig;
    use crate::memory::MemoryStore;
    use crate::pipeline::MemoryPipeline;

    #[test]
    fn default_panel_is_empty() {
        let panel = PanelState::default();
        assert!(panel.is_empty());
        assert!(panel.retrieved.is_empty());
        assert!(panel.final_prompt.is_empty());
        assert!(panel.metrics.is_none());
    }

    #[test]
    fn panel_mirrors_outcome() {
        let mut pipeline = MemoryPipeline::with_seed(&MemlensConfig::default(), 3);
        let mut store = MemoryStore::new();
        let outcome = pipeline.process("我住在杭州", &mut store);
        let panel = PanelState::from_outcome(&outcome);
        assert!(!panel.is_empty());
        assert_eq!(panel.change.as_ref(), Some(&outcome.change));
        assert_eq!(panel.final_prompt, outcome.prompt);
        assert_eq!(panel.metrics, Some(outcome.metrics));
    }
}
