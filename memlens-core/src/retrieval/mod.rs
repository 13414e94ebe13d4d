//! Memory Retrieval: keyword-overlap scoring over the fact store (Step A).
//!
//! Every fact is scored against the latest input, the list is stable-sorted
//! by descending score and truncated to `top_k`. Facts with equal scores
//! keep their store order. The jitter term imitates the noise of a real
//! similarity model and comes from the caller's RNG.

pub mod scoring;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::RetrievalConfig;
use crate::jitter;
use crate::memory::MemoryStore;
use crate::types::RetrievalScore;

/// A scored retrieval result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalResult {
    /// Text of the retrieved fact, as stored at retrieval time.
    pub fact: String,
    /// Similarity score, two decimals.
    pub score: RetrievalScore,
}

/// The retrieval engine that ranks stored facts for a given input.
#[derive(Debug, Clone)]
pub struct RetrievalEngine {
    config: RetrievalConfig,
}

impl RetrievalEngine {
    /// Create a new retrieval engine with the given configuration.
    #[must_use]
    pub fn new(config: RetrievalConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    /// Score every fact against `input` and return the best `top_k`.
    ///
    /// An empty store yields an empty result without touching the RNG.
    pub fn retrieve<R: Rng + ?Sized>(
        &self,
        input: &str,
        store: &MemoryStore,
        rng: &mut R,
    ) -> Vec<RetrievalResult> {
        if store.is_empty() {
            return Vec::new();
        }

        let chars = scoring::input_chars(input);
        let mut results: Vec<RetrievalResult> = store
            .iter()
            .map(|fact| {
                let tokens = scoring::fact_tokens(&fact.text, &self.config.separators);
                let overlap = scoring::overlap(&tokens, &chars);
                let noise = jitter::uniform(rng, 0.0, self.config.score_jitter);
                RetrievalResult {
                    fact: fact.text.clone(),
                    score: RetrievalScore::new(scoring::score(overlap, noise, &self.config)),
                }
            })
            .collect();

        // `sort_by` is stable: equal scores keep store order.
        results.sort_by(|a, b| b.score.cmp(&a.score));
        results.truncate(self.config.top_k);
        results
    }
}
