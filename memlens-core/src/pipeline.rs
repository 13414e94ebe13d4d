//! The memory pipeline: one call per user turn.
//!
//! ```text
//! input ──▶ A: retrieve ──▶ B: classify/write ──▶ C: prompt ──▶ D: metrics ──▶ E: reply
//!              (reads store)   (mutates store)
//! ```
//!
//! Retrieval always sees the store as it was *before* this turn's write, so
//! a fact stated in this turn is never retrieved in the same turn. The
//! pipeline owns its configuration and random source but not the store,
//! which the hosting session passes in by `&mut`.

use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::classification::{Classifier, MemoryChange};
use crate::config::{MemlensConfig, MetricsConfig};
use crate::memory::MemoryStore;
use crate::metrics::{self, TurnMetrics};
use crate::prompt;
use crate::reply;
use crate::retrieval::{RetrievalEngine, RetrievalResult};

/// Everything one turn produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnOutcome {
    /// Assistant reply text.
    pub reply: String,
    /// Best-scoring facts, at most `top_k`, descending.
    pub retrieved: Vec<RetrievalResult>,
    /// What the turn did to the store.
    pub change: MemoryChange,
    /// The synthesized prompt.
    pub prompt: String,
    /// Fabricated metrics.
    pub metrics: TurnMetrics,
}

/// Runs Steps A–E against a caller-owned [`MemoryStore`].
#[derive(Debug)]
pub struct MemoryPipeline<R = StdRng> {
    retrieval: RetrievalEngine,
    classifier: Classifier,
    metrics: MetricsConfig,
    rng: R,
}

impl MemoryPipeline<StdRng> {
    /// Pipeline with a seeded generator; identical seeds replay identically.
    #[must_use]
    pub fn with_seed(config: &MemlensConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    /// Pipeline seeded from `config.general.seed`, or from OS entropy when unset.
    #[must_use]
    pub fn from_config(config: &MemlensConfig) -> Self {
        match config.general.seed {
            Some(seed) => Self::with_seed(config, seed),
            None => Self::with_rng(config, StdRng::from_entropy()),
        }
    }
}

impl<R: Rng> MemoryPipeline<R> {
    /// Pipeline drawing all noise from `rng`.
    #[must_use]
    pub fn with_rng(config: &MemlensConfig, rng: R) -> Self {
        Self {
            retrieval: RetrievalEngine::new(config.retrieval.clone()),
            classifier: Classifier::new(config.classification.clone()),
            metrics: config.metrics.clone(),
            rng,
        }
    }

    /// The retrieval engine in use.
    #[must_use]
    pub fn retrieval(&self) -> &RetrievalEngine {
        &self.retrieval
    }

    /// The classifier in use.
    #[must_use]
    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Process one user turn, possibly mutating `store`.
    ///
    /// Accepts any string, including the empty one. Cannot fail.
    pub fn process(&mut self, input: &str, store: &mut MemoryStore) -> TurnOutcome {
        // --- A. Retrieval ---
        let started = Instant::now();
        let retrieved = self.retrieval.retrieve(input, store, &mut self.rng);
        let retrieval_elapsed = started.elapsed();
        debug!(
            facts = store.len(),
            retrieved = retrieved.len(),
            elapsed_us = u64::try_from(retrieval_elapsed.as_micros()).unwrap_or(u64::MAX),
            "retrieval scored"
        );

        // --- B. Classification ---
        let change = self.classifier.apply(input, store);
        match &change {
            MemoryChange::New { fact } => {
                info!(fact = %fact, store_len = store.len(), "memory appended");
            }
            MemoryChange::Update { old, new } => {
                info!(old = %old, new = %new, store_len = store.len(), "memory rewritten");
            }
            MemoryChange::Noop { .. } => debug!("no memory write"),
        }

        // --- C. Prompt synthesis ---
        let prompt = prompt::synthesize(input, &retrieved);

        // --- D. Metrics ---
        let metrics = metrics::synthesize(&prompt, retrieval_elapsed, &self.metrics, &mut self.rng);
        debug!(
            retrieval_time_ms = metrics.retrieval_time_ms,
            prompt_tokens = metrics.prompt_tokens,
            reply_tokens = metrics.reply_tokens,
            "turn metrics"
        );

        // --- E. Reply ---
        let reply = reply::compose(input, &retrieved);

        TurnOutcome {
            reply,
            retrieved,
            change,
            prompt,
            metrics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::Fact;
    use crate::types::ChangeKind;

    #[test]
    fn fact_stated_this_turn_is_not_retrieved() {
        let mut pipeline = MemoryPipeline::with_seed(&MemlensConfig::default(), 5);
        let mut store = MemoryStore::new();
        let out = pipeline.process("我叫小明", &mut store);
        assert!(out.retrieved.is_empty());
        assert_eq!(out.change.kind(), ChangeKind::New);
        assert_eq!(store.len(), 1);
        assert!(!out.prompt.contains("[RETRIEVED MEMORIES]"));
    }

    #[test]
    fn second_turn_sees_first_fact() {
        let mut pipeline = MemoryPipeline::with_seed(&MemlensConfig::default(), 5);
        let mut store = MemoryStore::new();
        pipeline.process("我叫小明", &mut store);
        let out = pipeline.process("你记得我吗", &mut store);
        assert_eq!(out.retrieved.len(), 1);
        assert_eq!(out.retrieved[0].fact, "我叫小明");
        assert!(out.reply.contains("已检索到相关记忆：我叫小明"));
        assert!(out.prompt.contains("- 我叫小明 (similarity="));
    }

    #[test]
    fn same_seed_same_outcome() {
        let config = MemlensConfig::default();
        let run = || {
            let mut pipeline = MemoryPipeline::with_seed(&config, 42);
            let mut store = MemoryStore::new();
            pipeline.process("我喜欢猫", &mut store);
            let mut out = pipeline.process("我喜欢猫吗", &mut store);
            // Wall-clock latency differs between runs; compare everything else.
            out.metrics.retrieval_time_ms = 0.0;
            out
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn non_finite_jitter_bounds_fall_back_to_lower_bound() {
        let mut config = MemlensConfig::default();
        config.retrieval.score_jitter = f64::INFINITY;
        config.metrics.latency_jitter_max_ms = f64::INFINITY;
        assert!(config.validate().is_err());

        let mut pipeline = MemoryPipeline::with_seed(&config, 4);
        let mut store: MemoryStore = std::iter::once(Fact::from("我喜欢猫")).collect();
        let out = pipeline.process("你好", &mut store);
        assert!((out.retrieved[0].score.value() - 0.45).abs() < 1e-12);
        assert!(out.metrics.retrieval_time_ms >= 20.0);
        assert!(out.metrics.retrieval_time_ms.is_finite());
    }

    #[test]
    fn prompt_tokens_follow_prompt_length() {
        let mut pipeline = MemoryPipeline::with_seed(&MemlensConfig::default(), 1);
        let mut store = MemoryStore::new();
        let out = pipeline.process("你好", &mut store);
        assert_eq!(
            out.metrics.prompt_tokens,
            metrics::prompt_tokens(&out.prompt, 1.5)
        );
    }
}
