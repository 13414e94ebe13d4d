//! Turn metrics and session counters (Step D).
//!
//! Per-turn metrics are fabricated for display: token counts are a crude
//! character proxy, the reply length is sampled, and the retrieval latency
//! is the measured scoring time padded with random jitter. None of these
//! describe real model cost.
//!
//! Session counters are plain tallies of what the pipeline did, kept for
//! the front end's statistics view.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::MetricsConfig;
use crate::jitter;
use crate::types::ChangeKind;

// ---------------------------------------------------------------------------
// Per-turn metrics
// ---------------------------------------------------------------------------

/// Synthetic performance figures for one turn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TurnMetrics {
    /// Retrieval latency in milliseconds, one decimal.
    pub retrieval_time_ms: f64,
    /// Prompt size in pseudo-tokens.
    pub prompt_tokens: u64,
    /// Sampled reply size in pseudo-tokens.
    pub reply_tokens: u64,
    /// `prompt_tokens + reply_tokens`.
    pub total_tokens: u64,
}

/// Pseudo-token count of a prompt: `floor(chars * factor)`.
#[must_use]
pub fn prompt_tokens(prompt: &str, factor: f64) -> u64 {
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    let tokens = (prompt.chars().count() as f64 * factor).floor() as u64;
    tokens
}

/// Fabricate the metrics for a turn.
///
/// `retrieval_elapsed` is the wall-clock time actually spent scoring facts.
pub fn synthesize<R: Rng + ?Sized>(
    prompt: &str,
    retrieval_elapsed: Duration,
    config: &MetricsConfig,
    rng: &mut R,
) -> TurnMetrics {
    let prompt_tokens = prompt_tokens(prompt, config.chars_per_token_factor);
    let reply_tokens = u64::from(jitter::uniform_inclusive(
        rng,
        config.reply_tokens_min,
        config.reply_tokens_max,
    ));
    let padding = jitter::uniform(rng, config.latency_jitter_min_ms, config.latency_jitter_max_ms);
    let retrieval_time_ms =
        jitter::round_to(retrieval_elapsed.as_secs_f64() * 1000.0 + padding, 1);

    TurnMetrics {
        retrieval_time_ms,
        prompt_tokens,
        reply_tokens,
        total_tokens: prompt_tokens.saturating_add(reply_tokens),
    }
}

// ---------------------------------------------------------------------------
// Session Counters
// ---------------------------------------------------------------------------

/// Running tallies for one session.
#[derive(Debug, Default)]
pub struct SessionCounters {
    /// Turns processed.
    pub turns: AtomicU64,
    /// Turns that appended a fact.
    pub facts_added: AtomicU64,
    /// Turns that rewrote a fact.
    pub facts_updated: AtomicU64,
    /// Turns that wrote nothing.
    pub noop_turns: AtomicU64,
    /// Retrieval results returned, summed over turns.
    pub facts_retrieved: AtomicU64,
    /// Pseudo-tokens spent, summed over turns.
    pub total_tokens: AtomicU64,
}

impl SessionCounters {
    /// Create a new set of zeroed counters.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            turns: AtomicU64::new(0),
            facts_added: AtomicU64::new(0),
            facts_updated: AtomicU64::new(0),
            noop_turns: AtomicU64::new(0),
            facts_retrieved: AtomicU64::new(0),
            total_tokens: AtomicU64::new(0),
        }
    }

    /// Record one completed turn.
    pub fn record_turn(&self, change: ChangeKind, retrieved: usize, metrics: &TurnMetrics) {
        self.turns.fetch_add(1, Ordering::Relaxed);
        let slot = match change {
            ChangeKind::New => &self.facts_added,
            ChangeKind::Update => &self.facts_updated,
            ChangeKind::Noop => &self.noop_turns,
        };
        slot.fetch_add(1, Ordering::Relaxed);
        self.facts_retrieved
            .fetch_add(retrieved as u64, Ordering::Relaxed);
        self.total_tokens
            .fetch_add(metrics.total_tokens, Ordering::Relaxed);
    }

    /// Zero every counter.
    pub fn reset(&self) {
        for c in [
            &self.turns,
            &self.facts_added,
            &self.facts_updated,
            &self.noop_turns,
            &self.facts_retrieved,
            &self.total_tokens,
        ] {
            c.store(0, Ordering::Relaxed);
        }
    }

    /// Snapshot all counters for display.
    #[must_use]
    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            turns: self.turns.load(Ordering::Relaxed),
            facts_added: self.facts_added.load(Ordering::Relaxed),
            facts_updated: self.facts_updated.load(Ordering::Relaxed),
            noop_turns: self.noop_turns.load(Ordering::Relaxed),
            facts_retrieved: self.facts_retrieved.load(Ordering::Relaxed),
            total_tokens: self.total_tokens.load(Ordering::Relaxed),
        }
    }
}

/// A snapshot of counter values at a point in time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterSnapshot {
    /// Turns processed.
    pub turns: u64,
    /// NEW turns.
    pub facts_added: u64,
    /// UPDATE turns.
    pub facts_updated: u64,
    /// NOOP turns.
    pub noop_turns: u64,
    /// Retrieval results returned.
    pub facts_retrieved: u64,
    /// Pseudo-tokens spent.
    pub total_tokens: u64,
}

impl fmt::Display for CounterSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "turns={} new={} update={} noop={} retrieved={} tokens={}",
            self.turns,
            self.facts_added,
            self.facts_updated,
            self.noop_turns,
            self.facts_retrieved,
            self.total_tokens
        )
    }
}
