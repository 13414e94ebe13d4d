//! Per-fact scoring for keyword-overlap retrieval.
//!
//! Score = min(cap, base + per_overlap · Overlap(f, q) + U(0, jitter))
//!
//! Where:
//!   Tokens(f)     = whitespace-split words of the fact, with the configured
//!                   separators (`，` and `。` by default) treated as spaces
//!   Chars(q)      = the set of individual characters in the input
//!   Overlap(f, q) = |Tokens(f) ∩ Chars(q)|
//!
//! Fact tokens are compared against input *characters*, so only
//! single-character tokens can ever overlap. Stored sentences without
//! internal separators therefore score at the floor plus jitter.

use std::collections::HashSet;

use crate::config::RetrievalConfig;
use crate::jitter;

/// Split a fact into its token set.
#[must_use]
pub fn fact_tokens(text: &str, separators: &[char]) -> HashSet<String> {
    let spaced: String = text
        .chars()
        .map(|c| if separators.contains(&c) { ' ' } else { c })
        .collect();
    spaced.split_whitespace().map(str::to_string).collect()
}

/// The input's character set.
#[must_use]
pub fn input_chars(input: &str) -> HashSet<char> {
    input.chars().collect()
}

/// Count fact tokens that equal a single character present in the input.
#[must_use]
pub fn overlap(tokens: &HashSet<String>, chars: &HashSet<char>) -> usize {
    tokens
        .iter()
        .filter(|token| {
            let mut it = token.chars();
            matches!((it.next(), it.next()), (Some(c), None) if chars.contains(&c))
        })
        .count()
}

/// Deterministic part of the score plus a caller-supplied jitter, capped
/// and rounded to two decimals.
#[must_use]
pub fn score(overlap: usize, jitter_value: f64, config: &RetrievalConfig) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let raw = config.base_score + config.per_overlap * overlap as f64 + jitter_value;
    jitter::round_to(raw.min(config.score_cap), 2)
}
