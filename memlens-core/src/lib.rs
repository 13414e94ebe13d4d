//! # memlens Core Library
//!
//! A simulated memory pipeline for a chat agent. Each user turn runs four
//! visible stages over a per-session [`MemoryStore`]:
//!
//! - **Retrieval**: keyword-overlap scoring of stored facts against the input
//! - **Write classification**: append (NEW), rewrite the last fact (UPDATE), or skip (NOOP)
//! - **Prompt synthesis**: the text a real model would receive
//! - **Metrics**: fabricated latency and token counts for display
//!
//! None of this is real retrieval or generation. Scores and metrics carry
//! random noise drawn from an injected, seedable generator so sessions can
//! be replayed exactly in tests.
//!
//! ```
//! use memlens_core::{MemlensConfig, MemoryPipeline, MemoryStore, ChangeKind};
//!
//! let config = MemlensConfig::default();
//! let mut pipeline = MemoryPipeline::with_seed(&config, 7);
//! let mut store = MemoryStore::new();
//!
//! let turn = pipeline.process("我叫小明", &mut store);
//! assert_eq!(turn.change.kind(), ChangeKind::New);
//! assert_eq!(store.len(), 1);
//! ```

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod classification;
pub mod config;
pub mod error;
pub mod jitter;
pub mod memory;
pub mod metrics;
pub mod panel;
pub mod pipeline;
pub mod prompt;
pub mod reply;
pub mod retrieval;
pub mod session;
pub mod types;

pub use classification::{Classifier, MemoryChange};
pub use config::MemlensConfig;
pub use error::MemlensError;
pub use memory::{Fact, MemoryStore, StoredEntry};
pub use metrics::TurnMetrics;
pub use panel::PanelState;
pub use pipeline::{MemoryPipeline, TurnOutcome};
pub use retrieval::{RetrievalEngine, RetrievalResult};
pub use session::ChatSession;
pub use types::*;
