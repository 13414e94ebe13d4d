//! Chat session: the state a front end threads through every turn.
//!
//! A [`ChatSession`] owns the transcript, the memory store, the pipeline
//! and the latest [`PanelState`]. Nothing is shared between sessions and
//! nothing outlives one: [`ChatSession::reset`] starts a new chat with an
//! empty store.

use rand::Rng;
use rand::rngs::StdRng;
use tracing::info;

use crate::config::MemlensConfig;
use crate::memory::MemoryStore;
use crate::metrics::{CounterSnapshot, SessionCounters};
use crate::panel::PanelState;
use crate::pipeline::{MemoryPipeline, TurnOutcome};
use crate::types::ChatMessage;

/// One user's conversation with the simulated agent.
#[derive(Debug)]
pub struct ChatSession<R = StdRng> {
    greeting: String,
    messages: Vec<ChatMessage>,
    store: MemoryStore,
    pipeline: MemoryPipeline<R>,
    panel: PanelState,
    show_panel: bool,
    counters: SessionCounters,
}

impl ChatSession<StdRng> {
    /// Session using the configured seed (or entropy) and an empty store.
    #[must_use]
    pub fn new(config: &MemlensConfig) -> Self {
        Self::with_pipeline(config, MemoryPipeline::from_config(config))
    }
}

impl<R: Rng> ChatSession<R> {
    /// Session driven by an explicit pipeline.
    #[must_use]
    pub fn with_pipeline(config: &MemlensConfig, pipeline: MemoryPipeline<R>) -> Self {
        let greeting = config.session.greeting.clone();
        Self {
            messages: vec![ChatMessage::assistant(greeting.clone())],
            greeting,
            store: MemoryStore::new(),
            pipeline,
            panel: PanelState::default(),
            show_panel: config.session.show_panel,
            counters: SessionCounters::new(),
        }
    }

    /// Start from an existing store, e.g. one imported from legacy JSON.
    #[must_use]
    pub fn with_store(mut self, store: MemoryStore) -> Self {
        self.store = store;
        self
    }

    /// Run one user turn and return the assistant reply.
    pub fn submit(&mut self, input: &str) -> &str {
        self.submit_turn(input);
        self.messages
            .last()
            .map_or("", |m| m.content.as_str())
    }

    /// Run one user turn and return the full pipeline outcome.
    pub fn submit_turn(&mut self, input: &str) -> TurnOutcome {
        self.messages.push(ChatMessage::user(input));
        let outcome = self.pipeline.process(input, &mut self.store);
        self.counters
            .record_turn(outcome.change.kind(), outcome.retrieved.len(), &outcome.metrics);
        self.panel = PanelState::from_outcome(&outcome);
        self.messages.push(ChatMessage::assistant(outcome.reply.clone()));
        outcome
    }

    /// "New chat": transcript back to the greeting, empty store and panel.
    pub fn reset(&mut self) {
        info!(
            facts = self.store.len(),
            messages = self.messages.len(),
            "session reset"
        );
        self.messages.clear();
        self.messages.push(ChatMessage::assistant(self.greeting.clone()));
        self.store.clear();
        self.panel = PanelState::default();
        self.counters.reset();
    }

    /// Flip panel visibility. Returns the new state.
    pub fn toggle_panel(&mut self) -> bool {
        self.show_panel = !self.show_panel;
        self.show_panel
    }

    /// Whether the panel is currently shown.
    #[must_use]
    pub fn panel_visible(&self) -> bool {
        self.show_panel
    }

    /// Transcript in order, starting with the greeting.
    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// The session's memory store.
    #[must_use]
    pub fn store(&self) -> &MemoryStore {
        &self.store
    }

    /// Panel for the last completed turn.
    #[must_use]
    pub fn panel(&self) -> &PanelState {
        &self.panel
    }

    /// Session statistics.
    #[must_use]
    pub fn stats(&self) -> CounterSnapshot {
        self.counters.snapshot()
    }
}
