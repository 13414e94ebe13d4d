//! Terminal front end for memlens: a chat prompt with an optional memory
//! panel printed after each turn.

mod command;
mod render;
mod repl;

use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use memlens_core::config::MemlensConfig;
use memlens_core::memory::MemoryStore;
use memlens_core::session::ChatSession;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line options.
#[derive(Parser)]
#[command(name = "memlens", version, about = "Chat with a simulated memory agent")]
struct Cli {
    /// Path to a memlens.toml config file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Fixed RNG seed for reproducible scores and metrics
    #[arg(long)]
    seed: Option<u64>,
    /// JSON file with facts to start from (strings or {"fact": ...} objects)
    #[arg(long)]
    store: Option<PathBuf>,
    /// Start with the memory panel expanded
    #[arg(long)]
    panel: bool,
}

fn init_tracing(default_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn load_config(cli: &Cli) -> anyhow::Result<MemlensConfig> {
    let mut config = match &cli.config {
        Some(path) => MemlensConfig::from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => MemlensConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.general.seed = Some(seed);
    }
    if cli.panel {
        config.session.show_panel = true;
    }
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    init_tracing(&config.general.log_level);

    let mut session = ChatSession::new(&config);
    if let Some(path) = &cli.store {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading memory store {}", path.display()))?;
        let store = MemoryStore::from_json(&json)
            .with_context(|| format!("parsing memory store {}", path.display()))?;
        info!(facts = store.len(), path = %path.display(), "memory store seeded");
        session = session.with_store(store);
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    repl::run(&mut session, stdin.lock(), &mut stdout)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config() {
        let cli = Cli::parse_from(["memlens", "--seed", "5", "--panel"]);
        let config = load_config(&cli).expect("default config");
        assert_eq!(config.general.seed, Some(5));
        assert!(config.session.show_panel);
    }

    #[test]
    fn missing_config_file_names_the_path() {
        let cli = Cli::parse_from(["memlens", "--config", "/nonexistent/memlens.toml"]);
        let err = load_config(&cli).expect_err("missing file");
        assert!(format!("{err:#}").contains("/nonexistent/memlens.toml"));
    }
}
