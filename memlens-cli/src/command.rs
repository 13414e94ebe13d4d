//! Slash commands accepted at the chat prompt.

/// A parsed line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Ordinary chat text to run through the pipeline.
    Chat(String),
    /// Show or hide the memory panel.
    TogglePanel,
    /// Start a new chat.
    NewChat,
    /// Print the memory store as JSON.
    DumpStore,
    /// Print session statistics.
    Stats,
    /// List commands.
    Help,
    /// Leave.
    Quit,
    /// A `/word` that is not a known command.
    Unknown(String),
}

/// Help text listing every command.
pub const HELP: &str = "\
/panel   show or hide the memory panel
/new     start a new chat (clears memory)
/store   print the memory store as JSON
/stats   print session statistics
/help    show this list
/quit    exit";

impl Command {
    /// Parse one line. Leading and trailing whitespace is ignored for
    /// commands; chat text is passed through with only the line ending
    /// removed.
    #[must_use]
    pub fn parse(line: &str) -> Self {
        let line = line.trim_end_matches(['\r', '\n']);
        let trimmed = line.trim();
        let Some(word) = trimmed.strip_prefix('/') else {
            return Self::Chat(line.to_string());
        };
        match word {
            "panel" | "p" => Self::TogglePanel,
            "new" => Self::NewChat,
            "store" => Self::DumpStore,
            "stats" => Self::Stats,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            other => Self::Unknown(other.to_string()),
        }
    }
}
