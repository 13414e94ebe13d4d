//! The read-eval-print loop that hosts one chat session.

use std::io::{BufRead, Write};

use anyhow::Context;
use memlens_core::session::ChatSession;
use rand::Rng;
use tracing::debug;

use crate::command::{Command, HELP};
use crate::render;

const PROMPT: &str = "Ask anything › ";

/// Drive `session` from `input` until EOF or `/quit`, writing to `out`.
///
/// # Errors
/// Returns an error if reading input or writing output fails.
pub fn run<R, I, O>(session: &mut ChatSession<R>, mut input: I, out: &mut O) -> anyhow::Result<()>
where
    R: Rng,
    I: BufRead,
    O: Write,
{
    if let Some(greeting) = session.messages().first() {
        write!(out, "{}", render::Message(greeting))?;
    }
    if session.panel_visible() {
        writeln!(out, "\n{}", render::Panel(session.panel()))?;
    }

    let mut line = String::new();
    loop {
        write!(out, "{PROMPT}")?;
        out.flush()?;

        line.clear();
        if input.read_line(&mut line).context("reading input")? == 0 {
            writeln!(out)?;
            break;
        }

        let command = Command::parse(&line);
        debug!(?command, "input parsed");
        match command {
            Command::Chat(text) => {
                if text.trim().is_empty() {
                    continue;
                }
                session.submit(&text);
                if let Some(reply) = session.messages().last() {
                    write!(out, "{}", render::Message(reply))?;
                }
                if session.panel_visible() {
                    writeln!(out, "\n{}", render::Panel(session.panel()))?;
                }
            }
            Command::TogglePanel => {
                if session.toggle_panel() {
                    writeln!(out, "[展开] memory panel\n")?;
                    writeln!(out, "{}", render::Panel(session.panel()))?;
                } else {
                    writeln!(out, "[收起] memory panel")?;
                }
            }
            Command::NewChat => {
                session.reset();
                if let Some(greeting) = session.messages().first() {
                    write!(out, "{}", render::Message(greeting))?;
                }
            }
            Command::DumpStore => {
                let json = session.store().to_json()?;
                writeln!(out, "{json}")?;
            }
            Command::Stats => writeln!(out, "{}", session.stats())?,
            Command::Help => writeln!(out, "{HELP}")?,
            Command::Quit => break,
            Command::Unknown(word) => writeln!(out, "unknown command /{word} (try /help)")?,
        }
    }
    Ok(())
}
