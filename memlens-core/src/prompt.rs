//! Prompt synthesis: the text that would be sent to a model (Step C).
//!
//! The prompt is plain concatenation: an optional block listing the
//! retrieved facts with their scores, then the user message and a fixed
//! instruction footer. No escaping and no length limit.

use crate::retrieval::RetrievalResult;

/// Header of the retrieved-memories block.
pub const MEMORY_BLOCK: &str = "[RETRIEVED MEMORIES]\n{lines}\n\n";

/// One retrieved fact inside the memory block.
pub const MEMORY_LINE: &str = "- {fact} (similarity={score})";

/// The full turn prompt.
pub const TURN_PROMPT: &str = "{memory_block}[USER MESSAGE]\n{user_message}\n\n[SYSTEM INSTRUCTION]\n{instruction}";

/// Instruction appended to every prompt.
pub const SYSTEM_INSTRUCTION: &str = "请结合以上记忆，给出个性化且连贯的回复。";

/// Simple template interpolation for prompts.
///
/// Replaces `{key}` with the corresponding value in a single pass, so text
/// substituted for one key is never re-expanded. Unknown `{...}` sequences
/// are left as they are.
#[must_use]
pub fn render_template(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let value = after.find('}').and_then(|close| {
            let key = &after[..close];
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v, close))
        });
        match value {
            Some((v, close)) => {
                out.push_str(v);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Render the retrieved-memories block, or an empty string when nothing
/// was retrieved.
#[must_use]
pub fn memory_block(retrieved: &[RetrievalResult]) -> String {
    if retrieved.is_empty() {
        return String::new();
    }
    let lines = retrieved
        .iter()
        .map(|r| {
            let score = r.score.to_string();
            render_template(MEMORY_LINE, &[("fact", &r.fact), ("score", &score)])
        })
        .collect::<Vec<_>>()
        .join("\n");
    render_template(MEMORY_BLOCK, &[("lines", &lines)])
}

/// Build the final prompt for a turn.
#[must_use]
pub fn synthesize(user_input: &str, retrieved: &[RetrievalResult]) -> String {
    let block = memory_block(retrieved);
    render_template(
        TURN_PROMPT,
        &[
            ("memory_block", &block),
            ("user_message", user_input),
            ("instruction", SYSTEM_INSTRUCTION),
        ],
    )
}
