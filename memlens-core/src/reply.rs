//! Template replies (Step E).
//!
//! There is no model behind the agent; the reply acknowledges the input and,
//! when something was retrieved, names up to two of the best facts.

use crate::prompt::render_template;
use crate::retrieval::RetrievalResult;

/// Reply when at least one fact was retrieved.
pub const REPLY_WITH_MEMORY: &str =
    "（已检索到相关记忆：{memories}）\n\n我已收到：「{input}」，并结合历史记忆为你作答。";

/// Reply when nothing was retrieved.
pub const REPLY_WITHOUT_MEMORY: &str = "我已收到：「{input}」。暂无相关历史记忆，这是一次全新对话。";

/// How many retrieved facts the reply mentions.
pub const MENTIONED_FACTS: usize = 2;

/// Compose the assistant reply for a turn.
#[must_use]
pub fn compose(input: &str, retrieved: &[RetrievalResult]) -> String {
    if retrieved.is_empty() {
        return render_template(REPLY_WITHOUT_MEMORY, &[("input", input)]);
    }
    let memories = retrieved
        .iter()
        .take(MENTIONED_FACTS)
        .map(|r| r.fact.as_str())
        .collect::<Vec<_>>()
        .join("、");
    render_template(REPLY_WITH_MEMORY, &[("memories", &memories), ("input", input)])
}
