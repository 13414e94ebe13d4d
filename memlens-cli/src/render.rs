//! Plain-text rendering of chat messages and the memory panel.

use std::fmt;

use memlens_core::classification::MemoryChange;
use memlens_core::panel::PanelState;
use memlens_core::types::{ChatMessage, Role, ScoreBand};

/// Name shown above assistant messages.
pub const AGENT_NAME: &str = "Memory Agent";

/// Placeholder for the retrieval section before anything is retrieved.
pub const EMPTY_RETRIEVAL: &str = "暂无检索结果，先和我聊几句让记忆库积累内容！";

/// Placeholder for sections that fill in after the first turn.
pub const AWAITING_FIRST_TURN: &str = "等待第一次对话触发…";

const BAR_WIDTH: usize = 20;

/// A transcript message, ready to print.
pub struct Message<'a>(pub &'a ChatMessage);

impl fmt::Display for Message<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = self.0;
        match msg.role {
            Role::User => {
                for line in msg.content.lines() {
                    writeln!(f, "{:>8} {line}", "你 ›")?;
                }
            }
            Role::Assistant => {
                writeln!(f, "★ {AGENT_NAME}")?;
                for line in msg.content.lines() {
                    writeln!(f, "  {line}")?;
                }
            }
        }
        Ok(())
    }
}

/// Horizontal bar for a score in `[0, 1]`.
#[must_use]
pub fn score_bar(score: f64) -> String {
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let filled = ((score.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize).min(BAR_WIDTH);
    format!("[{}{}]", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

fn band_label(band: ScoreBand) -> &'static str {
    match band {
        ScoreBand::High => "高",
        ScoreBand::Medium => "中",
        ScoreBand::Low => "低",
    }
}

fn change_label(change: &MemoryChange) -> &'static str {
    match change {
        MemoryChange::New { .. } => "[新增]",
        MemoryChange::Update { .. } => "[更新/编辑]",
        MemoryChange::Noop { .. } => "[无操作]",
    }
}

fn heading(f: &mut fmt::Formatter<'_>, title: &str, caption: Option<&str>) -> fmt::Result {
    writeln!(f, "── {title} ──")?;
    if let Some(caption) = caption {
        writeln!(f, "   {caption}")?;
    }
    Ok(())
}

/// The four panel sections, ready to print.
pub struct Panel<'a>(pub &'a PanelState);

impl Panel<'_> {
    fn retrieval(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        heading(
            f,
            "检索到的记忆 R",
            Some("用户提问时从记忆库中召回的相关片段及相似度分数"),
        )?;
        if self.0.retrieved.is_empty() {
            writeln!(f, "   {EMPTY_RETRIEVAL}")?;
        }
        for r in &self.0.retrieved {
            writeln!(f, "   » {}", r.fact)?;
            writeln!(
                f,
                "     {} Similarity Score = {} ({})",
                score_bar(r.score.value()),
                r.score,
                band_label(r.score.band())
            )?;
        }
        Ok(())
    }

    fn change_log(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        heading(
            f,
            "记忆库变动日志 P / W",
            Some("本轮对话对记忆库执行的写入或编辑操作"),
        )?;
        match &self.0.change {
            Some(change) => writeln!(f, "   {} {}", change_label(change), change.content()),
            None => writeln!(f, "   {AWAITING_FIRST_TURN}"),
        }
    }

    fn prompt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        heading(
            f,
            "合成后的 Prompt",
            Some("记忆注入后，真正发送给大模型的完整提示词"),
        )?;
        if self.0.final_prompt.is_empty() {
            return writeln!(f, "   {AWAITING_FIRST_TURN}");
        }
        for line in self.0.final_prompt.lines() {
            writeln!(f, "   │ {line}")?;
        }
        Ok(())
    }

    fn metrics(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        heading(f, "性能与评估指标", None)?;
        let Some(m) = &self.0.metrics else {
            return writeln!(f, "   {AWAITING_FIRST_TURN}");
        };
        writeln!(
            f,
            "   检索耗时 Δt   {:>8.1} ms    总 Token 消耗  {:>6}",
            m.retrieval_time_ms, m.total_tokens
        )?;
        writeln!(
            f,
            "   Prompt Tokens {:>8}       Reply Tokens   {:>6}",
            m.prompt_tokens, m.reply_tokens
        )
    }
}

impl fmt::Display for Panel<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.retrieval(f)?;
        writeln!(f)?;
        self.change_log(f)?;
        writeln!(f)?;
        self.prompt(f)?;
        writeln!(f)?;
        self.metrics(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use memlens_core::config::MemlensConfig;
    use memlens_core::memory::MemoryStore;
    use memlens_core::metrics::TurnMetrics;
    use memlens_core::pipeline::MemoryPipeline;

    #[test]
    fn empty_panel_shows_placeholders() {
        let text = Panel(&PanelState::default()).to_string();
        assert!(text.contains(EMPTY_RETRIEVAL));
        assert_eq!(text.matches(AWAITING_FIRST_TURN).count(), 3);
    }

    #[test]
    fn populated_panel_shows_every_section() {
        let mut pipeline = MemoryPipeline::with_seed(&MemlensConfig::default(), 21);
        let mut store = MemoryStore::from_json(r#"["我叫小明"]"#).expect("store");
        let outcome = pipeline.process("其实我叫小华", &mut store);
        let text = Panel(&PanelState::from_outcome(&outcome)).to_string();

        assert!(text.contains("» 我叫小明"));
        assert!(text.contains("Similarity Score = "));
        assert!(text.contains("[更新/编辑] 旧：我叫小明  →  新：其实我叫小华"));
        assert!(text.contains("│ [RETRIEVED MEMORIES]"));
        assert!(text.contains("Prompt Tokens"));
        assert!(!text.contains(AWAITING_FIRST_TURN));
    }

    #[test]
    fn latency_always_shows_one_decimal() {
        let state = PanelState {
            metrics: Some(TurnMetrics {
                retrieval_time_ms: 47.0,
                prompt_tokens: 90,
                reply_tokens: 60,
                total_tokens: 150,
            }),
            ..PanelState::default()
        };
        let text = Panel(&state).to_string();
        assert!(text.contains("    47.0 ms"), "{text}");
        assert!(text.contains("150"));
    }

    #[test]
    fn score_bar_scales() {
        assert_eq!(score_bar(0.0), format!("[{}]", "░".repeat(BAR_WIDTH)));
        assert_eq!(score_bar(1.0), format!("[{}]", "█".repeat(BAR_WIDTH)));
        assert_eq!(score_bar(0.5).matches('█').count(), BAR_WIDTH / 2);
    }

    #[test]
    fn assistant_message_is_indented_under_name() {
        let text = Message(&ChatMessage::assistant("第一行\n\n第二行")).to_string();
        assert_eq!(text, "★ Memory Agent\n  第一行\n  \n  第二行\n");
    }

    #[test]
    fn user_message_is_prefixed() {
        let text = Message(&ChatMessage::user("你好")).to_string();
        assert!(text.ends_with("你 › 你好\n"));
    }
}
