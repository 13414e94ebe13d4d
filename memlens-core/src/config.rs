//! Configuration for the memlens memory pipeline.
//!
//! Maps directly to `memlens.toml`. Every field has a default equal to the
//! behaviour of the reference demo, so an empty file (or no file at all)
//! yields the stock pipeline.

use serde::{Deserialize, Serialize};

use crate::error::{MemlensError, Result};

/// Largest accepted `metrics.chars_per_token_factor`.
pub const MAX_CHARS_PER_TOKEN_FACTOR: f64 = 100.0;

/// Top-level memlens configuration, loadable from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemlensConfig {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Retrieval scoring (Step A).
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    /// Write/update classification (Step B).
    #[serde(default)]
    pub classification: ClassificationConfig,
    /// Synthetic metrics (Step D).
    #[serde(default)]
    pub metrics: MetricsConfig,
    /// Chat session presentation defaults.
    #[serde(default)]
    pub session: SessionConfig,
}

impl MemlensConfig {
    /// Load configuration from a TOML string.
    ///
    /// # Errors
    /// Returns `MemlensError::Config` if the TOML is invalid or a value is
    /// out of range.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(toml_str).map_err(|e| MemlensError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Check that numeric ranges are usable.
    ///
    /// # Errors
    /// Returns `MemlensError::Config` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        let r = &self.retrieval;
        let m = &self.metrics;
        for (name, value) in [
            ("retrieval.base_score", r.base_score),
            ("retrieval.per_overlap", r.per_overlap),
            ("retrieval.score_jitter", r.score_jitter),
            ("retrieval.score_cap", r.score_cap),
            ("metrics.chars_per_token_factor", m.chars_per_token_factor),
            ("metrics.latency_jitter_min_ms", m.latency_jitter_min_ms),
            ("metrics.latency_jitter_max_ms", m.latency_jitter_max_ms),
        ] {
            if !value.is_finite() {
                return Err(MemlensError::Config(format!(
                    "{name} must be a finite number (got {value})"
                )));
            }
        }

        if r.score_jitter < 0.0 {
            return Err(MemlensError::Config(format!(
                "retrieval.score_jitter must be >= 0 (got {})",
                r.score_jitter
            )));
        }
        if r.score_cap < r.base_score {
            return Err(MemlensError::Config(format!(
                "retrieval.score_cap ({}) is below retrieval.base_score ({})",
                r.score_cap, r.base_score
            )));
        }

        if m.reply_tokens_min > m.reply_tokens_max {
            return Err(MemlensError::Config(format!(
                "metrics.reply_tokens_min ({}) exceeds metrics.reply_tokens_max ({})",
                m.reply_tokens_min, m.reply_tokens_max
            )));
        }
        if m.latency_jitter_min_ms < 0.0 || m.latency_jitter_min_ms > m.latency_jitter_max_ms {
            return Err(MemlensError::Config(format!(
                "metrics latency jitter range [{}, {}] is invalid",
                m.latency_jitter_min_ms, m.latency_jitter_max_ms
            )));
        }
        if !(0.0..=MAX_CHARS_PER_TOKEN_FACTOR).contains(&m.chars_per_token_factor) {
            return Err(MemlensError::Config(format!(
                "metrics.chars_per_token_factor must be in [0, {MAX_CHARS_PER_TOKEN_FACTOR}] (got {})",
                m.chars_per_token_factor
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// General system settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level used when `RUST_LOG` is not set: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Fixed RNG seed. `None` draws a fresh seed per session.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            seed: None,
        }
    }
}

/// Keyword-overlap retrieval scoring.
///
/// `score = min(score_cap, base_score + per_overlap * overlap + U(0, score_jitter))`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Number of facts kept per turn.
    #[serde(default = "default_3_usize")]
    pub top_k: usize,
    /// Score floor before overlap and jitter.
    #[serde(default = "default_0_45")]
    pub base_score: f64,
    /// Score added per overlapping token.
    #[serde(default = "default_0_15")]
    pub per_overlap: f64,
    /// Upper bound (exclusive) of the uniform jitter term.
    #[serde(default = "default_0_1")]
    pub score_jitter: f64,
    /// Hard ceiling on any score.
    #[serde(default = "default_0_99")]
    pub score_cap: f64,
    /// Characters treated as token separators in stored facts, in addition
    /// to whitespace.
    #[serde(default = "default_separators")]
    pub separators: Vec<char>,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: 3,
            base_score: 0.45,
            per_overlap: 0.15,
            score_jitter: 0.1,
            score_cap: 0.99,
            separators: default_separators(),
        }
    }
}

/// Trigger words deciding whether a turn writes to the memory store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationConfig {
    /// Substrings that mark a statement worth remembering.
    #[serde(default = "default_new_triggers")]
    pub new_triggers: Vec<String>,
    /// Substrings that mark a correction of the most recent fact.
    #[serde(default = "default_edit_triggers")]
    pub edit_triggers: Vec<String>,
    /// Punctuation stripped from both ends of the input before it is stored.
    #[serde(default = "default_strip_chars")]
    pub strip_chars: Vec<char>,
    /// Change-log note for turns that write nothing.
    #[serde(default = "default_noop_note")]
    pub noop_note: String,
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            new_triggers: default_new_triggers(),
            edit_triggers: default_edit_triggers(),
            strip_chars: default_strip_chars(),
            noop_note: default_noop_note(),
        }
    }
}

/// Synthetic per-turn metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Prompt tokens are `floor(prompt_chars * factor)`.
    #[serde(default = "default_1_5")]
    pub chars_per_token_factor: f64,
    /// Smallest fabricated reply length in tokens.
    #[serde(default = "default_40")]
    pub reply_tokens_min: u32,
    /// Largest fabricated reply length in tokens (inclusive).
    #[serde(default = "default_120")]
    pub reply_tokens_max: u32,
    /// Lower bound of latency padding added to the measured retrieval time.
    #[serde(default = "default_20_0")]
    pub latency_jitter_min_ms: f64,
    /// Upper bound of latency padding.
    #[serde(default = "default_80_0")]
    pub latency_jitter_max_ms: f64,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            chars_per_token_factor: 1.5,
            reply_tokens_min: 40,
            reply_tokens_max: 120,
            latency_jitter_min_ms: 20.0,
            latency_jitter_max_ms: 80.0,
        }
    }
}

/// Chat session defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Assistant message shown when a session starts or is reset.
    #[serde(default = "default_greeting")]
    pub greeting: String,
    /// Whether the memory panel starts expanded.
    #[serde(default)]
    pub show_panel: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            greeting: default_greeting(),
            show_panel: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Serde default helpers
// ---------------------------------------------------------------------------

fn default_log_level() -> String { "info".to_string() }
fn default_noop_note() -> String { "本轮对话为闲聊，无需写入记忆库。".to_string() }
fn default_greeting() -> String { "你好！我是具备记忆机制的智能体。请问今天探讨点什么？".to_string() }
fn default_separators() -> Vec<char> { vec!['，', '。'] }
fn default_strip_chars() -> Vec<char> { vec!['。', '！', '？'] }
fn default_new_triggers() -> Vec<String> {
    ["名字", "叫", "喜欢", "养了", "住在", "工作", "下班", "爱好", "擅长", "学习"]
        .iter()
        .map(ToString::to_string)
        .collect()
}
fn default_edit_triggers() -> Vec<String> {
    ["改成", "其实", "不对", "更新", "变成", "现在是", "已经"]
        .iter()
        .map(ToString::to_string)
        .collect()
}
fn default_0_1() -> f64 { 0.1 }
fn default_0_15() -> f64 { 0.15 }
fn default_0_45() -> f64 { 0.45 }
fn default_0_99() -> f64 { 0.99 }
fn default_1_5() -> f64 { 1.5 }
fn default_20_0() -> f64 { 20.0 }
fn default_80_0() -> f64 { 80.0 }
fn default_3_usize() -> usize { 3 }
fn default_40() -> u32 { 40 }
fn default_120() -> u32 { 120 }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let config = MemlensConfig::from_toml("").expect("empty config parses");
        assert_eq!(config.retrieval.top_k, 3);
        assert!((config.retrieval.base_score - 0.45).abs() < f64::EPSILON);
        assert_eq!(config.metrics.reply_tokens_min, 40);
        assert_eq!(config.metrics.reply_tokens_max, 120);
        assert!(config.classification.edit_triggers.contains(&"其实".to_string()));
        assert!(config.classification.new_triggers.contains(&"叫".to_string()));
        assert_eq!(config.general.seed, None);
        assert!(!config.session.show_panel);
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let config = MemlensConfig::from_toml(
            r#"
            [retrieval]
            top_k = 5

            [general]
            seed = 7
            "#,
        )
        .expect("partial config parses");
        assert_eq!(config.retrieval.top_k, 5);
        assert!((config.retrieval.score_cap - 0.99).abs() < f64::EPSILON);
        assert_eq!(config.general.seed, Some(7));
        assert_eq!(config.retrieval.separators, vec!['，', '。']);
    }

    #[test]
    fn inverted_reply_range_is_rejected() {
        let err = MemlensConfig::from_toml(
            r"
            [metrics]
            reply_tokens_min = 200
            reply_tokens_max = 100
            ",
        )
        .expect_err("inverted range must fail");
        assert!(matches!(err, MemlensError::Config(_)));
        assert!(err.to_string().contains("reply_tokens_min"));
    }

    #[test]
    fn malformed_toml_is_config_error() {
        let err = MemlensConfig::from_toml("[retrieval\ntop_k = ").expect_err("bad toml");
        assert!(matches!(err, MemlensError::Config(_)));
    }

    #[test]
    fn negative_jitter_is_rejected() {
        let mut config = MemlensConfig::default();
        config.retrieval.score_jitter = -0.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn infinite_jitter_is_rejected() {
        let err = MemlensConfig::from_toml("[retrieval]\nscore_jitter = inf\n")
            .expect_err("inf jitter must fail");
        assert!(matches!(err, MemlensError::Config(_)));
        assert!(err.to_string().contains("retrieval.score_jitter"));

        let err = MemlensConfig::from_toml("[metrics]\nlatency_jitter_max_ms = inf\n")
            .expect_err("inf latency must fail");
        assert!(err.to_string().contains("metrics.latency_jitter_max_ms"));
    }

    #[test]
    fn nan_values_are_rejected() {
        for toml in [
            "[retrieval]\nbase_score = nan\n",
            "[retrieval]\nper_overlap = nan\n",
            "[metrics]\nlatency_jitter_min_ms = nan\n",
            "[metrics]\nchars_per_token_factor = nan\n",
        ] {
            let err = MemlensConfig::from_toml(toml).expect_err("nan must fail");
            assert!(err.to_string().contains("finite"), "{toml}: {err}");
        }
    }

    #[test]
    fn oversized_token_factor_is_rejected() {
        let err = MemlensConfig::from_toml("[metrics]\nchars_per_token_factor = 1e300\n")
            .expect_err("huge factor must fail");
        assert!(err.to_string().contains("chars_per_token_factor"));
        assert!(
            MemlensConfig::from_toml("[metrics]\nchars_per_token_factor = 100.0\n").is_ok()
        );
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("memlens.toml");
        std::fs::write(&path, "[session]\nshow_panel = true\n").expect("write config");
        let config = MemlensConfig::from_file(&path).expect("file config parses");
        assert!(config.session.show_panel);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = MemlensConfig::from_file(std::path::Path::new("/nonexistent/memlens.toml"))
            .expect_err("missing file");
        assert!(matches!(err, MemlensError::Io(_)));
    }
}
