// src/infra/config.rs — Configuration loading (TOML)

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::infra::paths;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub model: ModelConfig,

    #[serde(default)]
    pub quality: QualityConfig,

    #[serde(default)]
    pub chat: ChatConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Gemini model id used for generation, evaluation and improvement.
    pub id: String,
    /// API key. Falls back to the GEMINI_API_KEY environment variable.
    pub api_key: Option<String>,
    /// Backup model tried when the primary fails with a transient error.
    pub fallback_id: Option<String>,
    /// Output cap applied to every generation request.
    pub max_output_tokens: u32,
    pub temperature: Option<f32>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            id: "gemini-1.5-flash".into(),
            api_key: None,
            fallback_id: None,
            max_output_tokens: 1000,
            temperature: None,
        }
    }
}

impl ModelConfig {
    /// Resolve the API key: config value first, then environment.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.is_empty())
            .or_else(|| std::env::var("GEMINI_API_KEY").ok().filter(|k| !k.is_empty()))
    }
}

/// Knobs for the content-quality refinement loop.
///
/// The loop re-scores content after every rewrite; nothing checks that a
/// rewrite scored higher than its predecessor, only that it cleared the
/// threshold. Callers that need monotonic improvement cannot get it here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityConfig {
    /// Minimum acceptable score (1-10). Content below this gets rewritten.
    pub score_threshold: u8,
    /// Maximum number of rewrite attempts per generation.
    pub max_attempts: u8,
    /// Score assumed when the evaluator fails or returns no number.
    pub fallback_score: u8,
    /// Rewrites shorter than this many characters are treated as truncated
    /// and discarded in favor of the previous content.
    pub min_improved_len: usize,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            score_threshold: 8,
            max_attempts: 2,
            fallback_score: 7,
            min_improved_len: 50,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Maximum number of history entries kept per chat session.
    pub history_limit: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self { history_limit: 20 }
    }
}

impl Config {
    /// Load config from file, falling back to defaults.
    pub fn load() -> anyhow::Result<Self> {
        let path = paths::config_file_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
