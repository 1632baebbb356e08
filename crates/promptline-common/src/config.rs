use anyhow::Result;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Returns the promptline base directory: `~/.promptline`, fallback `/tmp/promptline`.
pub fn promptline_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".promptline"))
        .unwrap_or_else(|| PathBuf::from("/tmp/promptline"))
}

fn default_prompts_path() -> String {
    promptline_dir()
        .join("prompts.json")
        .to_string_lossy()
        .to_string()
}

fn default_presets_path() -> String {
    promptline_dir()
        .join("presets.json")
        .to_string_lossy()
        .to_string()
}

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct PromptlineConfig {
    #[serde(default)]
    pub engine: EngineOptions,
    #[serde(default)]
    pub corpus: CorpusConfig,
}

/// Load the config from `PROMPTLINE_CONFIG`, falling back to `~/.promptline/config.toml`.
/// A missing file is not an error.
pub fn load_config() -> Result<PromptlineConfig> {
    let path = std::env::var("PROMPTLINE_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| promptline_dir().join("config.toml"));
    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<PromptlineConfig> {
    if path.exists() {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    } else {
        Ok(PromptlineConfig::default())
    }
}

// ---------------------------------------------------------------------------
// Engine options
// ---------------------------------------------------------------------------

/// Suggestion engine options. Fixed for the lifetime of an engine.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EngineOptions {
    #[serde(default = "default_max_matches")]
    pub max_matches: usize,
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "default_min_search_length")]
    pub min_search_length: usize,
    /// Widest word window tried, counting down to 1.
    #[serde(default = "default_max_word_count")]
    pub max_word_count: usize,
    /// Also match variable presets (names and `preset.item` lookups).
    #[serde(default = "default_match_presets")]
    pub match_presets: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            max_matches: default_max_matches(),
            debounce_ms: default_debounce_ms(),
            min_search_length: default_min_search_length(),
            max_word_count: default_max_word_count(),
            match_presets: default_match_presets(),
        }
    }
}

impl EngineOptions {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Clamp values that would leave the engine unable to ever show anything.
    pub fn sanitized(mut self) -> Self {
        if self.max_matches == 0 {
            tracing::warn!("max_matches = 0 would hide every suggestion, using 1");
            self.max_matches = 1;
        }
        if self.max_word_count == 0 {
            tracing::warn!("max_word_count = 0 disables matching, using 1");
            self.max_word_count = 1;
        }
        self
    }
}

fn default_max_matches() -> usize {
    5
}

fn default_debounce_ms() -> u64 {
    100
}

fn default_min_search_length() -> usize {
    3
}

fn default_max_word_count() -> usize {
    3
}

fn default_match_presets() -> bool {
    true
}

// ---------------------------------------------------------------------------
// Corpus locations
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct CorpusConfig {
    #[serde(default = "default_prompts_path")]
    pub prompts_path: String,
    #[serde(default = "default_presets_path")]
    pub presets_path: String,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            prompts_path: default_prompts_path(),
            presets_path: default_presets_path(),
        }
    }
}
