//! Configuration type definitions.
//!
//! Every section is optional in YAML. An empty document means
//! gemini-1.5-flash with a 30 second timeout and ten turns of history.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::errors::{ConfigError, StoreError};

pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const HISTORY_FILE_NAME: &str = "history.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScratchbotConfig {
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub generation: GenerationParameters,
    #[serde(default)]
    pub safety_settings: Vec<SafetySetting>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            base_url: default_base_url(),
            api_key: None,
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
            generation: GenerationParameters::default(),
            safety_settings: Vec::new(),
        }
    }
}

impl LlmConfig {
    /// The configured key, ignoring blank values.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationParameters {
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_top_k")]
    pub top_k: u32,
    #[serde(default = "default_top_p")]
    pub top_p: f32,
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
}

impl Default for GenerationParameters {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
            top_k: default_top_k(),
            top_p: default_top_p(),
            max_output_tokens: default_max_output_tokens(),
        }
    }
}

/// One `safetySettings` entry, e.g. `HARM_CATEGORY_HARASSMENT` /
/// `BLOCK_MEDIUM_AND_ABOVE`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetySetting {
    pub category: String,
    pub threshold: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    #[serde(default = "default_max_history_turns")]
    pub max_history_turns: usize,
    #[serde(default)]
    pub preamble_file: Option<PathBuf>,
    /// Contents of `preamble_file`, filled in by the loader.
    #[serde(skip)]
    pub preamble: Option<String>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            max_history_turns: default_max_history_turns(),
            preamble_file: None,
            preamble: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub history_file: Option<PathBuf>,
}

impl ScratchbotConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let llm = &self.llm;
        if llm.model.trim().is_empty() {
            return Err(ConfigError::Invalid("llm.model must not be empty".to_string()));
        }
        if llm.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("llm.base_url must not be empty".to_string()));
        }
        if llm.timeout_secs == 0 {
            return Err(ConfigError::Invalid("llm.timeout_secs must be greater than 0".to_string()));
        }

        let generation = &llm.generation;
        if !(0.0..=2.0).contains(&generation.temperature) {
            return Err(ConfigError::Invalid(format!(
                "llm.generation.temperature must be between 0 and 2, got {}",
                generation.temperature
            )));
        }
        if !(0.0..=1.0).contains(&generation.top_p) {
            return Err(ConfigError::Invalid(format!(
                "llm.generation.top_p must be between 0 and 1, got {}",
                generation.top_p
            )));
        }
        if generation.top_k == 0 {
            return Err(ConfigError::Invalid("llm.generation.top_k must be at least 1".to_string()));
        }
        if generation.max_output_tokens == 0 {
            return Err(ConfigError::Invalid(
                "llm.generation.max_output_tokens must be at least 1".to_string(),
            ));
        }

        for setting in &llm.safety_settings {
            if setting.category.trim().is_empty() || setting.threshold.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "llm.safety_settings entries need both category and threshold".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Where the history snapshot lives: `storage.history_file`, or
    /// `<data dir>/scratchbot/history.json`.
    pub fn history_path(&self) -> Result<PathBuf, StoreError> {
        if let Some(path) = &self.storage.history_file {
            return Ok(path.clone());
        }
        dirs::data_local_dir()
            .map(|dir| dir.join("scratchbot").join(HISTORY_FILE_NAME))
            .ok_or(StoreError::NoDataDir)
    }
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_api_key_env() -> String {
    DEFAULT_API_KEY_ENV.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_temperature() -> f32 {
    0.7
}

fn default_top_k() -> u32 {
    40
}

fn default_top_p() -> f32 {
    0.95
}

fn default_max_output_tokens() -> u32 {
    1024
}

fn default_max_history_turns() -> usize {
    crate::prompt::DEFAULT_MAX_HISTORY_TURNS
}
