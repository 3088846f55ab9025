//! Configuration loader for YAML files and environment resolution.

use std::env;
use std::path::{Path, PathBuf};

use tokio::fs;

use crate::config::types::ScratchbotConfig;
use crate::errors::ConfigError;

pub const CONFIG_FILE_NAME: &str = "config.yaml";

pub struct ConfigLoader;

impl ConfigLoader {
    /// `<config dir>/scratchbot/config.yaml`, if the platform has one.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("scratchbot").join(CONFIG_FILE_NAME))
    }

    /// Loads `path` when given, otherwise the default location if it exists,
    /// otherwise built-in defaults. Environment resolution runs in every case.
    pub async fn load(path: Option<&Path>) -> Result<ScratchbotConfig, ConfigError> {
        if let Some(path) = path {
            return Self::from_file(path).await;
        }

        match Self::default_path() {
            Some(default_path) if default_path.exists() => Self::from_file(&default_path).await,
            _ => {
                log::debug!("No config file found, using defaults");
                Self::from_str("", None).await
            }
        }
    }

    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<ScratchbotConfig, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).await.map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        log::info!("Loading configuration from file: {}", path.display());
        Self::from_str(&content, path.parent()).await
    }

    pub async fn from_str(
        content: &str,
        base_dir: Option<&Path>,
    ) -> Result<ScratchbotConfig, ConfigError> {
        let mut config: ScratchbotConfig = if content.trim().is_empty() {
            ScratchbotConfig::default()
        } else {
            serde_yaml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?
        };

        Self::resolve_environment(&mut config);
        Self::resolve_preamble(&mut config, base_dir).await?;
        config.validate()?;

        Ok(config)
    }

    /// Fills `llm.api_key` from `llm.api_key_env` when no key is configured.
    pub fn resolve_environment(config: &mut ScratchbotConfig) {
        if config.llm.api_key().is_some() {
            return;
        }

        match env::var(&config.llm.api_key_env) {
            Ok(key) if !key.trim().is_empty() => {
                log::debug!("Using API key from ${}", config.llm.api_key_env);
                config.llm.api_key = Some(key.trim().to_string());
            }
            _ => {
                log::warn!(
                    "No Gemini API key configured and ${} is not set",
                    config.llm.api_key_env
                );
                config.llm.api_key = None;
            }
        }
    }

    async fn resolve_preamble(
        config: &mut ScratchbotConfig,
        base_dir: Option<&Path>,
    ) -> Result<(), ConfigError> {
        let Some(preamble_file) = config.chat.preamble_file.clone() else {
            return Ok(());
        };

        let path = match base_dir {
            Some(dir) if preamble_file.is_relative() => dir.join(&preamble_file),
            _ => preamble_file,
        };

        let preamble = fs::read_to_string(&path)
            .await
            .map_err(|e| ConfigError::Preamble {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        config.chat.preamble = Some(preamble);

        Ok(())
    }
}
