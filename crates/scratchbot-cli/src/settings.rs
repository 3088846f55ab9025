use std::io;
use std::path::Path;
use std::path::PathBuf;

use anyhow::Result;
use crossterm::tty::IsTty;
use scratchbot_core::prompt::DEFAULT_PREAMBLE;
use scratchbot_core::{ConfigLoader, PromptBuilder, ScratchbotConfig};
use scratchbot_term::Renderer;

/// Values from the command line that win over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub model: Option<String>,
    pub history_file: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
}

impl Overrides {
    pub fn apply(&self, config: &mut ScratchbotConfig) {
        if let Some(model) = &self.model {
            config.llm.model = model.clone();
        }
        if let Some(history_file) = &self.history_file {
            config.storage.history_file = Some(history_file.clone());
        }
        if let Some(timeout_secs) = self.timeout_secs {
            config.llm.timeout_secs = timeout_secs;
        }
    }
}

pub async fn load_config(path: Option<&Path>, overrides: &Overrides) -> Result<ScratchbotConfig> {
    let mut config = ConfigLoader::load(path).await?;
    overrides.apply(&mut config);
    config.validate()?;

    log::info!(
        "Configuration loaded: model {}, timeout {}s, key {}",
        config.llm.model,
        config.llm.timeout_secs,
        if config.llm.api_key().is_some() { "present" } else { "missing" }
    );
    Ok(config)
}

pub fn prompt_builder(config: &ScratchbotConfig) -> PromptBuilder {
    let preamble = config
        .chat
        .preamble
        .clone()
        .unwrap_or_else(|| DEFAULT_PREAMBLE.to_string());
    PromptBuilder::new(preamble, config.chat.max_history_turns)
}

/// Colors only when stdout is a terminal and `NO_COLOR` is unset.
pub fn renderer(no_color: bool) -> Renderer {
    let color = !no_color && std::env::var_os("NO_COLOR").is_none() && io::stdout().is_tty();
    Renderer::new(color)
}
