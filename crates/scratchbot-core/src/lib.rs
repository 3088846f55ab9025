//! Core library for the Scratch programming helper.
//!
//! This crate holds everything that is independent of the terminal front end:
//!
//! - **Classifier**: ordered heuristic rules that guess the Scratch block
//!   category of a line of assistant output, plus the category style table
//! - **Markdown**: splitting replies into prose and fenced code segments
//! - **Prompting**: the Scratch-only preamble and the bounded history window
//! - **Language model**: the Gemini `generateContent` client with a hard timeout
//! - **History**: sessions, turns and full-snapshot JSON persistence
//! - **Configuration**: YAML configuration with environment resolution

pub mod classifier;
pub mod config;
pub mod core_types;
pub mod errors;
pub mod history;
pub mod llm;
pub mod markdown;
pub mod prompt;

pub use classifier::{classify, classify_styled, looks_like_block, style_for, Category, StyleRecord};
pub use config::{ConfigLoader, ScratchbotConfig};
pub use core_types::{Role, Turn};
pub use errors::{ChatError, ConfigError, StoreError};
pub use history::{Session, SessionStore};
pub use llm::{GeminiClient, LanguageModel};
pub use prompt::PromptBuilder;

#[cfg(test)]
pub mod test_utils;
