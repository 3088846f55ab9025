//! Language model abstraction.
//!
//! The front end only ever sends one prompt string and gets one reply back,
//! so the trait is small. [`providers::gemini::GeminiClient`] is
//! the production implementation; tests substitute their own.

use async_trait::async_trait;

use crate::errors::ChatError;

pub mod providers;

pub use providers::gemini::{GeminiClient, FALLBACK_REPLY};

#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Sends `prompt` and returns the reply text.
    async fn generate(&self, prompt: &str) -> Result<String, ChatError>;

    /// Whether a send can succeed at all. A client without credentials
    /// reports `false` so the UI can refuse input up front.
    fn is_configured(&self) -> bool {
        true
    }
}
