//! Google Gemini `generateContent` client
//!
//! One prompt goes out as a single text part and the first candidate's first
//! text part comes back. Every call races a timer: when the timer fires it
//! cancels a token, the in-flight request is dropped and the caller gets
//! [`ChatError::Timeout`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::config::{GenerationParameters, LlmConfig, SafetySetting, DEFAULT_BASE_URL};
use crate::errors::{ChatError, GENERIC_FAILURE};
use crate::llm::LanguageModel;

/// Reply used when a successful response carries no text.
pub const FALLBACK_REPLY: &str =
    "Sorry, I couldn't generate a response. Please try asking your question differently.";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Google Gemini API client
pub struct GeminiClient {
    api_key: Option<String>,
    model: String,
    base_url: String,
    timeout: Duration,
    generation: GenerationParameters,
    safety_settings: Vec<SafetySetting>,
    client: Client,
}

impl GeminiClient {
    /// Create a client with default generation settings
    pub fn new(api_key: Option<String>, model: String) -> Self {
        Self {
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            model,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            generation: GenerationParameters::default(),
            safety_settings: Vec::new(),
            client: Client::new(),
        }
    }

    pub fn from_config(config: &LlmConfig) -> Self {
        Self {
            api_key: config.api_key().map(str::to_string),
            model: config.model.clone(),
            base_url: config.base_url.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
            generation: config.generation.clone(),
            safety_settings: config.safety_settings.clone(),
            client: Client::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    generation_config: GeminiGenerationConfig,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    safety_settings: Vec<SafetySetting>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    temperature: f32,
    top_k: u32,
    top_p: f32,
    max_output_tokens: u32,
}

impl From<&GenerationParameters> for GeminiGenerationConfig {
    fn from(params: &GenerationParameters) -> Self {
        Self {
            temperature: params.temperature,
            top_k: params.top_k,
            top_p: params.top_p,
            max_output_tokens: params.max_output_tokens,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    #[serde(default)]
    error: Option<GeminiErrorDetails>,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorDetails {
    #[serde(default)]
    message: Option<String>,
}

impl GeminiClient {
    fn build_request(&self, prompt: &str) -> GeminiRequest {
        GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: Some(prompt.to_string()),
                }],
            }],
            generation_config: GeminiGenerationConfig::from(&self.generation),
            safety_settings: self.safety_settings.clone(),
        }
    }

    fn extract_reply(response: GeminiResponse) -> String {
        response
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .and_then(|content| content.parts.into_iter().next())
            .and_then(|part| part.text)
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| FALLBACK_REPLY.to_string())
    }

    fn remote_error(status: u16, body: &str) -> ChatError {
        let message = serde_json::from_str::<GeminiError>(body)
            .ok()
            .and_then(|e| e.error)
            .and_then(|details| details.message)
            .filter(|message| !message.trim().is_empty())
            .unwrap_or_else(|| GENERIC_FAILURE.to_string());

        ChatError::Remote { status, message }
    }

    async fn send(&self, api_key: &str, request: &GeminiRequest) -> Result<String, ChatError> {
        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", api_key)])
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                // reqwest includes the URL, and with it the key, in its Display
                let e = e.without_url();
                log::error!("Gemini request failed: {}", e);
                ChatError::Transport(e.to_string())
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            let e = e.without_url();
            log::error!("Failed to read Gemini response body: {}", e);
            ChatError::Transport(e.to_string())
        })?;

        if !status.is_success() {
            let err = Self::remote_error(status.as_u16(), &body);
            log::warn!("Gemini API returned {}: {}", status, err);
            return Err(err);
        }

        let parsed: GeminiResponse = serde_json::from_str(&body).map_err(|e| {
            log::error!("Failed to parse Gemini response: {}", e);
            ChatError::Parse(e.to_string())
        })?;

        Ok(Self::extract_reply(parsed))
    }
}

#[async_trait]
impl LanguageModel for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, ChatError> {
        let Some(api_key) = self.api_key.as_deref() else {
            log::warn!("Refusing to call Gemini: no API key configured");
            return Err(ChatError::MissingApiKey);
        };

        let request = self.build_request(prompt);
        log::debug!(
            "Sending {} prompt characters to model {} (timeout {:?})",
            prompt.len(),
            self.model,
            self.timeout
        );

        let token = CancellationToken::new();
        let timer = {
            let token = token.clone();
            let timeout = self.timeout;
            tokio::spawn(async move {
                tokio::time::sleep(timeout).await;
                token.cancel();
            })
        };

        let result = tokio::select! {
            _ = token.cancelled() => {
                log::warn!("Gemini request timed out after {:?}", self.timeout);
                Err(ChatError::Timeout(self.timeout))
            }
            result = self.send(api_key, &request) => result,
        };
        timer.abort();

        result
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

#[cfg(test)]
#[path = "gemini_test.rs"]
mod gemini_test;
