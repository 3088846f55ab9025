//! Error types for the chat pipeline.
//!
//! Chat failures are grouped by where they come from, so the front end can
//! pick how to show them. A missing credential is a configuration problem and
//! stays on screen until fixed. Transport failures, timeouts and remote errors
//! only affect the request that produced them.

use std::time::Duration;

use thiserror::Error;

/// Message used when the remote side fails without saying why.
pub const GENERIC_FAILURE: &str = "Failed to get response from Gemini API";

/// Banner shown while no API key is configured.
pub const MISSING_KEY_NOTICE: &str = "Gemini API key not configured. Please contact your instructor.";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChatError {
    #[error("API key not configured. Please contact your instructor.")]
    MissingApiKey,
    #[error("The request timed out after {} seconds. Please try again.", .0.as_secs())]
    Timeout(Duration),
    #[error("{}", GENERIC_FAILURE)]
    Transport(String),
    #[error("{message}")]
    Remote { status: u16, message: String },
    #[error("Could not read the response from Gemini API: {0}")]
    Parse(String),
}

impl ChatError {
    /// Configuration errors block every send; the rest are per request.
    pub fn is_configuration(&self) -> bool {
        matches!(self, ChatError::MissingApiKey)
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ChatError::Timeout(_))
    }
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error on history file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("History file {path} is corrupt: {message}")]
    Corrupt { path: String, message: String },
    #[error("Failed to serialize history: {0}")]
    Serialize(String),
    #[error("No data directory available for the history file")]
    NoDataDir,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {message}")]
    Read { path: String, message: String },
    #[error("Failed to parse YAML config: {0}")]
    Parse(String),
    #[error("Failed to read preamble file {path}: {message}")]
    Preamble { path: String, message: String },
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
