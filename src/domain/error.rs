//! Domain error types

use thiserror::Error;

/// Error when parsing a speech limit string
#[derive(Debug, Clone, Error)]
#[error("Invalid speech length: \"{input}\". Expected format: <number>s, <number>m, or <number>m<number>s (e.g., 24s, 1m, 1m5s)")]
pub struct SpeechLimitParseError {
    pub input: String,
}

/// Error when an invalid audio encoding name is provided
#[derive(Debug, Clone, Error)]
#[error("Invalid encoding: \"{input}\". Valid encodings are: flac, wav")]
pub struct InvalidEncodingError {
    pub input: String,
}

/// Error when a malformed language tag is provided
#[derive(Debug, Clone, Error)]
#[error("Invalid language tag: \"{input}\". Expected a BCP-47 code such as \"en\" or \"en-US\"")]
pub struct InvalidLanguageError {
    pub input: String,
}

/// Error when configuration fails
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),

    #[error("Failed to parse config file: {0}")]
    ParseError(String),

    #[error("Failed to write config file: {0}")]
    WriteError(String),

    #[error("Invalid config value for '{key}': {message}")]
    ValidationError { key: String, message: String },

    #[error("Config file already exists at: {0}")]
    AlreadyExists(String),
}
