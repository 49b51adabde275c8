//! Speech sender port interface

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

use crate::domain::language::LanguageTag;
use crate::domain::location::GeoPoint;

/// Upload errors
#[derive(Debug, Clone, Error)]
pub enum SendError {
    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited,

    #[error("Failed to read audio file: {0}")]
    FileRead(String),

    #[error("Upload request failed: {0}")]
    RequestFailed(String),

    #[error("Backend error: {0}")]
    Backend(String),
}

/// Acknowledgement returned by the backend for an accepted upload
#[derive(Debug, Clone, Default)]
pub struct UploadReceipt {
    /// Backend identifier for the uploaded voice, when provided
    pub voice_id: Option<String>,
}

/// Port for the network sender.
///
/// One call per finished take; there is no retry or session state.
#[async_trait]
pub trait SpeechSender: Send + Sync {
    /// Upload a finished take.
    ///
    /// # Arguments
    /// * `audio_file` - Path to the spooled audio
    /// * `mime_type` - MIME type of the payload
    /// * `language` - Language of the speech
    /// * `location` - Device location, (0,0) when unknown
    /// * `sample_rate` - Sample rate the take was captured at
    async fn send(
        &self,
        audio_file: &Path,
        mime_type: &str,
        language: &LanguageTag,
        location: GeoPoint,
        sample_rate: u32,
    ) -> Result<UploadReceipt, SendError>;
}
