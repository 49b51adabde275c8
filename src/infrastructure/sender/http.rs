//! HTTP speech sender adapter
//!
//! One multipart POST per finished take: the audio payload plus
//! language, coordinates, and sample rate as form fields.

use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;

use crate::application::ports::{SendError, SpeechSender, UploadReceipt};
use crate::domain::config::DEFAULT_BASE_URL;
use crate::domain::language::LanguageTag;
use crate::domain::location::GeoPoint;

/// Path of the voice upload endpoint
const UPLOAD_PATH: &str = "/v1/voices";

/// Backend acknowledgement body
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadAck {
    voice_id: Option<String>,
}

/// Speech sender over HTTP
pub struct HttpSpeechSender {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl HttpSpeechSender {
    /// Create a sender against the default backend
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Create a sender against a custom backend base URL
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            api_key: api_key.into(),
            base_url,
            client: reqwest::Client::new(),
        }
    }

    /// Build the upload URL
    fn upload_url(&self) -> String {
        format!("{}{}", self.base_url, UPLOAD_PATH)
    }
}

#[async_trait]
impl SpeechSender for HttpSpeechSender {
    async fn send(
        &self,
        audio_file: &Path,
        mime_type: &str,
        language: &LanguageTag,
        location: GeoPoint,
        sample_rate: u32,
    ) -> Result<UploadReceipt, SendError> {
        let bytes = tokio::fs::read(audio_file)
            .await
            .map_err(|e| SendError::FileRead(e.to_string()))?;

        let file_name = audio_file
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("voice")
            .to_string();

        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(mime_type)
            .map_err(|e| SendError::RequestFailed(e.to_string()))?;

        let form = reqwest::multipart::Form::new()
            .part("voice", part)
            .text("language", language.as_str().to_string())
            .text("latitude", location.latitude.to_string())
            .text("longitude", location.longitude.to_string())
            .text("sampleRate", sample_rate.to_string());

        let response = self
            .client
            .post(self.upload_url())
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| SendError::RequestFailed(e.to_string()))?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(SendError::InvalidApiKey);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(SendError::RateLimited);
        }

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(SendError::Backend(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        // The ack body is optional; tolerate empty or non-JSON replies
        let ack = response.json::<UploadAck>().await.unwrap_or_default();

        Ok(UploadReceipt {
            voice_id: ack.voice_id,
        })
    }
}
