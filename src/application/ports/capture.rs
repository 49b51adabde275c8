//! Voice capture port interface

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::domain::recording::{AudioEncoding, SpeechLimit};

/// Capture errors
#[derive(Debug, Clone, Error)]
pub enum CaptureError {
    #[error("Failed to start capture: {0}")]
    StartFailed(String),

    #[error("No audio input device available")]
    NoInputDevice,

    #[error("Capture already in progress")]
    AlreadyCapturing,
}

/// Why a take ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// The caller stopped the recording
    Stopped,
    /// The maximum speech length was reached
    MaxLength,
    /// Trailing silence after speech (end-of-speech detection)
    EndOfSpeech,
}

impl EndReason {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Stopped => "stopped",
            Self::MaxLength => "max length",
            Self::EndOfSpeech => "end of speech",
        }
    }
}

impl fmt::Display for EndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Events emitted over the life of a take.
///
/// `Audio` chunks carry encoded bytes; the capture implementation owns
/// sample capture, encoding, and end-of-speech detection.
#[derive(Debug, Clone)]
pub enum CaptureEvent {
    /// The input stream is live; carries the device sample rate
    Started { sample_rate: u32 },
    /// An encoded audio chunk
    Audio(Vec<u8>),
    /// The take is finished; no further events follow
    Ended(EndReason),
}

/// Options for a single take
#[derive(Debug, Clone, Copy, Default)]
pub struct CaptureOptions {
    pub encoding: AudioEncoding,
    pub max_speech: SpeechLimit,
}

/// Port for the audio-capture primitive
#[async_trait]
pub trait VoiceCapture: Send + Sync {
    /// Start a take.
    ///
    /// # Returns
    /// A stream of capture events, terminated by `CaptureEvent::Ended`.
    async fn start(
        &self,
        options: CaptureOptions,
    ) -> Result<mpsc::Receiver<CaptureEvent>, CaptureError>;

    /// Request the end of the current take.
    /// The event stream still delivers `Ended` through the normal path.
    async fn stop(&self);

    /// Check if a take is in progress
    fn is_capturing(&self) -> bool;
}
