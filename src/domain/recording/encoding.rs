//! Audio encoding value object

use std::fmt;
use std::str::FromStr;

use crate::domain::error::InvalidEncodingError;

/// Encodings a take can be spooled and uploaded in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioEncoding {
    /// Raw PCM16-LE payload described by the accompanying sample rate
    Wav,
    /// Lossless FLAC, encoded at the end of the take
    Flac,
}

impl AudioEncoding {
    /// Get the encoding name
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Wav => "wav",
            Self::Flac => "flac",
        }
    }

    /// Get the MIME type sent with the upload
    pub const fn mime_type(&self) -> &'static str {
        match self {
            Self::Wav => "audio/wav",
            Self::Flac => "audio/flac",
        }
    }

    /// Get the file extension used for the active spool file
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Wav => "wav",
            Self::Flac => "flac",
        }
    }
}

impl FromStr for AudioEncoding {
    type Err = InvalidEncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "wav" => Ok(Self::Wav),
            "flac" => Ok(Self::Flac),
            _ => Err(InvalidEncodingError {
                input: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for AudioEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Default for AudioEncoding {
    fn default() -> Self {
        Self::Flac
    }
}
