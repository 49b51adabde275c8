//! Speech limit value object

use std::fmt;
use std::str::FromStr;
use std::time::Duration as StdDuration;

use crate::domain::error::SpeechLimitParseError;

/// Default maximum speech length (24 seconds)
pub const DEFAULT_SPEECH_SECS: u64 = 24;

/// Hard cap on the speech length the capture layer will honor (29 seconds)
pub const MAX_SPEECH_SECS: u64 = 29;

/// Value object representing the maximum length of a recorded take.
/// Immutable; clamped to the hard cap on creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SpeechLimit {
    milliseconds: u64,
}

impl SpeechLimit {
    /// Create a SpeechLimit from milliseconds, clamped to the hard cap.
    /// Zero falls back to the default.
    pub const fn from_millis(ms: u64) -> Self {
        let ms = if ms == 0 {
            DEFAULT_SPEECH_SECS * 1000
        } else if ms > MAX_SPEECH_SECS * 1000 {
            MAX_SPEECH_SECS * 1000
        } else {
            ms
        };
        Self { milliseconds: ms }
    }

    /// Create a SpeechLimit from seconds
    pub const fn from_secs(secs: u64) -> Self {
        Self::from_millis(secs * 1000)
    }

    /// Create from a caller-requested length in seconds.
    /// Zero or negative requests fall back to the default.
    pub const fn from_requested_secs(secs: i64) -> Self {
        if secs <= 0 {
            Self::default_limit()
        } else {
            Self::from_secs(secs as u64)
        }
    }

    /// Default speech limit (24 seconds)
    pub const fn default_limit() -> Self {
        Self {
            milliseconds: DEFAULT_SPEECH_SECS * 1000,
        }
    }

    /// Get the limit in seconds
    pub const fn as_secs(&self) -> u64 {
        self.milliseconds / 1000
    }

    /// Get the limit in milliseconds
    pub const fn as_millis(&self) -> u64 {
        self.milliseconds
    }

    /// Convert to std::time::Duration
    pub const fn as_std(&self) -> StdDuration {
        StdDuration::from_millis(self.milliseconds)
    }
}

impl FromStr for SpeechLimit {
    type Err = SpeechLimitParseError;

    /// Parse a speech limit string.
    /// Supported formats: "24s", "1m", "1m5s"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim().to_lowercase();

        let mut minutes: u64 = 0;
        let mut seconds: u64 = 0;
        let mut current_num = String::new();
        let mut found_any = false;

        for ch in input.chars() {
            if ch.is_ascii_digit() {
                current_num.push(ch);
            } else if ch == 'm' && !current_num.is_empty() {
                minutes = current_num.parse().map_err(|_| SpeechLimitParseError {
                    input: s.to_string(),
                })?;
                current_num.clear();
                found_any = true;
            } else if ch == 's' && !current_num.is_empty() {
                seconds = current_num.parse().map_err(|_| SpeechLimitParseError {
                    input: s.to_string(),
                })?;
                current_num.clear();
                found_any = true;
            } else {
                return Err(SpeechLimitParseError {
                    input: s.to_string(),
                });
            }
        }

        if !current_num.is_empty() || !found_any {
            return Err(SpeechLimitParseError {
                input: s.to_string(),
            });
        }

        let total_ms = (minutes * 60 + seconds) * 1000;

        if total_ms == 0 {
            return Err(SpeechLimitParseError {
                input: s.to_string(),
            });
        }

        Ok(Self::from_millis(total_ms))
    }
}

impl fmt::Display for SpeechLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total_secs = self.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;

        if minutes == 0 {
            write!(f, "{}s", seconds)
        } else if seconds == 0 {
            write!(f, "{}m", minutes)
        } else {
            write!(f, "{}m{}s", minutes, seconds)
        }
    }
}

impl Default for SpeechLimit {
    fn default() -> Self {
        Self::default_limit()
    }
}
