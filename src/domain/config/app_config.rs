//! Application configuration value object

use serde::{Deserialize, Serialize};

use crate::domain::language::LanguageTag;
use crate::domain::location::GeoPoint;
use crate::domain::recording::{AudioEncoding, SpeechLimit};

/// Default speech backend base URL
pub const DEFAULT_BASE_URL: &str = "https://api.voicerelay.io";

/// Location sharing configuration.
/// Sharing is opt-in; the coordinates stand in for the device's
/// last-known location.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocationConfig {
    pub share: Option<bool>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub language: Option<String>,
    pub encoding: Option<String>,
    pub max_speech: Option<String>,
    pub location: Option<LocationConfig>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            api_key: None,
            base_url: Some(DEFAULT_BASE_URL.to_string()),
            language: None,
            encoding: Some("flac".to_string()),
            max_speech: Some("24s".to_string()),
            location: Some(LocationConfig {
                share: Some(false),
                latitude: None,
                longitude: None,
            }),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            api_key: other.api_key.or(self.api_key),
            base_url: other.base_url.or(self.base_url),
            language: other.language.or(self.language),
            encoding: other.encoding.or(self.encoding),
            max_speech: other.max_speech.or(self.max_speech),
            location: Self::merge_location_config(self.location, other.location),
        }
    }

    /// Merge location config sections
    fn merge_location_config(
        base: Option<LocationConfig>,
        other: Option<LocationConfig>,
    ) -> Option<LocationConfig> {
        match (base, other) {
            (None, None) => None,
            (Some(b), None) => Some(b),
            (None, Some(o)) => Some(o),
            (Some(b), Some(o)) => Some(LocationConfig {
                share: o.share.or(b.share),
                latitude: o.latitude.or(b.latitude),
                longitude: o.longitude.or(b.longitude),
            }),
        }
    }

    /// Get base_url, or the default backend URL if not set
    pub fn base_url_or_default(&self) -> &str {
        self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    /// Get language as a parsed LanguageTag, or the device language
    /// if not set/invalid
    pub fn language_or_default(&self) -> LanguageTag {
        self.language
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(LanguageTag::system_default)
    }

    /// Get encoding as parsed AudioEncoding, or FLAC if not set/invalid
    pub fn encoding_or_default(&self) -> AudioEncoding {
        self.encoding
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    /// Get max_speech as parsed SpeechLimit, or the default if not set/invalid
    pub fn max_speech_or_default(&self) -> SpeechLimit {
        self.max_speech
            .as_ref()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    /// Whether location sharing is enabled (off unless granted)
    pub fn share_location(&self) -> bool {
        self.location
            .as_ref()
            .and_then(|l| l.share)
            .unwrap_or(false)
    }

    /// Get the configured coordinate, if both parts are present
    pub fn location_point(&self) -> Option<GeoPoint> {
        let location = self.location.as_ref()?;
        match (location.latitude, location.longitude) {
            (Some(lat), Some(lng)) => Some(GeoPoint::new(lat, lng)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_have_expected_values() {
        let config = AppConfig::defaults();
        assert!(config.api_key.is_none());
        assert_eq!(config.base_url, Some(DEFAULT_BASE_URL.to_string()));
        assert!(config.language.is_none());
        assert_eq!(config.encoding, Some("flac".to_string()));
        assert_eq!(config.max_speech, Some("24s".to_string()));
        let location = config.location.as_ref().unwrap();
        assert_eq!(location.share, Some(false));
        assert!(location.latitude.is_none());
    }

    #[test]
    fn empty_has_all_none() {
        let config = AppConfig::empty();
        assert!(config.api_key.is_none());
        assert!(config.base_url.is_none());
        assert!(config.language.is_none());
        assert!(config.encoding.is_none());
        assert!(config.location.is_none());
    }

    #[test]
    fn merge_other_takes_precedence() {
        let base = AppConfig {
            api_key: Some("base_key".to_string()),
            language: Some("en-US".to_string()),
            encoding: Some("flac".to_string()),
            ..Default::default()
        };

        let other = AppConfig {
            api_key: Some("other_key".to_string()),
            language: None, // Should not override
            encoding: Some("wav".to_string()),
            ..Default::default()
        };

        let merged = base.merge(other);

        assert_eq!(merged.api_key, Some("other_key".to_string()));
        assert_eq!(merged.language, Some("en-US".to_string())); // Kept from base
        assert_eq!(merged.encoding, Some("wav".to_string()));
    }

    #[test]
    fn merge_preserves_base_when_other_is_none() {
        let base = AppConfig {
            api_key: Some("key".to_string()),
            max_speech: Some("20s".to_string()),
            ..Default::default()
        };

        let other = AppConfig::empty();
        let merged = base.merge(other);

        assert_eq!(merged.api_key, Some("key".to_string()));
        assert_eq!(merged.max_speech, Some("20s".to_string()));
    }

    #[test]
    fn merge_location_config_field_wise() {
        let base = AppConfig {
            location: Some(LocationConfig {
                share: Some(false),
                latitude: Some(11.55),
                longitude: Some(104.92),
            }),
            ..Default::default()
        };
        let other = AppConfig {
            location: Some(LocationConfig {
                share: Some(true),
                latitude: None,
                longitude: None,
            }),
            ..Default::default()
        };
        let merged = base.merge(other);
        assert!(merged.share_location());
        let point = merged.location_point().unwrap();
        assert_eq!(point.latitude, 11.55);
        assert_eq!(point.longitude, 104.92);
    }

    #[test]
    fn encoding_or_default_parses() {
        let config = AppConfig {
            encoding: Some("wav".to_string()),
            ..Default::default()
        };
        assert_eq!(config.encoding_or_default(), AudioEncoding::Wav);
    }

    #[test]
    fn encoding_or_default_uses_default_on_invalid() {
        let config = AppConfig {
            encoding: Some("invalid".to_string()),
            ..Default::default()
        };
        assert_eq!(config.encoding_or_default(), AudioEncoding::Flac);
    }

    #[test]
    fn max_speech_or_default_parses() {
        let config = AppConfig {
            max_speech: Some("15s".to_string()),
            ..Default::default()
        };
        assert_eq!(config.max_speech_or_default().as_secs(), 15);
    }

    #[test]
    fn max_speech_or_default_uses_default_on_invalid() {
        let config = AppConfig {
            max_speech: Some("invalid".to_string()),
            ..Default::default()
        };
        assert_eq!(config.max_speech_or_default().as_secs(), 24);
    }

    #[test]
    fn language_or_default_parses() {
        let config = AppConfig {
            language: Some("km-KH".to_string()),
            ..Default::default()
        };
        assert_eq!(config.language_or_default().as_str(), "km-KH");
    }

    #[test]
    fn base_url_or_default() {
        let config = AppConfig::empty();
        assert_eq!(config.base_url_or_default(), DEFAULT_BASE_URL);

        let config = AppConfig {
            base_url: Some("http://localhost:8080".to_string()),
            ..Default::default()
        };
        assert_eq!(config.base_url_or_default(), "http://localhost:8080");
    }

    #[test]
    fn share_location_defaults_to_false() {
        assert!(!AppConfig::empty().share_location());
    }

    #[test]
    fn location_point_requires_both_coordinates() {
        let config = AppConfig {
            location: Some(LocationConfig {
                share: Some(true),
                latitude: Some(1.0),
                longitude: None,
            }),
            ..Default::default()
        };
        assert!(config.location_point().is_none());
    }
}
