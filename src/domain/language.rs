//! Language tag value object

use std::fmt;
use std::str::FromStr;

use crate::domain::error::InvalidLanguageError;

/// Language tag used when the device locale cannot be determined
pub const FALLBACK_LANGUAGE: &str = "en-US";

/// Value object for a BCP-47-shaped language code (e.g. "en", "en-US").
///
/// Validation is structural, not registry-backed: subtags must be 1-8
/// ASCII alphanumerics separated by hyphens, and the primary subtag must
/// be alphabetic.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LanguageTag(String);

impl LanguageTag {
    /// Create a validated language tag
    pub fn new(tag: impl Into<String>) -> Result<Self, InvalidLanguageError> {
        let tag = tag.into();
        if Self::is_well_formed(&tag) {
            Ok(Self(tag))
        } else {
            Err(InvalidLanguageError { input: tag })
        }
    }

    /// The device language, derived from the OS locale.
    /// Falls back to "en-US" when the locale is unavailable or malformed.
    pub fn system_default() -> Self {
        sys_locale::get_locale()
            .map(|locale| locale.replace('_', "-"))
            .and_then(|tag| Self::new(tag).ok())
            .unwrap_or_else(Self::fallback)
    }

    /// The fallback tag ("en-US")
    pub fn fallback() -> Self {
        Self(FALLBACK_LANGUAGE.to_string())
    }

    /// Get the tag as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn is_well_formed(tag: &str) -> bool {
        let mut subtags = tag.split('-');

        let primary = match subtags.next() {
            Some(s) => s,
            None => return false,
        };
        if primary.is_empty()
            || primary.len() > 8
            || !primary.chars().all(|c| c.is_ascii_alphabetic())
        {
            return false;
        }

        subtags.all(|s| {
            !s.is_empty() && s.len() <= 8 && s.chars().all(|c| c.is_ascii_alphanumeric())
        })
    }
}

impl FromStr for LanguageTag {
    type Err = InvalidLanguageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.trim())
    }
}

impl fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_primary_only() {
        assert_eq!(LanguageTag::new("en").unwrap().as_str(), "en");
    }

    #[test]
    fn accepts_region_subtag() {
        assert_eq!(LanguageTag::new("en-US").unwrap().as_str(), "en-US");
        assert_eq!(LanguageTag::new("km-KH").unwrap().as_str(), "km-KH");
    }

    #[test]
    fn accepts_script_subtag() {
        assert!(LanguageTag::new("zh-Hant-TW").is_ok());
    }

    #[test]
    fn rejects_empty() {
        assert!(LanguageTag::new("").is_err());
    }

    #[test]
    fn rejects_numeric_primary() {
        assert!(LanguageTag::new("123").is_err());
    }

    #[test]
    fn rejects_empty_subtag() {
        assert!(LanguageTag::new("en-").is_err());
        assert!(LanguageTag::new("-US").is_err());
    }

    #[test]
    fn rejects_overlong_subtag() {
        assert!(LanguageTag::new("abcdefghi").is_err());
    }

    #[test]
    fn rejects_non_ascii() {
        assert!(LanguageTag::new("日本語").is_err());
    }

    #[test]
    fn parse_trims_whitespace() {
        let tag: LanguageTag = " en-US ".parse().unwrap();
        assert_eq!(tag.as_str(), "en-US");
    }

    #[test]
    fn system_default_is_well_formed() {
        // Whatever the host locale is, the result must be a valid tag
        let tag = LanguageTag::system_default();
        assert!(LanguageTag::new(tag.as_str()).is_ok());
    }

    #[test]
    fn fallback_is_en_us() {
        assert_eq!(LanguageTag::fallback().as_str(), "en-US");
    }
}
