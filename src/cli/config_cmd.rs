//! Config command handler

use crate::application::ports::ConfigStore;
use crate::domain::config::LocationConfig;
use crate::domain::error::ConfigError;
use crate::domain::language::LanguageTag;
use crate::domain::recording::{AudioEncoding, SpeechLimit};

use super::args::{is_valid_config_key, ConfigAction, VALID_CONFIG_KEYS};
use super::presenter::Presenter;

/// Handle config subcommand
pub async fn handle_config_command<S: ConfigStore>(
    action: ConfigAction,
    store: &S,
    presenter: &Presenter,
) -> Result<(), ConfigError> {
    match action {
        ConfigAction::Init => handle_init(store, presenter).await,
        ConfigAction::Set { key, value } => handle_set(store, presenter, &key, &value).await,
        ConfigAction::Get { key } => handle_get(store, presenter, &key).await,
        ConfigAction::List => handle_list(store, presenter).await,
        ConfigAction::Path => handle_path(store, presenter),
    }
}

async fn handle_init<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    store.init().await?;
    presenter.success(&format!(
        "Config file created at: {}",
        store.path().display()
    ));
    Ok(())
}

async fn handle_set<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    if !is_valid_config_key(key) {
        return Err(ConfigError::ValidationError {
            key: key.to_string(),
            message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
        });
    }

    validate_config_value(key, value)?;

    let mut config = store.load().await?;

    match key {
        "api_key" => config.api_key = Some(value.to_string()),
        "base_url" => config.base_url = Some(value.trim_end_matches('/').to_string()),
        "language" => config.language = Some(value.to_string()),
        "encoding" => config.encoding = Some(value.to_lowercase()),
        "max_speech" => config.max_speech = Some(value.to_string()),
        "location.share" => {
            location_section(&mut config.location).share = Some(parse_bool(value).map_err(|_| {
                bool_error(key)
            })?);
        }
        "location.latitude" => {
            location_section(&mut config.location).latitude =
                Some(parse_coordinate(value, 90.0).map_err(|message| ConfigError::ValidationError {
                    key: key.to_string(),
                    message,
                })?);
        }
        "location.longitude" => {
            location_section(&mut config.location).longitude =
                Some(parse_coordinate(value, 180.0).map_err(|message| {
                    ConfigError::ValidationError {
                        key: key.to_string(),
                        message,
                    }
                })?);
        }
        _ => unreachable!(), // Already validated
    }

    store.save(&config).await?;
    presenter.success(&format!("{} = {}", key, value));

    Ok(())
}

async fn handle_get<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
) -> Result<(), ConfigError> {
    if !is_valid_config_key(key) {
        return Err(ConfigError::ValidationError {
            key: key.to_string(),
            message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
        });
    }

    let config = store.load().await?;

    let value = match key {
        "api_key" => config.api_key.map(|s| mask_api_key(&s)),
        "base_url" => config.base_url,
        "language" => config.language,
        "encoding" => config.encoding,
        "max_speech" => config.max_speech,
        "location.share" => config
            .location
            .as_ref()
            .and_then(|l| l.share)
            .map(|b| b.to_string()),
        "location.latitude" => config
            .location
            .as_ref()
            .and_then(|l| l.latitude)
            .map(|v| v.to_string()),
        "location.longitude" => config
            .location
            .as_ref()
            .and_then(|l| l.longitude)
            .map(|v| v.to_string()),
        _ => unreachable!(),
    };

    match value {
        Some(v) => presenter.output(&v),
        None => presenter.output("(not set)"),
    }

    Ok(())
}

async fn handle_list<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    let config = store.load().await?;

    presenter.key_value(
        "api_key",
        &config
            .api_key
            .map(|s| mask_api_key(&s))
            .unwrap_or_else(|| "(not set)".to_string()),
    );
    presenter.key_value("base_url", config.base_url.as_deref().unwrap_or("(not set)"));
    presenter.key_value("language", config.language.as_deref().unwrap_or("(not set)"));
    presenter.key_value("encoding", config.encoding.as_deref().unwrap_or("(not set)"));
    presenter.key_value(
        "max_speech",
        config.max_speech.as_deref().unwrap_or("(not set)"),
    );
    presenter.key_value(
        "location.share",
        &config
            .location
            .as_ref()
            .and_then(|l| l.share)
            .map(|b| b.to_string())
            .unwrap_or_else(|| "(not set)".to_string()),
    );
    presenter.key_value(
        "location.latitude",
        &config
            .location
            .as_ref()
            .and_then(|l| l.latitude)
            .map(|v| v.to_string())
            .unwrap_or_else(|| "(not set)".to_string()),
    );
    presenter.key_value(
        "location.longitude",
        &config
            .location
            .as_ref()
            .and_then(|l| l.longitude)
            .map(|v| v.to_string())
            .unwrap_or_else(|| "(not set)".to_string()),
    );

    Ok(())
}

fn handle_path<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    presenter.output(&store.path().to_string_lossy());
    Ok(())
}

/// Validate a config value based on key type
fn validate_config_value(key: &str, value: &str) -> Result<(), ConfigError> {
    match key {
        "language" => {
            value
                .parse::<LanguageTag>()
                .map_err(|e| ConfigError::ValidationError {
                    key: key.to_string(),
                    message: e.to_string(),
                })?;
        }
        "encoding" => {
            value
                .parse::<AudioEncoding>()
                .map_err(|e| ConfigError::ValidationError {
                    key: key.to_string(),
                    message: e.to_string(),
                })?;
        }
        "max_speech" => {
            value
                .parse::<SpeechLimit>()
                .map_err(|e| ConfigError::ValidationError {
                    key: key.to_string(),
                    message: e.to_string(),
                })?;
        }
        "location.share" => {
            parse_bool(value).map_err(|_| bool_error(key))?;
        }
        "location.latitude" => {
            parse_coordinate(value, 90.0).map_err(|message| ConfigError::ValidationError {
                key: key.to_string(),
                message,
            })?;
        }
        "location.longitude" => {
            parse_coordinate(value, 180.0).map_err(|message| ConfigError::ValidationError {
                key: key.to_string(),
                message,
            })?;
        }
        _ => {} // api_key and base_url accept any string
    }
    Ok(())
}

fn location_section(location: &mut Option<LocationConfig>) -> &mut LocationConfig {
    location.get_or_insert_with(LocationConfig::default)
}

fn bool_error(key: &str) -> ConfigError {
    ConfigError::ValidationError {
        key: key.to_string(),
        message: "Value must be 'true' or 'false'".to_string(),
    }
}

/// Parse a boolean value
fn parse_bool(value: &str) -> Result<bool, ()> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(()),
    }
}

/// Parse a coordinate, bounded to +/- limit degrees
fn parse_coordinate(value: &str, limit: f64) -> Result<f64, String> {
    let parsed: f64 = value
        .parse()
        .map_err(|_| "Value must be a number".to_string())?;
    if !parsed.is_finite() || parsed.abs() > limit {
        return Err(format!("Value must be between -{} and {}", limit, limit));
    }
    Ok(parsed)
}

/// Mask API key for display (show first 4 and last 4 chars)
fn mask_api_key(key: &str) -> String {
    if key.len() <= 8 {
        "*".repeat(key.len())
    } else {
        format!("{}...{}", &key[..4], &key[key.len() - 4..])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bool_values() {
        assert_eq!(parse_bool("true"), Ok(true));
        assert_eq!(parse_bool("false"), Ok(false));
        assert_eq!(parse_bool("yes"), Ok(true));
        assert_eq!(parse_bool("no"), Ok(false));
        assert_eq!(parse_bool("1"), Ok(true));
        assert_eq!(parse_bool("0"), Ok(false));
        assert!(parse_bool("invalid").is_err());
    }

    #[test]
    fn mask_api_key_long() {
        assert_eq!(mask_api_key("abcdefghijklmnop"), "abcd...mnop");
    }

    #[test]
    fn mask_api_key_short() {
        assert_eq!(mask_api_key("short"), "*****");
    }

    #[test]
    fn validate_language() {
        assert!(validate_config_value("language", "en-US").is_ok());
        assert!(validate_config_value("language", "not a tag").is_err());
    }

    #[test]
    fn validate_encoding() {
        assert!(validate_config_value("encoding", "flac").is_ok());
        assert!(validate_config_value("encoding", "wav").is_ok());
        assert!(validate_config_value("encoding", "ogg").is_err());
    }

    #[test]
    fn validate_max_speech() {
        assert!(validate_config_value("max_speech", "24s").is_ok());
        assert!(validate_config_value("max_speech", "invalid").is_err());
    }

    #[test]
    fn validate_coordinates() {
        assert!(validate_config_value("location.latitude", "45.0").is_ok());
        assert!(validate_config_value("location.latitude", "91").is_err());
        assert!(validate_config_value("location.longitude", "-179.9").is_ok());
        assert!(validate_config_value("location.longitude", "181").is_err());
        assert!(validate_config_value("location.longitude", "abc").is_err());
    }

    #[test]
    fn coordinate_rejects_nan() {
        assert!(parse_coordinate("NaN", 90.0).is_err());
    }
}
