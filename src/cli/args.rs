//! CLI argument definitions using Clap

use clap::{Parser, Subcommand, ValueEnum};

use crate::domain::recording::AudioEncoding;

/// voice-relay - record speech and relay it to a speech backend
#[derive(Parser, Debug)]
#[command(name = "voice-relay")]
#[command(version)]
#[command(about = "Record microphone speech and relay it to a speech-processing backend")]
#[command(long_about = None)]
pub struct Cli {
    /// Language of the speech as a BCP-47 code (e.g. en-US)
    #[arg(short, long, value_name = "TAG")]
    pub language: Option<String>,

    /// Audio encoding for the uploaded take
    #[arg(short, long, value_name = "CODEC")]
    pub encoding: Option<EncodingArg>,

    /// Maximum speech length (e.g. 24s; capped at 29s)
    #[arg(short = 'm', long, value_name = "TIME")]
    pub max_speech: Option<String>,

    /// Attach the configured location to the upload
    #[arg(short = 's', long)]
    pub share_location: bool,

    /// Config subcommand
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Encoding argument for clap ValueEnum
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum EncodingArg {
    Flac,
    Wav,
}

impl From<EncodingArg> for AudioEncoding {
    fn from(arg: EncodingArg) -> Self {
        match arg {
            EncodingArg::Flac => AudioEncoding::Flac,
            EncodingArg::Wav => AudioEncoding::Wav,
        }
    }
}

impl From<AudioEncoding> for EncodingArg {
    fn from(encoding: AudioEncoding) -> Self {
        match encoding {
            AudioEncoding::Flac => EncodingArg::Flac,
            AudioEncoding::Wav => EncodingArg::Wav,
        }
    }
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &[
    "api_key",
    "base_url",
    "language",
    "encoding",
    "max_speech",
    "location.share",
    "location.latitude",
    "location.longitude",
];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}
