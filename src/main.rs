//! VoiceRelay CLI entry point

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use voice_relay::cli::{
    app::{load_merged_config, run_record, EXIT_ERROR, EXIT_USAGE_ERROR},
    args::{Cli, Commands},
    config_cmd::handle_config_command,
    presenter::Presenter,
};
use voice_relay::domain::config::{AppConfig, LocationConfig};
use voice_relay::domain::language::LanguageTag;
use voice_relay::domain::recording::{AudioEncoding, SpeechLimit};
use voice_relay::infrastructure::XdgConfigStore;

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();
    let presenter = Presenter::new();

    // Handle subcommands
    if let Some(Commands::Config { action }) = cli.command {
        let store = XdgConfigStore::new();
        if let Err(e) = handle_config_command(action, &store, &presenter).await {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
        return ExitCode::SUCCESS;
    }

    // Reject malformed arguments before they disappear into the merge
    if let Some(ref language) = cli.language {
        if let Err(e) = language.parse::<LanguageTag>() {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
    }
    if let Some(ref max_speech) = cli.max_speech {
        if let Err(e) = max_speech.parse::<SpeechLimit>() {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
    }

    // Build CLI config from args
    let cli_config = AppConfig {
        api_key: None, // API key comes from env/file only
        base_url: None,
        language: cli.language.clone(),
        encoding: cli.encoding.map(|e| AudioEncoding::from(e).to_string()),
        max_speech: cli.max_speech.clone(),
        location: if cli.share_location {
            Some(LocationConfig {
                share: Some(true),
                latitude: None,
                longitude: None,
            })
        } else {
            None
        },
    };

    let config = load_merged_config(cli_config).await;
    run_record(config).await
}

fn init_tracing() {
    // Relay-path failures are logged at debug level; opt in via RUST_LOG
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
