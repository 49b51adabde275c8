//! Main app runner for the one-shot record-and-relay flow

use std::env;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use colored::Colorize;
use tokio::time::{sleep, Duration};

use crate::application::ports::{ConfigStore, EndReason, LocationProvider};
use crate::application::{RecordOptions, RecorderListener, RecorderService, SpoolDir};
use crate::domain::config::AppConfig;
use crate::infrastructure::{
    CpalVoiceCapture, DeniedLocationProvider, FixedLocationProvider, HttpSpeechSender,
    XdgConfigStore,
};

use super::presenter::{format_size, Presenter};
use super::signals::ShutdownSignal;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

/// Terminal status listener
struct CliListener {
    bytes: AtomicUsize,
    done: Arc<AtomicBool>,
}

impl RecorderListener for CliListener {
    fn on_record_start(&self, sample_rate: u32) {
        eprintln!(
            "{} Recording at {} Hz... (Ctrl-C to stop)",
            "●".red(),
            sample_rate
        );
    }

    fn on_audio(&self, chunk: &[u8]) {
        self.bytes.fetch_add(chunk.len(), Ordering::Relaxed);
    }

    fn on_record_end(&self, reason: EndReason) {
        eprintln!(
            "{} Recording complete ({}, {})",
            "✓".green(),
            reason,
            format_size(self.bytes.load(Ordering::Relaxed))
        );
        self.done.store(true, Ordering::SeqCst);
    }
}

/// Record one take and relay it to the backend
pub async fn run_record(config: AppConfig) -> ExitCode {
    let mut presenter = Presenter::new();

    let api_key = match config.api_key.clone().filter(|key| !key.is_empty()) {
        Some(key) => key,
        None => {
            presenter.error(
                "Missing API key. Set VOICE_RELAY_API_KEY or run 'voice-relay config set api_key <key>'",
            );
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let shutdown = ShutdownSignal::new();
    shutdown.setup();

    let spool = match SpoolDir::in_cache_dir() {
        Ok(spool) => spool,
        Err(e) => {
            presenter.error(&format!("Cannot create spool directory: {}", e));
            return ExitCode::from(EXIT_ERROR);
        }
    };
    let swept = spool.sweep_stale();
    if swept > 0 {
        tracing::debug!("removed {} stale spool files", swept);
    }

    let capture = Arc::new(CpalVoiceCapture::new());
    let sender = Arc::new(HttpSpeechSender::with_base_url(
        api_key,
        config.base_url_or_default(),
    ));
    let location: Arc<dyn LocationProvider> = if config.share_location() {
        match config.location_point() {
            Some(point) => Arc::new(FixedLocationProvider::new(point)),
            // Sharing enabled but no coordinates configured
            None => Arc::new(DeniedLocationProvider),
        }
    } else {
        Arc::new(DeniedLocationProvider)
    };

    let service = RecorderService::new(capture, sender, location, spool);

    let done = Arc::new(AtomicBool::new(false));
    let listener: Arc<dyn RecorderListener> = Arc::new(CliListener {
        bytes: AtomicUsize::new(0),
        done: Arc::clone(&done),
    });
    service.add_listener(Arc::clone(&listener));

    let options = RecordOptions {
        language: config.language_or_default(),
        encoding: config.encoding_or_default(),
        max_speech: config.max_speech_or_default(),
    };
    presenter.info(&format!(
        "Language {}, encoding {}, up to {}",
        options.language, options.encoding, options.max_speech
    ));

    if let Err(e) = service.start_recording(options).await {
        presenter.error(&e.to_string());
        return ExitCode::from(EXIT_ERROR);
    }

    // The take ends on Ctrl-C, end-of-speech, or the length cap
    let mut stop_sent = false;
    while !done.load(Ordering::SeqCst) {
        if shutdown.is_shutdown() && !stop_sent {
            service.stop_recording().await;
            stop_sent = true;
        }
        sleep(Duration::from_millis(50)).await;
    }

    service.remove_listener(&listener);

    // Fire-and-forget uploads; drained here only so the process does
    // not exit under them
    presenter.start_spinner("Uploading...");
    service.wait_idle().await;
    presenter.spinner_success("Done; spool cleaned up");

    ExitCode::from(EXIT_SUCCESS)
}

/// Load and merge configuration from file, env, and CLI
pub async fn load_merged_config(cli_config: AppConfig) -> AppConfig {
    let store = XdgConfigStore::new();
    let file_config = store.load().await.unwrap_or_else(|_| AppConfig::empty());

    let env_config = AppConfig {
        api_key: env::var("VOICE_RELAY_API_KEY")
            .ok()
            .filter(|key| !key.is_empty()),
        ..Default::default()
    };

    // Merge: defaults < file < env < cli
    AppConfig::defaults()
        .merge(file_config)
        .merge(env_config)
        .merge(cli_config)
}
