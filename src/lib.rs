//! VoiceRelay - microphone speech relay
//!
//! This crate records microphone speech, spools it to a temporary file,
//! and uploads the finished take to a remote speech-processing backend
//! together with location and language metadata.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Value objects (language tag, encoding, speech limit) and errors
//! - **Application**: The recorder service and port interfaces (traits)
//! - **Infrastructure**: Adapter implementations (cpal, HTTP sender, config store)
//! - **CLI**: Command-line interface, argument parsing, and signal handling

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
