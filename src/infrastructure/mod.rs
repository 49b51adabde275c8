//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces,
//! integrating with the audio device, the speech backend, and local
//! storage.

pub mod capture;
pub mod config;
pub mod location;
pub mod sender;

// Re-export adapters
pub use capture::CpalVoiceCapture;
pub use config::XdgConfigStore;
pub use location::{DeniedLocationProvider, FixedLocationProvider};
pub use sender::HttpSpeechSender;
