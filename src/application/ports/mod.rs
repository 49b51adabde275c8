//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod capture;
pub mod config;
pub mod location;
pub mod sender;

// Re-export common types
pub use capture::{CaptureError, CaptureEvent, CaptureOptions, EndReason, VoiceCapture};
pub use config::ConfigStore;
pub use location::LocationProvider;
pub use sender::{SendError, SpeechSender, UploadReceipt};
