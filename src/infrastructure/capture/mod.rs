//! Capture infrastructure module
//!
//! cpal-based microphone capture with end-of-speech detection.

mod cpal_capture;
mod flac;

pub use cpal_capture::CpalVoiceCapture;
pub use flac::{encode_to_flac, FlacError};
