//! Recording domain module

mod encoding;
mod speech_limit;

pub use encoding::AudioEncoding;
pub use speech_limit::{SpeechLimit, DEFAULT_SPEECH_SECS, MAX_SPEECH_SECS};
