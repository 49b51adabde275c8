//! Sender infrastructure module

mod http;

pub use http::HttpSpeechSender;
