//! Configuration domain module

mod app_config;

pub use app_config::{AppConfig, LocationConfig, DEFAULT_BASE_URL};
