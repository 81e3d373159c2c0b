//! Configuration management for the podcast studio pipeline
//!
//! Supports loading configuration from:
//! - A TOML file
//! - Environment variables (`PODCAST_STUDIO_` prefix)
//! - Compiled-in defaults

pub mod settings;

pub use settings::{
    load_settings, AudioSettings, PipelineConfig, ProviderCredentials, QaSettings,
    RegenerationSettings, ScriptwriterMode, TtsSettings,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("configuration file not found: {0}")]
    FileNotFound(String),

    #[error("failed to parse configuration: {0}")]
    ParseError(String),

    #[error("missing required field: {0}")]
    MissingField(String),

    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

impl From<ConfigError> for podcast_core::Error {
    fn from(err: ConfigError) -> Self {
        podcast_core::Error::Configuration(err.to_string())
    }
}
