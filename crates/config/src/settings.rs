//! Pipeline configuration
//!
//! Loaded from defaults, an optional TOML file, and `PODCAST_STUDIO_`
//! prefixed environment variables, the same layering a config-crate-backed
//! settings loader typically uses: later sources override earlier ones,
//! field by field.

use crate::ConfigError;
use podcast_core::{BanterLevel, StylePreset};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptwriterMode {
    Template,
    Llm,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TtsSettings {
    pub concurrency: usize,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub initial_backoff_ms: u64,
}

impl Default for TtsSettings {
    fn default() -> Self {
        Self {
            concurrency: 3,
            timeout_secs: 30,
            max_retries: 2,
            initial_backoff_ms: 100,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioSettings {
    pub crossfade_ms: u32,
    pub target_loudness_lufs: f64,
    pub true_peak_ceiling_dbtp: f64,
    pub loudness_range: f64,
    pub compression_enabled: bool,
    pub compression_threshold_db: f64,
    pub compression_ratio: f64,
    pub de_esser_enabled: bool,
    pub de_esser_frequency_hz: f64,
    pub room_tone_enabled: bool,
    pub room_tone_level_db: f64,
    pub sample_rate: u32,
    pub output_format: podcast_core::AudioFormat,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            crossfade_ms: 40,
            target_loudness_lufs: -16.0,
            true_peak_ceiling_dbtp: -1.5,
            loudness_range: 11.0,
            compression_enabled: false,
            compression_threshold_db: -20.0,
            compression_ratio: 3.0,
            de_esser_enabled: false,
            de_esser_frequency_hz: 6000.0,
            room_tone_enabled: false,
            room_tone_level_db: -45.0,
            sample_rate: 24000,
            output_format: podcast_core::AudioFormat::Mp3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QaSettings {
    pub pass_threshold: f64,
}

impl Default for QaSettings {
    fn default() -> Self {
        Self { pass_threshold: 78.0 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegenerationSettings {
    pub max_attempts: u32,
}

impl Default for RegenerationSettings {
    fn default() -> Self {
        Self { max_attempts: 3 }
    }
}

/// Opaque provider credentials read from the environment; their absence
/// forces development mode.
#[derive(Debug, Clone, Default)]
pub struct ProviderCredentials {
    pub google: Option<String>,
    pub openai: Option<String>,
    pub elevenlabs: Option<String>,
}

impl ProviderCredentials {
    pub fn from_env() -> Self {
        Self {
            google: std::env::var("GOOGLE_TTS_API_KEY").ok(),
            openai: std::env::var("OPENAI_API_KEY").ok(),
            elevenlabs: std::env::var("ELEVENLABS_API_KEY").ok(),
        }
    }

    pub fn development_mode(&self) -> bool {
        self.google.is_none() && self.openai.is_none() && self.elevenlabs.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default = "default_target_duration_sec")]
    pub target_duration_sec: f64,
    #[serde(default)]
    pub style_preset: StylePreset,
    #[serde(default)]
    pub banter_level: BanterLevel,
    #[serde(default)]
    pub scriptwriter_mode: ScriptwriterMode,
    #[serde(default)]
    pub tts: TtsSettings,
    #[serde(default)]
    pub audio: AudioSettings,
    #[serde(default)]
    pub qa: QaSettings,
    #[serde(default)]
    pub regeneration: RegenerationSettings,

    #[serde(skip)]
    pub credentials: ProviderCredentials,
}

fn default_target_duration_sec() -> f64 {
    600.0
}

impl Default for ScriptwriterMode {
    fn default() -> Self {
        ScriptwriterMode::Template
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            target_duration_sec: 600.0,
            style_preset: StylePreset::Friendly,
            banter_level: BanterLevel::default(),
            scriptwriter_mode: ScriptwriterMode::Template,
            tts: TtsSettings::default(),
            audio: AudioSettings::default(),
            qa: QaSettings::default(),
            regeneration: RegenerationSettings::default(),
            credentials: ProviderCredentials::default(),
        }
    }
}

/// Load settings by layering an optional TOML file and `PODCAST_STUDIO_`
/// prefixed environment variables over the compiled-in defaults. Every
/// field carries `#[serde(default)]`, so a missing file or a partial
/// override both deserialize cleanly.
pub fn load_settings(config_path: Option<&Path>) -> Result<PipelineConfig, ConfigError> {
    let mut builder = config::Config::builder();

    if let Some(path) = config_path {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }
        builder = builder.add_source(config::File::from(path));
    }

    builder = builder.add_source(
        config::Environment::with_prefix("PODCAST_STUDIO")
            .separator("__")
            .try_parsing(true),
    );

    let built = builder.build()?;
    let mut settings: PipelineConfig = built.try_deserialize()?;
    settings.credentials = ProviderCredentials::from_env();
    Ok(settings)
}
