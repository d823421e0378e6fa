//! Companion configuration and the shared JSON load/save helpers.
//!
//! Every field has a default, so a partial file (or none at all) is fine.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

pub const CONFIG_ENV: &str = "COMPANION_CONFIG";
const APP_DIR: &str = "com.empathic.companion";
const CONFIG_FILE: &str = "companion_config.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("thinking delay range is inverted: min {min}ms > max {max}ms")]
    InvertedDelay { min: u64, max: u64 },
    #[error("{0} period must be greater than zero")]
    ZeroPeriod(&'static str),
    #[error("failed to create config directory: {0}")]
    CreateDir(std::io::Error),
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to write config file: {0}")]
    Write(std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanionConfig {
    /// Lower bound of the pause before an assistant reply (ms).
    pub thinking_delay_min_ms: u64,
    /// Upper bound of the pause before an assistant reply (ms).
    pub thinking_delay_max_ms: u64,
    /// How long the speaking indicator stays on after a reply (ms).
    pub speaking_duration_ms: u64,
    pub face_interval_ms: u64,
    pub voice_interval_ms: u64,
    pub transcript_interval_ms: u64,
    /// Start camera and microphone when the session starts.
    pub auto_start_sensors: bool,
    /// Hand replies and welcomes to speech output. Text is always shown.
    pub speech_enabled: bool,
    /// Fixed RNG seed for reproducible runs.
    pub seed: Option<u64>,
}

impl Default for CompanionConfig {
    fn default() -> Self {
        Self {
            thinking_delay_min_ms: 1000,
            thinking_delay_max_ms: 2000,
            speaking_duration_ms: 3000,
            face_interval_ms: 5000,
            voice_interval_ms: 7000,
            transcript_interval_ms: 10_000,
            auto_start_sensors: true,
            speech_enabled: true,
            seed: None,
        }
    }
}

impl CompanionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.thinking_delay_min_ms > self.thinking_delay_max_ms {
            return Err(ConfigError::InvertedDelay {
                min: self.thinking_delay_min_ms,
                max: self.thinking_delay_max_ms,
            });
        }
        for (name, value) in [
            ("face", self.face_interval_ms),
            ("voice", self.voice_interval_ms),
            ("transcript", self.transcript_interval_ms),
        ] {
            if value == 0 {
                return Err(ConfigError::ZeroPeriod(name));
            }
        }
        Ok(())
    }

    /// No thinking pause and no speaking hold. Handy for tests and scripted runs.
    pub fn instant() -> Self {
        Self {
            thinking_delay_min_ms: 0,
            thinking_delay_max_ms: 0,
            speaking_duration_ms: 0,
            ..Self::default()
        }
    }

    pub fn face_interval(&self) -> Duration {
        Duration::from_millis(self.face_interval_ms)
    }

    pub fn voice_interval(&self) -> Duration {
        Duration::from_millis(self.voice_interval_ms)
    }

    pub fn transcript_interval(&self) -> Duration {
        Duration::from_millis(self.transcript_interval_ms)
    }

    pub fn speaking_duration(&self) -> Duration {
        Duration::from_millis(self.speaking_duration_ms)
    }
}

/// `$COMPANION_CONFIG` if set, else `<data dir>/com.empathic.companion/companion_config.json`.
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }
    dirs_next::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join(CONFIG_FILE)
}

/// Load and validate; an invalid file falls back to defaults.
pub fn load_config(path: &Path) -> CompanionConfig {
    let config: CompanionConfig = load_json_config(path, "Config");
    match config.validate() {
        Ok(()) => config,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "invalid config, using defaults");
            CompanionConfig::default()
        }
    }
}

pub fn save_config(path: &Path, config: &CompanionConfig) -> Result<(), ConfigError> {
    save_json_config(path, config, "Config")
}

/// Generic load for any Serde config type with a `Default` implementation.
/// Falls back to `T::default()` if the file is missing or unparsable.
pub fn load_json_config<T: DeserializeOwned + Default>(path: &Path, label: &str) -> T {
    match std::fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str::<T>(&content) {
            Ok(config) => {
                info!(label, path = %path.display(), "loaded config");
                config
            }
            Err(e) => {
                warn!(label, path = %path.display(), error = %e, "failed to parse config, using defaults");
                T::default()
            }
        },
        Err(_) => {
            info!(label, path = %path.display(), "no config file, using defaults");
            T::default()
        }
    }
}

/// Generic save for any Serde config type.
pub fn save_json_config<T: Serialize>(
    path: &Path,
    config: &T,
    label: &str,
) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(ConfigError::CreateDir)?;
    }
    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(path, json).map_err(ConfigError::Write)?;
    info!(label, path = %path.display(), "saved config");
    Ok(())
}
