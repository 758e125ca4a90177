use crate::error::SpeakpadResult;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Speech
    pub engine: String,
    /// Words per minute
    pub speech_rate: u32,

    // Meta
    pub log_level: String,

    // Window
    #[serde(default = "default_window_width")]
    pub window_width: f32,
    #[serde(default = "default_window_height")]
    pub window_height: f32,
}

fn default_window_width() -> f32 {
    720.0
}

fn default_window_height() -> f32 {
    480.0
}

impl Default for Config {
    fn default() -> Self {
        Self {
            engine: "espeak-ng".to_string(),
            speech_rate: 175,
            log_level: "INFO".to_string(),
            window_width: default_window_width(),
            window_height: default_window_height(),
        }
    }
}

impl Config {
    /// Load config from the default location, or fall back to defaults
    pub fn load() -> SpeakpadResult<Self> {
        Self::load_from(&config_path())
    }

    pub fn load_from(config_path: &Path) -> SpeakpadResult<Self> {
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(config_path)?;
        match serde_json::from_str(&content) {
            Ok(config) => Ok(config),
            Err(e) => {
                // Graceful degradation: log warning and use defaults
                tracing::warn!("⚠️ Config file corrupted or invalid, using defaults: {}", e);
                let backup_path = config_path.with_extension("json.corrupt");
                let _ = std::fs::rename(config_path, &backup_path);
                Ok(Self::default())
            }
        }
    }

    /// Save config to the default location
    pub fn save(&self) -> SpeakpadResult<()> {
        self.save_to(&config_path())
    }

    pub fn save_to(&self, config_path: &Path) -> SpeakpadResult<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    /// `tracing` filter directive for the configured level
    pub fn log_filter(&self) -> String {
        self.log_level.to_lowercase()
    }
}

pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("speakpad")
        .join("config.json")
}
