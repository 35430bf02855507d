//! Configuration management for sigye-rs.
//!
//! Loads config from YAML files in standard locations. Every section and
//! field is optional; anything missing takes its default.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    pub enabled: bool,
    /// "espeak-ng", "spd-say" or "none"
    pub backend: String,
    pub locale: String,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            backend: "espeak-ng".into(),
            locale: "ko-KR".into(),
            rate: 0.8,
            pitch: 1.2,
            volume: 1.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub use_24_hour: bool,
    pub tick_interval_ms: u64,
    /// Font with Hangul glyphs; common system locations are tried if unset.
    pub font_path: Option<PathBuf>,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            use_24_hour: false,
            tick_interval_ms: 1000,
            font_path: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 860.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FeedbackConfig {
    pub notifications: bool,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            notifications: true,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub speech: SpeechConfig,
    pub display: DisplayConfig,
    pub window: WindowConfig,
    pub feedback: FeedbackConfig,
}

impl Config {
    /// Load configuration from YAML file.
    ///
    /// Searches standard locations if no path is provided:
    /// 1. ./config.yaml
    /// 2. ~/.config/sigye/config.yaml
    /// 3. /etc/sigye/config.yaml
    pub fn load(path: Option<&Path>) -> Self {
        let resolved = path.map(PathBuf::from).or_else(|| {
            let candidates = [
                std::env::current_dir().ok().map(|d| d.join("config.yaml")),
                dirs::home_dir().map(|h| h.join(".config/sigye/config.yaml")),
                Some(PathBuf::from("/etc/sigye/config.yaml")),
            ];
            candidates.into_iter().flatten().find(|p| p.exists())
        });

        let Some(config_path) = resolved else {
            info!("No config file found, using defaults");
            return Self::default();
        };

        match std::fs::read_to_string(&config_path) {
            Ok(contents) => match serde_yml::from_str(&contents) {
                Ok(config) => {
                    info!("Loaded config from {}", config_path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse {}: {e}, using defaults", config_path.display());
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read {}: {e}, using defaults", config_path.display());
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "speech:\n  backend: spd-say\n  rate: 1.0\ndisplay:\n  use_24_hour: true").unwrap();

        let config = Config::load(Some(file.path()));
        assert_eq!(config.speech.backend, "spd-say");
        assert_eq!(config.speech.rate, 1.0);
        assert_eq!(config.speech.pitch, 1.2);
        assert_eq!(config.speech.locale, "ko-KR");
        assert!(config.display.use_24_hour);
        assert_eq!(config.display.tick_interval_ms, 1000);
        assert!(config.feedback.notifications);
    }

    #[test]
    fn unparsable_file_falls_back_to_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "speech: [not, a, map").unwrap();

        let config = Config::load(Some(file.path()));
        assert_eq!(config.speech.backend, "espeak-ng");
        assert!(!config.display.use_24_hour);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(Some(dir.path().join("absent.yaml").as_path()));
        assert_eq!(config.window.width, 1280.0);
        assert!(config.speech.enabled);
    }
}
