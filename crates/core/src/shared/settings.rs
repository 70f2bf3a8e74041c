use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::output::domain::output_format::OutputFormat;

use super::constants::{DEFAULT_OUTPUT_DIR, DEFAULT_SIMILARITY_THRESHOLD, DEFAULT_WHISPER_MODEL};

/// User defaults persisted between runs. Command-line flags override them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_threshold")]
    pub similarity_threshold: f64,
    #[serde(default = "default_model")]
    pub whisper_model: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default = "default_formats")]
    pub output_formats: Vec<OutputFormat>,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_threshold() -> f64 {
    DEFAULT_SIMILARITY_THRESHOLD
}

fn default_model() -> String {
    DEFAULT_WHISPER_MODEL.to_string()
}

fn default_formats() -> Vec<OutputFormat> {
    OutputFormat::ALL.to_vec()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(DEFAULT_OUTPUT_DIR)
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            similarity_threshold: default_threshold(),
            whisper_model: default_model(),
            language: None,
            output_formats: default_formats(),
            output_dir: default_output_dir(),
        }
    }
}

impl Settings {
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("Karaoke Sync").join("settings.json"))
    }

    /// Loads from the platform config directory; defaults when absent or
    /// unreadable.
    pub fn load() -> Self {
        Self::config_path()
            .map(|path| Self::load_from(&path))
            .unwrap_or_default()
    }

    pub fn load_from(path: &Path) -> Self {
        let settings = fs::read_to_string(path)
            .ok()
            .and_then(|json| match serde_json::from_str::<Settings>(&json) {
                Ok(s) => Some(s),
                Err(e) => {
                    log::warn!("Ignoring malformed settings at {}: {e}", path.display());
                    None
                }
            })
            .unwrap_or_default();
        settings.sanitized()
    }

    pub fn save(&self) {
        if let Some(path) = Self::config_path() {
            if let Err(e) = self.save_to(&path) {
                log::warn!("Failed to save settings: {e}");
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        fs::write(path, json)
    }

    fn sanitized(mut self) -> Self {
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            self.similarity_threshold = default_threshold();
        }
        if self.output_formats.is_empty() {
            self.output_formats = default_formats();
        }
        self
    }
}
