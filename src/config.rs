use crate::error::{DualsubError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Demuxer used to identify tracks (`mkvmerge -J`).
    pub mkvmerge: String,
    /// Extraction tool (`mkvextract tracks ...`).
    pub mkvextract: String,
    /// Color applied to the first subtitle of a merge.
    pub color1: String,
    /// Color applied to the second subtitle of a merge.
    pub color2: String,
    /// Subfolder of the batch directory that receives extracted tracks.
    pub tracks_dir: String,
    pub show_progress: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mkvmerge: "mkvmerge".to_string(),
            mkvextract: "mkvextract".to_string(),
            color1: "white".to_string(),
            color2: "yellow".to_string(),
            tracks_dir: "tracks".to_string(),
            show_progress: true,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        // Load from config file if it exists
        if let Some(config_path) = Self::config_file_path() {
            if config_path.exists() {
                config = Self::from_file(&config_path)?;
            }
        }

        // Override with environment variables
        if let Ok(tool) = std::env::var("DUALSUB_MKVMERGE") {
            config.mkvmerge = tool;
        }
        if let Ok(tool) = std::env::var("DUALSUB_MKVEXTRACT") {
            config.mkvextract = tool;
        }
        if let Ok(color) = std::env::var("DUALSUB_COLOR1") {
            config.color1 = color;
        }
        if let Ok(color) = std::env::var("DUALSUB_COLOR2") {
            config.color2 = color;
        }
        if let Ok(dir) = std::env::var("DUALSUB_TRACKS_DIR") {
            config.tracks_dir = dir;
        }

        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents).map_err(|e| {
            DualsubError::Config(format!("{}: {}", path.display(), e.message()))
        })
    }

    pub fn validate(&self) -> Result<()> {
        if self.mkvmerge.trim().is_empty() || self.mkvextract.trim().is_empty() {
            return Err(DualsubError::Config(
                "Tool names must not be empty".to_string(),
            ));
        }

        if self.color1.trim().is_empty() || self.color2.trim().is_empty() {
            return Err(DualsubError::Config(
                "Subtitle colors must not be empty".to_string(),
            ));
        }

        let tracks_dir = Path::new(&self.tracks_dir);
        if self.tracks_dir.trim().is_empty()
            || tracks_dir.is_absolute()
            || tracks_dir
                .components()
                .any(|c| matches!(c, Component::ParentDir))
        {
            return Err(DualsubError::Config(format!(
                "tracks_dir must be a relative subfolder, got '{}'",
                self.tracks_dir
            )));
        }

        Ok(())
    }

    fn config_file_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("dualsub").join("config.toml"))
    }
}
