//! Settings loaded from $HOME/.convey/settings.json.
//!
//! A missing file means defaults. The only knob today is an allow-list of
//! conventional commit types for the parse stage.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// User-level settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    /// Commit types the parser accepts; `None` accepts any word.
    #[serde(default)]
    pub types: Option<Vec<String>>,
}

impl Settings {
    /// Loads settings from the default location.
    pub fn load() -> Result<Self> {
        let settings_path = Self::settings_path()?;
        Self::load_from_path(&settings_path)
    }

    /// Loads settings from a specific path, defaulting when the file is absent.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse settings file: {}", path.display()))
    }

    /// Returns the default settings path.
    pub fn settings_path() -> Result<PathBuf> {
        let home_dir = dirs::home_dir().context("Failed to determine home directory")?;

        Ok(home_dir.join(".convey").join("settings.json"))
    }
}
