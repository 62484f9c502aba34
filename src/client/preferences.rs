//! Persisted display preferences
//!
//! Stored as TOML at `<config dir>/boardsync/preferences.toml`. A missing
//! file means defaults.

use crate::client::error::ClientError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "boardsync";
const FILE_NAME: &str = "preferences.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub dark_mode: bool,
}

impl Preferences {
    /// Platform-specific location of the preferences file
    pub fn default_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(std::env::temp_dir);
        path.push(APP_DIR);
        path.push(FILE_NAME);
        path
    }

    pub fn load() -> Result<Self, ClientError> {
        Self::load_from(&Self::default_path())
    }

    pub fn load_from(path: &Path) -> Result<Self, ClientError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|e| {
            ClientError::Preferences(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ClientError> {
        toml::from_str(content).map_err(|e| ClientError::Preferences(e.to_string()))
    }

    pub fn save(&self) -> Result<(), ClientError> {
        self.save_to(&Self::default_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ClientError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ClientError::Preferences(format!("failed to create {}: {}", parent.display(), e))
            })?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| ClientError::Preferences(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| {
            ClientError::Preferences(format!("failed to write {}: {}", path.display(), e))
        })?;
        tracing::debug!("[Preferences] Saved to {}", path.display());
        Ok(())
    }

    pub fn toggle_dark_mode(&mut self) -> bool {
        self.dark_mode = !self.dark_mode;
        self.dark_mode
    }
}
