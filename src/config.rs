//! User configuration and preferences

use crate::domain::{Action, Direction};
use crate::error::{Result, SortieError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Which action each swipe direction triggers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwipeConfig {
    pub up: Action,
    pub down: Action,
    pub left: Action,
    pub right: Action,
}

impl Default for SwipeConfig {
    fn default() -> Self {
        Self {
            up: Action::Skip,
            down: Action::Delete,
            left: Action::move_to("B-Roll"),
            right: Action::move_to("A-Roll"),
        }
    }
}

impl SwipeConfig {
    pub fn action_for(&self, direction: Direction) -> &Action {
        match direction {
            Direction::Up => &self.up,
            Direction::Down => &self.down,
            Direction::Left => &self.left,
            Direction::Right => &self.right,
        }
    }

    pub fn set(&mut self, direction: Direction, action: Action) {
        match direction {
            Direction::Up => self.up = action,
            Direction::Down => self.down = action,
            Direction::Left => self.left = action,
            Direction::Right => self.right = action,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct UserConfig {
    /// Whether the welcome dialog has been shown
    #[serde(default)]
    pub welcome_shown: bool,

    #[serde(default)]
    pub swipe: SwipeConfig,
}

impl UserConfig {
    /// Get the config file path (~/.config/sortie/config.json)
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("sortie").join("config.json"))
    }

    /// Load config from the default location, or defaults if it doesn't exist
    pub fn load() -> Result<Self> {
        let path = Self::config_path().ok_or_else(|| {
            SortieError::ConfigError("Could not determine config directory".to_string())
        })?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).map_err(|e| {
            SortieError::ConfigError(format!("Failed to read config file: {}", e))
        })?;

        let config = serde_json::from_str(&contents).map_err(|e| {
            SortieError::ConfigError(format!("Failed to parse config file: {}", e))
        })?;

        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Writes to a sibling temp file, then renames it over `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                SortieError::ConfigError(format!("Failed to create config directory: {}", e))
            })?;
        }

        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            SortieError::ConfigError(format!("Failed to serialize config: {}", e))
        })?;

        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, contents).map_err(|e| {
            SortieError::ConfigError(format!("Failed to write config file: {}", e))
        })?;

        fs::rename(&temp_path, path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            SortieError::ConfigError(format!("Failed to replace config file: {}", e))
        })?;

        info!("Saved config to {}", path.display());
        Ok(())
    }
}
