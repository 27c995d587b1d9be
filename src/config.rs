//! Application configuration.
//!
//! The configuration is loaded from a JSON file, by default
//! `$XDG_CONFIG_HOME/tilegrd/config.json`.  Every section is optional and
//! falls back to its compiled-in defaults.
//!
//! # Example
//!
//! ```json
//! {
//!   "drag": {
//!     "inner_zone_ratio": 0.9,
//!     "dwell_ms": 200,
//!     "grace_ms": 50
//!   },
//!   "grid": {
//!     "new_folder_title": "New Folder",
//!     "store_path": "/home/me/.local/share/tilegrd/items.json"
//!   }
//! }
//! ```

use crate::dropzone::DragConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration.
///
/// A minimal `{}` file is valid.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Drag-intent detection settings.
    #[serde(default)]
    pub drag: DragConfig,

    /// Grid contents and persistence settings.
    #[serde(default)]
    pub grid: GridConfig,
}

/// Grid contents and persistence settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Title given to a folder created by merging two shortcuts.
    pub new_folder_title: String,
    /// Where the shortcut list is stored.  `None` uses the data directory.
    pub store_path: Option<PathBuf>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            new_folder_title: "New Folder".into(),
            store_path: None,
        }
    }
}

impl Config {
    /// Load configuration from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError(format!("failed to read {}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| ConfigError(format!("failed to parse {}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the engine cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ratio = self.drag.inner_zone_ratio;
        if !(ratio > 0.0 && ratio <= 1.0) {
            return Err(ConfigError(format!(
                "drag.inner_zone_ratio must be in (0, 1], got {}",
                ratio
            )));
        }
        Ok(())
    }
}

/// Error from loading or parsing a configuration file.
#[derive(Debug, thiserror::Error)]
#[error("config error: {0}")]
pub struct ConfigError(String);
