//! Outline configuration persistence
//!
//! Stores user preferences in `~/.config/codenav/config.yaml`

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::outline::BuildOptions;
use crate::theme::OutlinePalette;

/// Outline configuration that persists across sessions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineConfig {
    /// Show extracted doc comments as tooltips instead of signatures
    #[serde(default)]
    pub use_xml_comments: bool,
    /// Width of the outline panel when it has content
    #[serde(default = "default_panel_width")]
    pub panel_width: u32,
    /// Outline palette id (e.g., "default-dark", "default-light")
    #[serde(default = "default_palette")]
    pub palette: String,
}

fn default_panel_width() -> u32 {
    200
}

fn default_palette() -> String {
    "default-dark".to_string()
}

impl Default for OutlineConfig {
    fn default() -> Self {
        Self {
            use_xml_comments: false,
            panel_width: default_panel_width(),
            palette: default_palette(),
        }
    }
}

impl OutlineConfig {
    /// Load config from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// Load from an explicit path; any failure degrades to defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse config at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read config at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save config to disk
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> Result<(), String> {
        let path = crate::config_paths::config_file()
            .ok_or_else(|| "No config directory available".to_string())?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        let content = serde_yaml::to_string(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        std::fs::write(path, content)
            .map_err(|e| format!("Failed to write config to {}: {}", path.display(), e))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Resolve the configured palette
    pub fn outline_palette(&self) -> OutlinePalette {
        OutlinePalette::load(&self.palette)
    }

    /// Options handed to each outline build
    pub fn build_options(&self, palette: &OutlinePalette) -> BuildOptions {
        BuildOptions {
            use_xml_comments: self.use_xml_comments,
            palette: palette.clone(),
        }
    }
}
