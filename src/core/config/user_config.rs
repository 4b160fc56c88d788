//! User configuration file handling
//!
//! Manages settings from ~/.config/fontmerge/settings.json

use crate::logging;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// User configuration from ~/.config/fontmerge/settings.json
///
/// These settings override built-in defaults but are overridden by CLI arguments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ConfigFile {
    /// Log level for the fontmerge crate (e.g., "info", "debug")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
    /// Warn when a glyph exists in both merged fonts
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warn_about_duplicates: Option<bool>,
    /// Kern type used by the kerning commands when none is given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_kern_type: Option<String>,
    /// Indent JSON output
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pretty_output: Option<bool>,
}

impl ConfigFile {
    /// Get the path to the user config file
    pub fn config_path() -> PathBuf {
        logging::config_dir().join("settings.json")
    }

    /// Load configuration from the user config file
    pub fn load() -> anyhow::Result<Option<Self>> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from `path`. A missing file is `Ok(None)`; a file
    /// that cannot be read or parsed is an error.
    pub fn load_from(path: &Path) -> anyhow::Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        debug!("Loaded user settings from {:?}", path);
        Ok(Some(config))
    }

    /// Save configuration to `path`
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)?;

        debug!("Saved settings to {:?}", path);
        Ok(())
    }

    /// The settings file written by `init-config`
    pub fn example() -> Self {
        Self {
            log_level: Some("info".to_string()),
            warn_about_duplicates: Some(true),
            default_kern_type: Some("kern".to_string()),
            pretty_output: Some(true),
        }
    }

    /// Initialize the complete user configuration directory
    ///
    /// This creates:
    /// 1. The ~/.config/fontmerge directory structure
    /// 2. A settings.json file with default values
    /// 3. A logs/ directory for log files
    pub fn initialize_config_directory() -> anyhow::Result<()> {
        Self::initialize_in(&logging::config_dir())
    }

    pub fn initialize_in(config_dir: &Path) -> anyhow::Result<()> {
        fs::create_dir_all(config_dir)?;
        println!("Created config directory: {:?}", config_dir);

        let logs_dir = config_dir.join("logs");
        fs::create_dir_all(&logs_dir)?;
        println!("Created logs directory: {:?}", logs_dir);

        let settings_path = config_dir.join("settings.json");
        if !settings_path.exists() {
            Self::example().save_to(&settings_path)?;
            println!("Created settings file: {:?}", settings_path);
        } else {
            println!("Settings file already exists: {:?}", settings_path);
        }

        println!("\nConfiguration initialized successfully!");
        println!("  - Edit settings at: {:?}", settings_path);
        println!("  - Log files (with --log-file) in: {:?}", logs_dir);

        Ok(())
    }
}
