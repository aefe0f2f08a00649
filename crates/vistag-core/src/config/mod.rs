//! Configuration management for vistag.
//!
//! Configuration is loaded from the platform config directory (or an explicit
//! path) with defaults that reproduce the original fixed layout: `images/` in,
//! `captions/` and `tags/` out, system messages next to the working directory.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure for vistag.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Input and output locations
    pub paths: PathsConfig,

    /// System-message files and user prompts
    pub prompts: PromptsConfig,

    /// Processing settings
    pub processing: ProcessingConfig,

    /// Transport limits
    pub limits: LimitsConfig,

    /// Logging settings
    pub logging: LoggingConfig,

    /// LLM provider settings
    pub llm: LlmConfig,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// Uses platform-appropriate directories:
    /// - macOS: ~/Library/Application Support/com.vistag.vistag/config.toml
    /// - Linux: ~/.config/vistag/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\vistag\config\config.toml
    ///
    /// Falls back to ~/.vistag/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "vistag", "vistag")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".vistag").join("config.toml")
            })
    }

    /// Directory scanned for input images.
    pub fn images_dir(&self) -> PathBuf {
        expand(&self.paths.images_dir)
    }

    /// Directory receiving one `.txt` caption per image.
    pub fn captions_dir(&self) -> PathBuf {
        expand(&self.paths.captions_dir)
    }

    /// Directory receiving one `.json` tag document per image.
    pub fn tags_dir(&self) -> PathBuf {
        expand(&self.paths.tags_dir)
    }

    /// Path of the corpus-level aggregate, inside the tags directory.
    pub fn aggregate_path(&self) -> PathBuf {
        self.tags_dir().join(&self.paths.aggregate_file)
    }

    /// Read the captioner's system instruction.
    pub fn caption_system_message(&self) -> Result<String, ConfigError> {
        read_system_message(&expand(&self.prompts.caption_system_file))
    }

    /// Read the tagger's system instruction.
    pub fn tag_system_message(&self) -> Result<String, ConfigError> {
        read_system_message(&expand(&self.prompts.tag_system_file))
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}

fn expand(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}

fn read_system_message(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|e| ConfigError::MissingSystemMessage {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
