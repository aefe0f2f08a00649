//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    ///
    /// Run again after command-line overrides are folded in.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.processing.supported_formats.is_empty() {
            return Err(ConfigError::ValidationError(
                "processing.supported_formats must not be empty".into(),
            ));
        }
        if self.processing.caption_max_tokens == Some(0) {
            return Err(ConfigError::ValidationError(
                "processing.caption_max_tokens must be > 0 when set".into(),
            ));
        }
        if self.processing.tag_max_tokens == Some(0) {
            return Err(ConfigError::ValidationError(
                "processing.tag_max_tokens must be > 0 when set".into(),
            ));
        }
        if self.limits.llm_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "limits.llm_timeout_ms must be > 0".into(),
            ));
        }
        if self.paths.aggregate_file.is_empty() {
            return Err(ConfigError::ValidationError(
                "paths.aggregate_file must not be empty".into(),
            ));
        }
        let images = self.images_dir();
        if self.captions_dir() == images || self.tags_dir() == images {
            return Err(ConfigError::ValidationError(
                "paths.captions_dir and paths.tags_dir must differ from paths.images_dir".into(),
            ));
        }
        Ok(())
    }
}
