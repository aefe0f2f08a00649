//! Error types for the vistag batch pipelines.
//!
//! Startup problems (configuration, missing system messages, credentials) are
//! [`ConfigError`]s and abort the run. Everything that can go wrong with a
//! single image is a [`PipelineError`]; the batch loop logs it, skips that
//! image and moves on.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration-specific errors. All of these are fatal at startup.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),

    /// A system-message file could not be read
    #[error("System message file {path} could not be read: {message}")]
    MissingSystemMessage { path: PathBuf, message: String },

    /// No API key resolved for a provider that needs one
    #[error("{provider} API key not set. Set the {env} env var or llm.{provider}.api_key.")]
    MissingApiKey { provider: String, env: String },

    /// Provider name not recognized
    #[error("Unknown LLM provider: {0}")]
    UnknownProvider(String),
}

/// Per-image errors, one variant per failure class.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The inference service failed or returned nothing usable
    #[error("LLM error: {message}")]
    Llm {
        message: String,
        status_code: Option<u16>,
    },

    /// The reply was not valid JSON
    #[error("Error parsing JSON response for {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// The reply parsed but a category entry lacks `tag` or `weight`
    #[error("Malformed '{category}' tags for {path}: {message}")]
    MalformedTags {
        path: PathBuf,
        category: String,
        message: String,
    },

    /// Reading the image failed
    #[error("Failed to read {path}: {message}")]
    Read { path: PathBuf, message: String },

    /// Writing an output file failed
    #[error("Failed to write {path}: {message}")]
    Write { path: PathBuf, message: String },

    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),
}

impl PipelineError {
    /// Build a `Write` error from an I/O failure.
    pub(crate) fn write(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        Self::Write {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

/// Convenience type alias for pipeline-specific results.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
