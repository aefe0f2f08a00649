//! Command implementations.

pub mod caption;
pub mod config;
mod setup;
pub mod tag;
mod types;

pub use types::LlmProvider;

use clap::Args;
use std::path::PathBuf;

/// Arguments shared by the `caption` and `tag` commands.
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Directory of images to process (overrides paths.images_dir)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output directory (overrides paths.captions_dir or paths.tags_dir)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// LLM provider (overrides llm.provider)
    #[arg(long, value_enum)]
    pub llm: Option<LlmProvider>,

    /// Model name (provider-specific)
    #[arg(long)]
    pub model: Option<String>,
}
