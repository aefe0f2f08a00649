//! vistag core - batch image captioning and weighted tag aggregation.
//!
//! Two sequential pipelines share one shape: scan a directory, send each image
//! to a vision LLM with a fixed system instruction and prompt, persist the
//! reply next to its siblings.
//!
//! ```text
//! images/*.jpg ─┬─ Captioner → captions/<stem>.txt
//!               └─ Tagger    → tags/<stem>.json ─→ TagAggregate → tags/aggregated_tags.json
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use vistag_core::{Config, FileDiscovery, LlmProviderFactory, TagOptions, Tagger};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     let provider = LlmProviderFactory::create(
//!         &config.llm.provider,
//!         &config.llm,
//!         None,
//!         std::time::Duration::from_millis(config.limits.llm_timeout_ms),
//!     )?;
//!     let tagger = Tagger::new(provider, TagOptions::from_config(&config)?);
//!
//!     let files = FileDiscovery::new(&config.processing).discover(&config.images_dir());
//!     let run = tagger.run(&files, |_, _| {}).await;
//!     println!("{}", serde_json::to_string_pretty(&run.summary)?);
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod config;
pub mod error;
pub mod llm;
pub mod output;
pub mod pipeline;
pub mod tagging;
pub mod types;

// Re-exports for convenient access
pub use config::Config;
pub use error::{ConfigError, PipelineError, PipelineResult};
pub use llm::{ImageInput, LlmProvider, LlmProviderFactory, LlmRequest, LlmResponse};
pub use pipeline::{
    CaptionOptions, Captioner, DiscoveredFile, FileDiscovery, TagOptions, TagRun, Tagger,
};
pub use tagging::{aggregate_tags, Category, TagAggregate, TagDocument, TagSummary};
pub use types::{BatchReport, CaptionOutcome, TagEntry};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
