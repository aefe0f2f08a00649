//! Batch pipelines.
//!
//! - **discovery**: Find image files in the input directory
//! - **captioner**: Image → free-text caption file
//! - **tagger**: Image → tag document file, folded into the corpus aggregate

pub mod captioner;
pub mod discovery;
pub mod tagger;

// Re-exports for convenient access
pub use captioner::{CaptionOptions, Captioner};
pub use discovery::{DiscoveredFile, FileDiscovery};
pub use tagger::{TagOptions, TagRun, Tagger};
