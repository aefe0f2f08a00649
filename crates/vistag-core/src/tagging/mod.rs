//! Structured tagging: categories, per-image documents and the corpus
//! aggregate.
//!
//! Each tagged image yields a [`TagDocument`] mapping categories to weighted
//! entries. Documents are folded into a [`TagAggregate`] in processing order
//! and finalized once into a [`TagSummary`] with unique, weight-ranked tags.

pub mod aggregate;
pub mod category;
pub mod document;

pub use aggregate::{aggregate_tags, TagAggregate, TagSummary};
pub use category::Category;
pub use document::TagDocument;
