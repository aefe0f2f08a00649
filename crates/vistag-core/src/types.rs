//! Core data types shared by the pipelines.

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use std::path::PathBuf;

/// One weighted tag as emitted by the model.
///
/// `weight` is whatever confidence or intensity score the model chose; no
/// range is enforced. A weight the model wrote as an integer is written back
/// as an integer until it is averaged.
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "WireTagEntry")]
pub struct TagEntry {
    /// Tag label (e.g., "soft daylight", "cork footbed")
    pub tag: String,

    /// Model-supplied weight
    pub weight: f64,

    integral: bool,
}

impl TagEntry {
    pub fn new(tag: impl Into<String>, weight: f64) -> Self {
        Self {
            tag: tag.into(),
            weight,
            integral: false,
        }
    }

    /// Replace the weight with a computed value.
    pub fn set_weight(&mut self, weight: f64) {
        self.weight = weight;
        self.integral = false;
    }
}

impl PartialEq for TagEntry {
    fn eq(&self, other: &Self) -> bool {
        self.tag == other.tag && self.weight == other.weight
    }
}

impl Serialize for TagEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("TagEntry", 2)?;
        state.serialize_field("tag", &self.tag)?;
        // 2^53: beyond this an f64 no longer holds every integer exactly.
        let exact = self.weight.fract() == 0.0 && self.weight.abs() <= 9_007_199_254_740_992.0;
        if self.integral && exact {
            state.serialize_field("weight", &(self.weight as i64))?;
        } else {
            state.serialize_field("weight", &self.weight)?;
        }
        state.end()
    }
}

#[derive(Deserialize)]
struct WireTagEntry {
    tag: String,
    weight: serde_json::Number,
}

impl From<WireTagEntry> for TagEntry {
    fn from(wire: WireTagEntry) -> Self {
        Self {
            tag: wire.tag,
            weight: wire.weight.as_f64().unwrap_or_default(),
            integral: !wire.weight.is_f64(),
        }
    }
}

/// A caption written to disk.
#[derive(Debug, Clone)]
pub struct CaptionOutcome {
    /// Source image
    pub image: PathBuf,
    /// Caption file written
    pub output: PathBuf,
    /// The caption text
    pub text: String,
}

/// Counts for one batch run. Failed images carry their error message.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// Images fully processed
    pub succeeded: usize,

    /// Images skipped, with the reason
    pub failed: Vec<(PathBuf, String)>,
}

impl BatchReport {
    /// Total images attempted.
    pub fn total(&self) -> usize {
        self.succeeded + self.failed.len()
    }
}
