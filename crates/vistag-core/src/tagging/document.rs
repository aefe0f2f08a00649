//! Parsing a model reply into a per-image tag document.

use super::Category;
use crate::error::{PipelineError, PipelineResult};
use crate::types::TagEntry;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

/// One image's tags, as returned by the model.
///
/// The raw JSON is kept verbatim for persistence (unknown keys included);
/// only the known categories are extracted for aggregation.
#[derive(Debug, Clone)]
pub struct TagDocument {
    raw: Value,
    entries: BTreeMap<Category, Vec<TagEntry>>,
}

impl TagDocument {
    /// Strictly decode `text` as JSON.
    ///
    /// The whole reply must be one JSON value; nothing is extracted from
    /// surrounding prose. Missing categories are fine. A category that is
    /// present must be a list of `{tag, weight}` objects, otherwise the
    /// document is rejected rather than coerced.
    pub fn parse(path: &Path, text: &str) -> PipelineResult<Self> {
        let raw: Value = serde_json::from_str(text).map_err(|e| PipelineError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let mut entries = BTreeMap::new();
        if let Value::Object(map) = &raw {
            for (key, value) in map {
                // Keys outside the fixed categories are kept in `raw` only.
                let Ok(category) = key.parse::<Category>() else {
                    continue;
                };
                let tags: Vec<TagEntry> = serde_json::from_value(value.clone()).map_err(|e| {
                    PipelineError::MalformedTags {
                        path: path.to_path_buf(),
                        category: category.to_string(),
                        message: e.to_string(),
                    }
                })?;
                entries.insert(category, tags);
            }
        } else {
            tracing::debug!("Tag document for {:?} is not a JSON object", path);
        }

        Ok(Self { raw, entries })
    }

    /// The document exactly as decoded.
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// Entries for one category; empty when the category was absent.
    pub fn entries(&self, category: Category) -> &[TagEntry] {
        self.entries
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Categories present in the document, in category order.
    pub fn categories(&self) -> impl Iterator<Item = (Category, &[TagEntry])> {
        self.entries.iter().map(|(c, e)| (*c, e.as_slice()))
    }

    /// Total number of entries across categories.
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
