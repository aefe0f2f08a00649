//! Corpus-level tag aggregation.

use super::{Category, TagDocument};
use crate::types::TagEntry;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

/// Collapse repeated tag names and rank by weight.
///
/// Entries are folded in input order: the first occurrence of a name records
/// its weight, every later occurrence replaces the stored weight with
/// `(stored + incoming) / 2`. This is a pairwise fold, not a mean: `w1, w2, w3`
/// yields `((w1 + w2) / 2 + w3) / 2`, so later occurrences count more.
///
/// The result is sorted by weight descending. The sort is stable, so equal
/// weights keep first-occurrence order.
pub fn aggregate_tags(entries: &[TagEntry]) -> Vec<TagEntry> {
    let mut folded: Vec<TagEntry> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for entry in entries {
        match index.get(entry.tag.as_str()) {
            Some(&i) => {
                let stored = folded[i].weight;
                folded[i].set_weight((stored + entry.weight) / 2.0);
            }
            None => {
                index.insert(entry.tag.as_str(), folded.len());
                folded.push(entry.clone());
            }
        }
    }

    // `-0.0` and `0.0` compare equal here, so they keep input order too.
    folded.sort_by(|a, b| b.weight.partial_cmp(&a.weight).unwrap_or(Ordering::Equal));
    folded
}

/// Working aggregate built while a batch runs.
#[derive(Debug, Clone, Default)]
pub struct TagAggregate {
    working: BTreeMap<Category, Vec<TagEntry>>,
}

impl TagAggregate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a document's entries, category by category.
    pub fn merge(&mut self, document: &TagDocument) {
        for (category, entries) in document.categories() {
            self.working
                .entry(category)
                .or_default()
                .extend_from_slice(entries);
        }
    }

    /// Raw (not yet deduplicated) entries collected for a category.
    pub fn entries(&self, category: Category) -> &[TagEntry] {
        self.working
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Deduplicate and rank every category. Categories without entries are
    /// left out of the summary.
    pub fn finalize(&self) -> TagSummary {
        TagSummary(
            self.working
                .iter()
                .filter(|(_, entries)| !entries.is_empty())
                .map(|(category, entries)| (*category, aggregate_tags(entries)))
                .collect(),
        )
    }
}

/// Final aggregate: per category, unique tags ranked by weight.
///
/// Serializes as a JSON object keyed by category name, in category order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagSummary(BTreeMap<Category, Vec<TagEntry>>);

impl TagSummary {
    pub fn get(&self, category: Category) -> Option<&[TagEntry]> {
        self.0.get(&category).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &[TagEntry])> {
        self.0.iter().map(|(c, e)| (*c, e.as_slice()))
    }
}
