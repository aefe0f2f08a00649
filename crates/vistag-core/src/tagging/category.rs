//! The fixed set of tag categories.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Tag grouping. Declaration order is the order used in every output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Lighting,
    Setting,
    Style,
    Grain,
    Mood,
    Framing,
    Character,
    Emotions,
}

impl Category {
    /// All categories in output order.
    pub const ALL: [Category; 8] = [
        Category::Lighting,
        Category::Setting,
        Category::Style,
        Category::Grain,
        Category::Mood,
        Category::Framing,
        Category::Character,
        Category::Emotions,
    ];

    /// The JSON key for this category.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Lighting => "lighting",
            Category::Setting => "setting",
            Category::Style => "style",
            Category::Grain => "grain",
            Category::Mood => "mood",
            Category::Framing => "framing",
            Category::Character => "character",
            Category::Emotions => "emotions",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown tag category: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_as_str_matches_serde() {
        for category in Category::ALL {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.as_str()));
            assert_eq!(category.as_str().parse::<Category>().unwrap(), category);
        }
    }

    #[test]
    fn test_ordering_follows_declaration() {
        let mut shuffled = vec![Category::Emotions, Category::Lighting, Category::Mood];
        shuffled.sort();
        assert_eq!(
            shuffled,
            vec![Category::Lighting, Category::Mood, Category::Emotions]
        );
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        assert!("Mood".parse::<Category>().is_err());
        assert!("colour".parse::<Category>().is_err());
    }
}
