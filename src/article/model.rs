use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: u64,
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    /// Markdown source; rendering happens in the browser.
    pub body: String,
    pub category: String,
    pub tags: Vec<String>,
    pub featured: bool,
    pub view_count: u64,
    pub published_at: DateTime<Utc>,
}

impl Article {
    pub fn has_tag_like(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.tags.iter().any(|t| t.to_lowercase().contains(&needle))
    }

    /// Case-insensitive match over title, excerpt and tags.
    pub fn matches_text(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.title.to_lowercase().contains(&needle)
            || self.excerpt.to_lowercase().contains(&needle)
            || self.has_tag_like(&needle)
    }
}

/// Glossary entry shown on the terms page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Term {
    pub id: u64,
    pub name: String,
    pub definition: String,
    pub category: String,
}
