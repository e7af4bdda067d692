//! The durable output record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Heuristic page category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    DocPage,
    Article,
    ProductPage,
    ListPage,
    Tutorial,
    Unclassified,
}

impl ContentType {
    /// Returns the serialized name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DocPage => "doc_page",
            Self::Article => "article",
            Self::ProductPage => "product_page",
            Self::ListPage => "list_page",
            Self::Tutorial => "tutorial",
            Self::Unclassified => "unclassified",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One enriched page, as written to the output file
///
/// Every field is always present; absent signals use defaults such as
/// `"unknown"` for the language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub url: String,
    pub title: String,
    pub body_text: String,
    pub word_count: usize,
    pub char_count: usize,
    /// ISO 639-1 code or `"unknown"`
    pub language: String,
    pub content_type: ContentType,
    /// RFC 3339, UTC
    pub fetched_at: DateTime<Utc>,
    pub estimated_read_time_minutes: f64,
    pub has_code_blocks: bool,
    pub link_density: f64,
    pub paragraph_count: usize,
    pub http_status: u16,
    pub crawl_depth: u32,
}
