//! Document enrichment
//!
//! Turns extracted content into a fully populated [`Document`]. Every signal
//! degrades to a default on its own; enrichment itself cannot fail.

mod classify;
mod code;
mod language;

pub use classify::{classify, ClassificationInput, ClassificationRule, LIST_PAGE_LINK_DENSITY};
pub use code::looks_like_code;
pub use language::{detect_language, UNKNOWN_LANGUAGE};

use crate::extract::ExtractedContent;
use crate::output::Document;
use chrono::{DateTime, Utc};
use url::Url;

/// Reading speed used for `estimated_read_time_minutes`
pub const WORDS_PER_MINUTE: f64 = 200.0;

/// Builds the output document for one page
///
/// # Arguments
///
/// * `extracted` - Extractor output for the page
/// * `url` - Normalized URL the page was crawled under
/// * `http_status` - Status of the successful response
/// * `depth` - Crawl depth of the task
/// * `fetched_at` - When the response was received
pub fn enrich(
    extracted: &ExtractedContent,
    url: &Url,
    http_status: u16,
    depth: u32,
    fetched_at: DateTime<Utc>,
) -> Document {
    let body_text = extracted.body_text.clone();
    let word_count = body_text.split_whitespace().count();
    let char_count = body_text.chars().count();

    let language = detect_language(&body_text);
    let has_code_blocks = extracted.has_code_markup || looks_like_code(&body_text);

    let content_type = classify(&ClassificationInput {
        url,
        title: &extracted.title,
        body_text: &body_text,
        word_count,
        link_density: extracted.link_density,
    });

    Document {
        url: url.to_string(),
        title: extracted.title.clone(),
        body_text,
        word_count,
        char_count,
        language,
        content_type,
        fetched_at,
        estimated_read_time_minutes: round_to(word_count as f64 / WORDS_PER_MINUTE, 2),
        has_code_blocks,
        link_density: round_to(extracted.link_density, 3),
        paragraph_count: extracted.paragraph_count,
        http_status,
        crawl_depth: depth,
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
