//! Heuristic content-type classification
//!
//! Rules are evaluated in a fixed order and the first match wins. URL rules
//! come before the structural link-density rule, so a catalogue page full of
//! links is still a `product_page`.

use crate::output::ContentType;
use url::Url;

/// Link density above which a page is treated as a list
pub const LIST_PAGE_LINK_DENSITY: f64 = 0.30;

/// Minimum word count for a tutorial
pub const TUTORIAL_MIN_WORDS: usize = 300;

const DOC_SEGMENTS: &[&str] = &["docs", "doc", "documentation", "manual", "reference"];
const ARTICLE_SEGMENTS: &[&str] = &["blog", "blogs", "article", "articles", "post", "posts", "news"];
const PRODUCT_SEGMENTS: &[&str] = &["product", "products", "catalogue", "catalog", "shop", "item", "items"];
const TUTORIAL_TITLE_MARKERS: &[&str] = &["tutorial", "guide", "how to", "how-to", "step-by-step", "walkthrough"];

/// The signals a classification rule may look at
#[derive(Debug, Clone, Copy)]
pub struct ClassificationInput<'a> {
    pub url: &'a Url,
    pub title: &'a str,
    pub body_text: &'a str,
    pub word_count: usize,
    pub link_density: f64,
}

/// One rule of the ordered classification chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassificationRule {
    /// A path segment names documentation
    DocsPath,
    /// A path segment names a blog or article
    ArticlePath,
    /// A path segment names a catalogue or product
    ProductPath,
    /// Link density above the list threshold
    HighLinkDensity,
    /// Long-form text with tutorial markers
    LongFormTutorial,
}

impl ClassificationRule {
    /// Evaluation order
    pub const ORDER: [ClassificationRule; 5] = [
        Self::DocsPath,
        Self::ArticlePath,
        Self::ProductPath,
        Self::HighLinkDensity,
        Self::LongFormTutorial,
    ];

    /// The label assigned when this rule matches
    pub fn content_type(&self) -> ContentType {
        match self {
            Self::DocsPath => ContentType::DocPage,
            Self::ArticlePath => ContentType::Article,
            Self::ProductPath => ContentType::ProductPage,
            Self::HighLinkDensity => ContentType::ListPage,
            Self::LongFormTutorial => ContentType::Tutorial,
        }
    }

    /// Returns true if the rule matches the input
    pub fn matches(&self, input: &ClassificationInput<'_>) -> bool {
        match self {
            Self::DocsPath => has_path_segment(input.url, DOC_SEGMENTS),
            Self::ArticlePath => has_path_segment(input.url, ARTICLE_SEGMENTS),
            Self::ProductPath => has_path_segment(input.url, PRODUCT_SEGMENTS),
            Self::HighLinkDensity => input.link_density > LIST_PAGE_LINK_DENSITY,
            Self::LongFormTutorial => {
                input.word_count > TUTORIAL_MIN_WORDS && has_tutorial_markers(input.title, input.body_text)
            }
        }
    }
}

/// Classifies a page; `Unclassified` when no rule matches
pub fn classify(input: &ClassificationInput<'_>) -> ContentType {
    ClassificationRule::ORDER
        .iter()
        .find(|rule| rule.matches(input))
        .map(|rule| rule.content_type())
        .unwrap_or(ContentType::Unclassified)
}

fn has_path_segment(url: &Url, names: &[&str]) -> bool {
    let Some(segments) = url.path_segments() else {
        return false;
    };

    segments.map(|s| s.to_ascii_lowercase()).any(|segment| {
        // `/docs/index.html` and `/blog.html` both count
        let stem = segment.split('.').next().unwrap_or("");
        names.contains(&segment.as_str()) || names.contains(&stem)
    })
}

fn has_tutorial_markers(title: &str, body_text: &str) -> bool {
    let title = title.to_lowercase();
    if TUTORIAL_TITLE_MARKERS.iter().any(|m| title.contains(m)) {
        return true;
    }

    let body = body_text.to_lowercase();
    body.contains("step 1") && body.contains("step 2")
}
