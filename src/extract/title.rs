//! Title extraction

use super::content::collapse_whitespace;
use scraper::{Html, Selector};

/// Title sources, tried in order; the first non-empty value wins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleSource {
    /// `<title>` text
    TitleElement,
    /// Text of the first `<h1>`
    FirstHeading,
    /// `<meta property="og:title" content="...">`
    OpenGraph,
}

impl TitleSource {
    /// Evaluation order
    pub const ORDER: [TitleSource; 3] = [Self::TitleElement, Self::FirstHeading, Self::OpenGraph];

    /// Reads this source from the document, if it yields non-empty text
    pub fn read(&self, document: &Html) -> Option<String> {
        let raw = match self {
            Self::TitleElement => first_text(document, "title"),
            Self::FirstHeading => first_text(document, "h1"),
            Self::OpenGraph => {
                let selector = Selector::parse(r#"meta[property="og:title"]"#).ok()?;
                document
                    .select(&selector)
                    .find_map(|el| el.value().attr("content"))
                    .map(str::to_string)
            }
        }?;

        let title = collapse_whitespace(&raw);
        if title.is_empty() {
            None
        } else {
            Some(title)
        }
    }
}

fn first_text(document: &Html, css: &str) -> Option<String> {
    let selector = Selector::parse(css).ok()?;
    document
        .select(&selector)
        .next()
        .map(|element| element.text().collect::<String>())
}

/// Extracts the page title, or an empty string when no source yields one
pub fn extract_title(document: &Html) -> String {
    TitleSource::ORDER
        .iter()
        .find_map(|source| source.read(document))
        .unwrap_or_default()
}
