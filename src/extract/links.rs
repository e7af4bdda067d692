//! Link discovery over the unmodified document

use super::content::non_whitespace_chars;
use scraper::{Html, Selector};

/// An `<a href>` found in the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredLink {
    /// Raw `href` value, trimmed; resolution happens in the frontier
    pub href: String,

    /// Non-whitespace characters of the anchor text
    pub text_chars: usize,

    /// Anchor carries a `download` attribute
    pub download: bool,
}

impl DiscoveredLink {
    /// Returns true if the link should be offered to the frontier
    pub fn is_followable(&self) -> bool {
        !self.download && !self.href.is_empty()
    }
}

/// Collects every `<a href>` in document order, boilerplate included
///
/// Anchors without an `href` are not links and are ignored. Nested anchors
/// are dropped so their text is not counted twice.
pub fn discover_links(document: &Html) -> Vec<DiscoveredLink> {
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter(|element| {
            !element
                .ancestors()
                .filter_map(scraper::ElementRef::wrap)
                .any(|a| a.value().name() == "a")
        })
        .map(|element| DiscoveredLink {
            href: element.value().attr("href").unwrap_or_default().trim().to_string(),
            text_chars: element.text().map(non_whitespace_chars).sum(),
            download: element.value().attr("download").is_some(),
        })
        .collect()
}

/// Sums the anchor text of all links
pub fn anchor_chars(links: &[DiscoveredLink]) -> usize {
    links.iter().map(|l| l.text_chars).sum()
}
