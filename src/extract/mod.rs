//! Content extraction from raw HTML
//!
//! This module handles:
//! - Parsing HTML into a DOM
//! - Boilerplate removal and main-content selection
//! - Title extraction and text normalization
//! - Link discovery and link density

mod boilerplate;
mod content;
mod links;
mod title;

pub use boilerplate::is_boilerplate;
pub use content::{collapse_whitespace, MainContentRule};
pub use links::DiscoveredLink;
pub use title::{extract_title, TitleSource};

use scraper::Html;
use thiserror::Error;

/// Extraction errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("Failed to parse HTML: {0}")]
    Parse(String),
}

/// Text and signals extracted from one page
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedContent {
    /// Page title, or empty
    pub title: String,

    /// Main-content text, paragraphs separated by a blank line
    pub body_text: String,

    /// Anchor hrefs from the whole original document, in document order
    pub links: Vec<String>,

    /// Anchor text over visible text, in [0, 1]
    pub link_density: f64,

    /// Number of non-empty paragraphs in `body_text`
    pub paragraph_count: usize,

    /// Whether the original markup contained `<pre>` or `<code>`
    pub has_code_markup: bool,
}

/// Extracts title, body text, links and link density from an HTML page
///
/// # Arguments
///
/// * `html` - The page markup
///
/// # Returns
///
/// * `Ok(ExtractedContent)` - Extraction result (possibly with an empty body)
/// * `Err(ExtractError::Parse)` - The input is blank or contains no markup
///
/// # Example
///
/// ```
/// use doc_harvest::extract::extract;
///
/// let page = extract("<main><h1>Hello</h1><p>World test</p></main>").unwrap();
/// assert_eq!(page.title, "Hello");
/// assert_eq!(page.body_text, "World test");
/// ```
pub fn extract(html: &str) -> Result<ExtractedContent, ExtractError> {
    if html.trim().is_empty() {
        return Err(ExtractError::Parse("document is empty".to_string()));
    }
    if !html.contains('<') {
        return Err(ExtractError::Parse("document contains no markup".to_string()));
    }

    let document = Html::parse_document(html);
    if !document.errors.is_empty() {
        tracing::trace!("html5ever recovered from {} parse errors", document.errors.len());
    }

    let title = extract_title(&document);

    let discovered = links::discover_links(&document);
    let visible_chars = content::visible_char_count(document.root_element());
    let link_density = if visible_chars == 0 {
        0.0
    } else {
        (links::anchor_chars(&discovered) as f64 / visible_chars as f64).clamp(0.0, 1.0)
    };

    let has_code_markup = document
        .root_element()
        .descendants()
        .filter_map(scraper::ElementRef::wrap)
        .any(|el| matches!(el.value().name(), "pre" | "code"));

    let (rule, root) = content::select_main_content(&document);
    tracing::trace!("Main content located by {:?}", rule);

    let mut segments = content::collect_segments(root);

    // The heading that supplied the title is not repeated in the body
    if let Some(first) = segments.first() {
        if first.heading && !title.is_empty() && first.text == title {
            segments.remove(0);
        }
    }

    let paragraphs: Vec<String> = segments.into_iter().map(|s| s.text).collect();

    Ok(ExtractedContent {
        title,
        paragraph_count: paragraphs.len(),
        body_text: paragraphs.join("\n\n"),
        links: discovered
            .into_iter()
            .filter(DiscoveredLink::is_followable)
            .map(|l| l.href)
            .collect(),
        link_density,
        has_code_markup,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hello_world_page() {
        let page = extract("<main><h1>Hello</h1><p>World test</p></main>").unwrap();
        assert_eq!(page.title, "Hello");
        assert!(page.body_text.contains("World test"));
        assert_eq!(page.body_text.split_whitespace().count(), 2);
        assert_eq!(page.link_density, 0.0);
        assert_eq!(page.paragraph_count, 1);
        assert!(page.links.is_empty());
        assert!(!page.has_code_markup);
    }

    #[test]
    fn test_heading_kept_when_title_differs() {
        let page = extract(
            "<html><head><title>Site | Page</title></head><body><main><h1>Page</h1><p>Text</p></main></body></html>",
        )
        .unwrap();
        assert_eq!(page.title, "Site | Page");
        assert_eq!(page.body_text, "Page\n\nText");
        assert_eq!(page.paragraph_count, 2);
    }

    #[test]
    fn test_boilerplate_removed_but_links_kept() {
        let html = r#"<html><head><title>Docs</title><style>body{}</style></head><body>
            <header><a href="/">Home</a></header>
            <nav><a href="/about">About</a><a href="/contact">Contact</a></nav>
            <main><p>Install the package.</p><p>Then run it.</p></main>
            <footer><a href="/privacy">Privacy</a></footer>
            </body></html>"#;
        let page = extract(html).unwrap();

        assert_eq!(page.body_text, "Install the package.\n\nThen run it.");
        assert_eq!(page.paragraph_count, 2);
        assert_eq!(page.links, vec!["/", "/about", "/contact", "/privacy"]);
        assert!(page.link_density > 0.0 && page.link_density < 1.0);
    }

    #[test]
    fn test_link_density_all_links() {
        let page = extract(r#"<body><a href="/a">One</a> <a href="/b">Two</a></body>"#).unwrap();
        assert_eq!(page.link_density, 1.0);
    }

    #[test]
    fn test_link_density_empty_page() {
        let page = extract("<html><body></body></html>").unwrap();
        assert_eq!(page.link_density, 0.0);
        assert_eq!(page.body_text, "");
        assert_eq!(page.paragraph_count, 0);
    }

    #[test]
    fn test_compound_nav_classes_removed() {
        let page = extract(
            r#"<div class="main-nav"><a>Home</a> <a>About</a></div><div id="site-nav">Menu Links</div><p>Real text</p>"#,
        )
        .unwrap();
        assert_eq!(page.body_text, "Real text");
    }

    #[test]
    fn test_named_anchors_do_not_raise_link_density() {
        let page = extract(r#"<body><h2><a name="setup">Setup</a></h2><p>Steps</p></body>"#).unwrap();
        assert_eq!(page.link_density, 0.0);
        assert!(page.links.is_empty());
    }

    #[test]
    fn test_code_markup_detected_outside_main() {
        let page = extract("<aside><pre>x = 1</pre></aside><main><p>Prose</p></main>").unwrap();
        assert!(page.has_code_markup);
        assert_eq!(page.body_text, "Prose");
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(extract(""), Err(ExtractError::Parse(_))));
        assert!(matches!(extract("   \n"), Err(ExtractError::Parse(_))));
        assert!(matches!(extract("plain text only"), Err(ExtractError::Parse(_))));
    }

    #[test]
    fn test_malformed_markup_recovered() {
        let page = extract("<main><p>Unclosed <b>bold<p>Next").unwrap();
        assert!(page.body_text.contains("Unclosed bold"));
        assert!(page.body_text.contains("Next"));
    }
}
