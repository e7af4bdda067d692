//! Main-content selection and text segmentation

use super::boilerplate::{has_boilerplate_ancestor, is_boilerplate};
use scraper::{ElementRef, Html, Node};

/// Block-level tags that start and end a text segment
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "blockquote", "dd", "details", "div", "dl", "dt", "fieldset",
    "figcaption", "figure", "form", "h1", "h2", "h3", "h4", "h5", "h6", "hr", "li", "main", "ol",
    "p", "pre", "section", "summary", "table", "tbody", "thead", "tfoot", "tr", "ul",
];

const HEADING_TAGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];

/// Tags whose text is never visible
const INVISIBLE_TAGS: &[&str] = &["head", "script", "style", "noscript", "template"];

/// Main-content locators, tried in order; the first hit wins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MainContentRule {
    /// `<main>`
    MainElement,
    /// `<article>`
    ArticleElement,
    /// Any element with `role="main"`
    RoleMain,
    /// Element with id `content` or class `content`
    ContentBlock,
    /// The whole `<body>`
    Body,
}

impl MainContentRule {
    /// Evaluation order
    pub const ORDER: [MainContentRule; 5] = [
        Self::MainElement,
        Self::ArticleElement,
        Self::RoleMain,
        Self::ContentBlock,
        Self::Body,
    ];

    fn matches(&self, element: &ElementRef<'_>) -> bool {
        let value = element.value();
        match self {
            Self::MainElement => value.name() == "main",
            Self::ArticleElement => value.name() == "article",
            Self::RoleMain => value
                .attr("role")
                .map_or(false, |r| r.trim().eq_ignore_ascii_case("main")),
            Self::ContentBlock => {
                value.id().map_or(false, |id| id.eq_ignore_ascii_case("content"))
                    || value.classes().any(|c| c.eq_ignore_ascii_case("content"))
            }
            Self::Body => value.name() == "body",
        }
    }

    /// Finds the first element in document order matching this rule that is
    /// not inside a boilerplate subtree
    pub fn locate<'a>(&self, document: &'a Html) -> Option<ElementRef<'a>> {
        document
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .filter(|el| self.matches(el))
            .find(|el| !is_boilerplate(el.value()) && !has_boilerplate_ancestor(el))
    }
}

/// Selects the main-content root, falling back to the document root
pub fn select_main_content(document: &Html) -> (MainContentRule, ElementRef<'_>) {
    for rule in MainContentRule::ORDER {
        if let Some(element) = rule.locate(document) {
            return (rule, element);
        }
    }
    (MainContentRule::Body, document.root_element())
}

/// A whitespace-normalized block of text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    /// True when the segment is the full text of an `<h1>`..`<h6>`
    pub heading: bool,
}

/// Splits the non-boilerplate text under `root` into segments at block
/// boundaries; empty segments are dropped
pub fn collect_segments(root: ElementRef<'_>) -> Vec<Segment> {
    let mut builder = SegmentBuilder::default();
    walk(root, &mut builder);
    builder.finish(false);
    builder.segments
}

#[derive(Default)]
struct SegmentBuilder {
    segments: Vec<Segment>,
    current: String,
}

impl SegmentBuilder {
    fn push_text(&mut self, text: &str) {
        self.current.push_str(text);
    }

    fn push_space(&mut self) {
        self.current.push(' ');
    }

    fn finish(&mut self, heading: bool) {
        let text = collapse_whitespace(&self.current);
        self.current.clear();
        if !text.is_empty() {
            self.segments.push(Segment { text, heading });
        }
    }
}

fn walk(element: ElementRef<'_>, builder: &mut SegmentBuilder) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => builder.push_text(text),
            Node::Element(value) => {
                if is_boilerplate(value) || INVISIBLE_TAGS.contains(&value.name()) {
                    continue;
                }
                let Some(child_el) = ElementRef::wrap(child) else {
                    continue;
                };

                let name = value.name();
                if name == "br" {
                    builder.finish(false);
                    continue;
                }

                if BLOCK_TAGS.contains(&name) {
                    builder.finish(false);
                    walk(child_el, builder);
                    builder.finish(HEADING_TAGS.contains(&name));
                } else {
                    // Table cells and similar inline boxes still separate words
                    if name == "td" || name == "th" {
                        builder.push_space();
                    }
                    walk(child_el, builder);
                    if name == "td" || name == "th" {
                        builder.push_space();
                    }
                }
            }
            _ => {}
        }
    }
}

/// Collapses every run of whitespace to one space and trims the ends
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Counts non-whitespace characters of visible text under `root`
///
/// Unlike segment collection this ignores boilerplate rules: it measures the
/// page as rendered, which is the denominator of link density.
pub fn visible_char_count(root: ElementRef<'_>) -> usize {
    let mut count = 0;
    for child in root.children() {
        match child.value() {
            Node::Text(text) => count += non_whitespace_chars(text),
            Node::Element(value) if !INVISIBLE_TAGS.contains(&value.name()) => {
                if let Some(child_el) = ElementRef::wrap(child) {
                    count += visible_char_count(child_el);
                }
            }
            _ => {}
        }
    }
    count
}

/// Counts characters that are not whitespace
pub fn non_whitespace_chars(text: &str) -> usize {
    text.chars().filter(|c| !c.is_whitespace()).count()
}
