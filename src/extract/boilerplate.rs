//! Boilerplate detection
//!
//! Site chrome is recognised by tag name or by class/id tokens. Matching
//! elements and everything below them are left out of the extracted text.

use scraper::node::Element;
use scraper::ElementRef;

/// Tags whose subtree never carries page-specific text
const BOILERPLATE_TAGS: &[&str] = &[
    "script", "style", "noscript", "template", "svg", "iframe", "nav", "footer", "header", "aside",
];

/// Class/id fragments matched anywhere inside a token
const BOILERPLATE_FRAGMENTS: &[&str] = &[
    "navbar",
    "navigation",
    "menu",
    "sidebar",
    "side-bar",
    "footer",
    "site-header",
    "header-nav",
    "breadcrumb",
    "advertisement",
    "banner-ad",
    "cookie",
    "popup",
    "modal",
    "share-button",
    "social-share",
];

/// Short words matched against the `-`/`_` separated parts of a token
const BOILERPLATE_PARTS: &[&str] = &["nav", "ad", "ads"];

/// Part suffixes that mark compound navigation names (`subnav`, `topnav`)
const BOILERPLATE_PART_SUFFIXES: &[&str] = &["nav"];

/// Structural tags that are never treated as boilerplate
const PROTECTED_TAGS: &[&str] = &["html", "head", "body", "main"];

/// Returns true if the element (and its subtree) is boilerplate
pub fn is_boilerplate(element: &Element) -> bool {
    let name = element.name();

    if PROTECTED_TAGS.contains(&name) {
        return false;
    }

    if BOILERPLATE_TAGS.contains(&name) {
        return true;
    }

    element.classes().any(is_boilerplate_token) || element.id().map_or(false, is_boilerplate_token)
}

/// Returns true if the element sits inside a boilerplate subtree
pub fn has_boilerplate_ancestor(element: &ElementRef<'_>) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|ancestor| is_boilerplate(ancestor.value()))
}

fn is_boilerplate_token(token: &str) -> bool {
    let token = token.to_ascii_lowercase();

    if BOILERPLATE_FRAGMENTS.iter().any(|f| token.contains(f)) {
        return true;
    }

    token.split(|c| c == '-' || c == '_').any(|part| {
        BOILERPLATE_PARTS.contains(&part)
            || BOILERPLATE_PART_SUFFIXES.iter().any(|suffix| part.ends_with(suffix))
    })
}
