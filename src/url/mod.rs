//! URL handling module for Doc-Harvest
//!
//! This module provides URL normalization, domain extraction, and the
//! exclusion rules that keep the crawl away from pages with no document value
//! (login forms, carts, search results, binary assets).

mod domain;
mod normalize;

// Re-export main functions
pub use domain::extract_domain;
pub use normalize::normalize_url;

use url::Url;

/// Path fragments that mark account, commerce and search pages
const EXCLUDED_PATH_PARTS: &[&str] = &[
    "/login",
    "/logout",
    "/signin",
    "/signup",
    "/register",
    "/cart",
    "/checkout",
    "/account",
    "/search",
];

/// Query parameters that mark search result pages
const EXCLUDED_QUERY_KEYS: &[&str] = &["search", "q"];

/// File extensions of static assets that never hold documents
const EXCLUDED_EXTENSIONS: &[&str] = &[
    ".pdf", ".jpg", ".jpeg", ".png", ".gif", ".svg", ".webp", ".ico", ".zip", ".gz", ".exe",
    ".css", ".js", ".mp3", ".mp4", ".woff", ".woff2",
];

/// Returns true if the URL matches the excluded-pattern set
///
/// Matching is case-insensitive and looks at the path and the query keys
/// only; the host never triggers an exclusion.
///
/// # Examples
///
/// ```
/// use doc_harvest::url::is_excluded;
/// use url::Url;
///
/// assert!(is_excluded(&Url::parse("https://example.com/login").unwrap()));
/// assert!(is_excluded(&Url::parse("https://example.com/files/report.PDF").unwrap()));
/// assert!(is_excluded(&Url::parse("https://example.com/?q=rust").unwrap()));
/// assert!(!is_excluded(&Url::parse("https://example.com/docs/intro").unwrap()));
/// ```
pub fn is_excluded(url: &Url) -> bool {
    let path = url.path().to_lowercase();

    if EXCLUDED_PATH_PARTS.iter().any(|part| path.contains(part)) {
        return true;
    }

    if EXCLUDED_EXTENSIONS.iter().any(|ext| path.ends_with(ext)) {
        return true;
    }

    url.query_pairs().any(|(key, _)| {
        let key = key.to_lowercase();
        EXCLUDED_QUERY_KEYS.contains(&key.as_str())
    })
}
