use crate::UrlError;
use url::Url;

/// Normalizes a URL according to Doc-Harvest's deduplication rules
///
/// # Normalization Steps
///
/// 1. Resolve `raw` against `base` (if given); reject if malformed
/// 2. Require an `http` or `https` scheme and a non-empty host
/// 3. Remove fragment (everything after #)
/// 4. Remove trailing slash, except for the root path `/`
///
/// The query string is preserved verbatim, since different query values may
/// address distinct content. Host lowercasing, default-port removal and dot
/// segment resolution come from the URL parser itself.
///
/// # Arguments
///
/// * `raw` - The URL or relative reference to normalize
/// * `base` - The page the reference was found on, if any
///
/// # Returns
///
/// * `Ok(Url)` - Normalized absolute URL
/// * `Err(UrlError)` - Failed to parse or not an absolute HTTP(S) URL
///
/// # Examples
///
/// ```
/// use doc_harvest::url::normalize_url;
/// use url::Url;
///
/// let url = normalize_url("https://EXAMPLE.com/page/#intro", None).unwrap();
/// assert_eq!(url.as_str(), "https://example.com/page");
///
/// let base = Url::parse("https://example.com/docs/intro").unwrap();
/// let url = normalize_url("../blog/?page=2", Some(&base)).unwrap();
/// assert_eq!(url.as_str(), "https://example.com/blog?page=2");
/// ```
pub fn normalize_url(raw: &str, base: Option<&Url>) -> Result<Url, UrlError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(UrlError::Parse("empty URL".to_string()));
    }

    // Step 1: Resolve
    let resolved = match base {
        Some(base) => base.join(raw),
        None => Url::parse(raw),
    };
    let mut url = resolved.map_err(|e| UrlError::Parse(format!("{}: {}", raw, e)))?;

    // Step 2: Scheme and host
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost);
    }

    // Step 3: Remove fragment
    url.set_fragment(None);

    // Step 4: Conditional trailing slash removal
    let path = url.path();
    if path.len() > 1 && path.ends_with('/') {
        let trimmed = path.trim_end_matches('/');
        let trimmed = if trimmed.is_empty() { "/" } else { trimmed }.to_string();
        url.set_path(&trimmed);
    }

    Ok(url)
}
