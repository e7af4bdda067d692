//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client with the configured user agent and timeout
//! - GET requests to fetch page content
//! - Classification of transport, status and content-type failures

use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Maximum redirect hops followed for a single fetch
const MAX_REDIRECTS: usize = 10;

/// Upper bound on the connect phase, independent of the request timeout
const MAX_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Why a fetch produced no usable HTML
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Timeout, connection refused/reset, DNS failure, broken body stream
    #[error("Transport error: {message}")]
    Transport { message: String, timed_out: bool },

    /// The server answered with a non-2xx status
    #[error("HTTP status {status}")]
    HttpStatus { status: u16 },

    /// The response is not `text/html`
    #[error("Unsupported content type: {content_type}")]
    UnsupportedContentType { content_type: String },
}

/// Result of a single retrieval
///
/// Exactly one of `html` and `error` is set. `http_status` is present
/// whenever the server answered, including for status errors.
#[derive(Debug, Clone)]
pub struct RawPage {
    /// Final URL after redirects
    pub url: Url,

    /// HTTP status code, if a response was received
    pub http_status: Option<u16>,

    /// Content-Type header value, if present
    pub content_type_header: Option<String>,

    /// Page body, only for successful HTML responses
    pub html: Option<String>,

    /// Failure classification, if the fetch did not succeed
    pub error: Option<FetchError>,
}

impl RawPage {
    fn failed(url: &Url, http_status: Option<u16>, content_type: Option<String>, error: FetchError) -> Self {
        Self {
            url: url.clone(),
            http_status,
            content_type_header: content_type,
            html: None,
            error: Some(error),
        }
    }

    /// Splits the page into `(status, html)` or the fetch error
    pub fn into_html(self) -> Result<(u16, String), FetchError> {
        if let Some(error) = self.error {
            return Err(error);
        }

        match (self.http_status, self.html) {
            (Some(status), Some(html)) => Ok((status, html)),
            _ => Err(FetchError::Transport {
                message: "response carried no body".to_string(),
                timed_out: false,
            }),
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - The User-Agent header value
/// * `timeout` - Deadline for a whole request, body included
///
/// # Example
///
/// ```no_run
/// use doc_harvest::crawler::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client("AI-Collections-Scraper/1.0", Duration::from_secs(10)).unwrap();
/// ```
pub fn build_http_client(user_agent: &str, timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .connect_timeout(timeout.min(MAX_CONNECT_TIMEOUT))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Performs one blocking-style GET per URL and classifies the outcome
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Wraps an existing client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Returns the underlying client (shared with the robots.txt fetch)
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Fetches a URL; never fails, every problem is reported in the `RawPage`
    ///
    /// # Outcomes
    ///
    /// | Condition | Result |
    /// |-----------|--------|
    /// | Timeout, connect/DNS failure, body read failure | `Transport` |
    /// | Non-2xx status | `HttpStatus`, status kept, body dropped |
    /// | Content-Type not `text/html*` (or missing) | `UnsupportedContentType`, body never read |
    /// | Otherwise | `html` set |
    pub async fn fetch(&self, url: &Url) -> RawPage {
        let response = match self.client.get(url.as_str()).send().await {
            Ok(r) => r,
            Err(e) => return RawPage::failed(url, None, None, classify_transport_error(&e)),
        };

        let status = response.status();
        let final_url = response.url().clone();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());

        if !status.is_success() {
            return RawPage::failed(
                &final_url,
                Some(status.as_u16()),
                content_type,
                FetchError::HttpStatus {
                    status: status.as_u16(),
                },
            );
        }

        if !is_html_content_type(content_type.as_deref()) {
            let error = FetchError::UnsupportedContentType {
                content_type: content_type.clone().unwrap_or_else(|| "<missing>".to_string()),
            };
            return RawPage::failed(&final_url, Some(status.as_u16()), content_type, error);
        }

        match response.text().await {
            Ok(body) => RawPage {
                url: final_url,
                http_status: Some(status.as_u16()),
                content_type_header: content_type,
                html: Some(body),
                error: None,
            },
            Err(e) => RawPage::failed(
                &final_url,
                Some(status.as_u16()),
                content_type,
                classify_transport_error(&e),
            ),
        }
    }
}

/// Returns true for `text/html`, with or without parameters
fn is_html_content_type(content_type: Option<&str>) -> bool {
    content_type
        .map(|ct| ct.trim_start().to_ascii_lowercase().starts_with("text/html"))
        .unwrap_or(false)
}

fn classify_transport_error(e: &reqwest::Error) -> FetchError {
    let message = if e.is_timeout() {
        "Request timeout".to_string()
    } else if e.is_connect() {
        format!("Connection failed: {}", e)
    } else if e.is_redirect() {
        format!("Redirect error: {}", e)
    } else {
        e.to_string()
    };

    FetchError::Transport {
        message,
        timed_out: e.is_timeout(),
    }
}
