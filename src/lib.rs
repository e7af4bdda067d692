//! Doc-Harvest: turns a website into AI-ready documents
//!
//! This crate crawls a single site breadth-first from a seed URL, strips
//! boilerplate from every fetched page, enriches the remaining content with
//! quantitative signals and a heuristic content type, and streams the result
//! to JSONL or JSON output.

pub mod config;
pub mod crawler;
pub mod enrich;
pub mod extract;
pub mod output;
pub mod robots;
pub mod state;
pub mod url;

use thiserror::Error;

/// Run-aborting errors
///
/// Everything that can go wrong with a single page is a [`PageError`] and is
/// absorbed by the coordinator; only the variants here stop a crawl.
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid seed URL: {0}")]
    InvalidSeed(UrlError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Invalid state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::PageState,
        to: state::PageState,
    },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Per-page failures
///
/// These never unwind past the page being processed: the coordinator turns
/// each one into a stats increment and a log line.
#[derive(Debug, Error)]
pub enum PageError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] UrlError),

    #[error(transparent)]
    Fetch(#[from] crawler::FetchError),

    #[error(transparent)]
    Extract(#[from] extract::ExtractError),

    #[error("Body has {actual} characters, minimum is {minimum}")]
    InsufficientContent { actual: usize, minimum: usize },
}

/// Coarse classification of per-page failures, used as a stats key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FailureKind {
    InvalidUrl,
    TransportError,
    HttpStatusError,
    UnsupportedContentType,
    ParseError,
    InsufficientContent,
}

impl FailureKind {
    /// Stable snake_case name used in logs and stats
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidUrl => "invalid_url",
            Self::TransportError => "transport_error",
            Self::HttpStatusError => "http_status_error",
            Self::UnsupportedContentType => "unsupported_content_type",
            Self::ParseError => "parse_error",
            Self::InsufficientContent => "insufficient_content",
        }
    }

    /// Returns true if pages with this failure count as skipped rather than failed
    pub fn is_skip(&self) -> bool {
        matches!(self, Self::InsufficientContent)
    }
}

impl PageError {
    /// Maps the error onto its failure kind
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::InvalidUrl(_) => FailureKind::InvalidUrl,
            Self::Fetch(crawler::FetchError::Transport { .. }) => FailureKind::TransportError,
            Self::Fetch(crawler::FetchError::HttpStatus { .. }) => FailureKind::HttpStatusError,
            Self::Fetch(crawler::FetchError::UnsupportedContentType { .. }) => {
                FailureKind::UnsupportedContentType
            }
            Self::Extract(_) => FailureKind::ParseError,
            Self::InsufficientContent { .. } => FailureKind::InsufficientContent,
        }
    }
}

/// Result type alias for crawl operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{run_crawl, Coordinator};
pub use output::{ContentType, CrawlStats, Document, OutputFormat};
pub use state::PageState;
pub use crate::url::{extract_domain, normalize_url};
