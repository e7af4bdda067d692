use crate::output::OutputFormat;
use serde::Deserialize;

/// Main configuration structure for Doc-Harvest
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
    /// Logging verbosity only; has no effect on output
    #[serde(default)]
    pub verbose: bool,
}

impl Config {
    /// Builds a configuration with defaults for everything but the seed URL
    pub fn for_start_url(start_url: impl Into<String>) -> Self {
        Self {
            crawler: CrawlerConfig::for_start_url(start_url),
            user_agent: UserAgentConfig::default(),
            output: OutputConfig::default(),
            verbose: false,
        }
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Seed URL, also the anchor for the domain restriction
    #[serde(rename = "start-url")]
    pub start_url: String,

    /// Hard cap on dispatched fetches
    #[serde(rename = "max-pages", default = "default_max_pages")]
    pub max_pages: u32,

    /// Hard cap on crawl depth (the seed is depth 0)
    #[serde(rename = "max-depth", default = "default_max_depth")]
    pub max_depth: u32,

    /// Seconds to wait after a fetch completes before dispatching the next one
    #[serde(default = "default_delay")]
    pub delay: f64,

    /// Per-fetch deadline in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Whether to honour the seed origin's robots.txt
    #[serde(rename = "respect-robots", default = "default_true")]
    pub respect_robots: bool,

    /// Pages whose extracted body is shorter than this are skipped (0 disables)
    #[serde(rename = "min-body-chars", default)]
    pub min_body_chars: usize,
}

impl CrawlerConfig {
    pub fn for_start_url(start_url: impl Into<String>) -> Self {
        Self {
            start_url: start_url.into(),
            max_pages: default_max_pages(),
            max_depth: default_max_depth(),
            delay: default_delay(),
            timeout: default_timeout(),
            respect_robots: true,
            min_body_chars: 0,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name", default = "default_crawler_name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version", default = "default_crawler_version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url", default)]
    pub contact_url: Option<String>,

    /// Verbatim User-Agent header; wins over the composed value
    #[serde(rename = "override", default)]
    pub override_value: Option<String>,
}

impl UserAgentConfig {
    /// Returns the User-Agent header value sent with every request
    ///
    /// Format: `CrawlerName/Version` or `CrawlerName/Version (+ContactURL)`,
    /// unless an override is configured.
    pub fn header_value(&self) -> String {
        if let Some(value) = &self.override_value {
            return value.clone();
        }

        match &self.contact_url {
            Some(contact) => format!(
                "{}/{} (+{})",
                self.crawler_name, self.crawler_version, contact
            ),
            None => format!("{}/{}", self.crawler_name, self.crawler_version),
        }
    }

    /// Returns the product token used for robots.txt group matching
    pub fn product_token(&self) -> &str {
        let token = self
            .override_value
            .as_deref()
            .and_then(|value| value.split(|c: char| c == '/' || c.is_whitespace()).next())
            .filter(|token| !token.is_empty());

        token.unwrap_or(&self.crawler_name)
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: default_crawler_name(),
            crawler_version: default_crawler_version(),
            contact_url: None,
            override_value: None,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path of the document file
    #[serde(default = "default_output_path")]
    pub path: String,

    /// Serialization format
    #[serde(default)]
    pub format: OutputFormat,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
            format: OutputFormat::default(),
        }
    }
}

fn default_max_pages() -> u32 {
    100
}

fn default_max_depth() -> u32 {
    3
}

fn default_delay() -> f64 {
    1.0
}

fn default_timeout() -> u64 {
    10
}

fn default_true() -> bool {
    true
}

fn default_crawler_name() -> String {
    "AI-Collections-Scraper".to_string()
}

fn default_crawler_version() -> String {
    "1.0".to_string()
}

fn default_output_path() -> String {
    "output.jsonl".to_string()
}
