//! Robots.txt handling module
//!
//! The crawl never leaves the seed's domain, so robots.txt is fetched once
//! for that origin before the first page is dispatched.

mod parser;

pub use parser::ParsedRobots;

use reqwest::Client;
use url::Url;

/// Fetches robots.txt for the origin of `seed`
///
/// Any failure (transport error, non-2xx status, unreadable body) yields
/// permissive rules: a missing robots.txt never blocks a crawl.
///
/// # Arguments
///
/// * `client` - The HTTP client shared with the fetcher
/// * `seed` - Any URL on the origin to fetch robots.txt for
pub async fn fetch_robots(client: &Client, seed: &Url) -> ParsedRobots {
    let robots_url = match seed.join("/robots.txt") {
        Ok(u) => u,
        Err(e) => {
            tracing::debug!("Cannot build robots.txt URL for {}: {}", seed, e);
            return ParsedRobots::allow_all();
        }
    };

    let response = match client.get(robots_url.as_str()).send().await {
        Ok(r) => r,
        Err(e) => {
            tracing::debug!("robots.txt fetch failed for {}: {}", robots_url, e);
            return ParsedRobots::allow_all();
        }
    };

    if !response.status().is_success() {
        tracing::debug!(
            "robots.txt at {} returned HTTP {}, allowing all",
            robots_url,
            response.status().as_u16()
        );
        return ParsedRobots::allow_all();
    }

    match response.text().await {
        Ok(body) => {
            tracing::debug!("Loaded robots.txt from {} ({} bytes)", robots_url, body.len());
            ParsedRobots::from_content(&body)
        }
        Err(e) => {
            tracing::debug!("robots.txt body unreadable at {}: {}", robots_url, e);
            ParsedRobots::allow_all()
        }
    }
}
