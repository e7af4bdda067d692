//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with outcome classification
//! - The breadth-first frontier with its visited set and crawl policy
//! - The fixed-interval throttle between requests
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod frontier;
mod throttle;

pub use coordinator::{run_crawl, Coordinator};
pub use fetcher::{build_http_client, FetchError, Fetcher, RawPage};
pub use frontier::{CrawlTask, Frontier, OfferOutcome, SkipReason};
pub use throttle::Throttle;
