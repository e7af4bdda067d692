//! Crawl frontier: the pending-work queue and the visited set
//!
//! This module handles:
//! - FIFO queueing of crawl tasks (breadth-first traversal)
//! - Deduplication on normalized URLs
//! - Depth, same-domain, exclusion and robots.txt policy
//! - The page budget (`max_pages` dispatched tasks)

use crate::robots::ParsedRobots;
use crate::url::{extract_domain, is_excluded, normalize_url};
use std::collections::{HashSet, VecDeque};
use std::fmt;
use url::Url;

/// A URL waiting to be crawled, with its distance from the seed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTask {
    /// Normalized URL to fetch
    pub url: Url,

    /// Number of link hops from the seed (the seed is 0)
    pub depth: u32,
}

/// Why the frontier refused a URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SkipReason {
    /// Not an absolute HTTP(S) URL after resolution
    InvalidUrl,
    /// Deeper than `max_depth`
    DepthExceeded,
    /// Host differs from the seed's
    OffDomain,
    /// Already enqueued or processed in this run
    AlreadySeen,
    /// Login, cart, search or static-asset URL
    Excluded,
    /// Disallowed by the origin's robots.txt
    RobotsDenied,
}

impl SkipReason {
    /// Stable snake_case name used in logs and stats
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidUrl => "invalid_url",
            Self::DepthExceeded => "depth_exceeded",
            Self::OffDomain => "off_domain",
            Self::AlreadySeen => "already_seen",
            Self::Excluded => "excluded",
            Self::RobotsDenied => "robots_denied",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of offering a URL to the frontier
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OfferOutcome {
    /// The URL was new and is now queued
    Enqueued(Url),
    /// The URL was dropped
    Rejected(SkipReason),
}

impl OfferOutcome {
    pub fn is_enqueued(&self) -> bool {
        matches!(self, Self::Enqueued(_))
    }
}

/// Frontier owns the queue, the visited set and the dispatch counter
///
/// A URL enters the visited set exactly once, at the moment it is queued, so
/// no normalized URL can be dispatched twice within a run. Access is
/// single-threaded: the coordinator is the only producer and consumer.
#[derive(Debug)]
pub struct Frontier {
    /// Tasks in discovery order
    queue: VecDeque<CrawlTask>,

    /// Normalized URLs already enqueued or processed
    visited: HashSet<String>,

    /// Domain every crawled URL must share with the seed
    origin_domain: String,

    max_depth: u32,
    max_pages: u32,

    /// Tasks handed out so far
    dispatched: u32,

    /// Rules applied to every offered URL
    robots: ParsedRobots,
    robots_agent: String,
}

impl Frontier {
    /// Creates an empty frontier anchored on `origin_domain`
    ///
    /// # Arguments
    ///
    /// * `origin_domain` - Domain of the seed, as returned by `extract_domain`
    /// * `max_depth` - Deepest crawl depth accepted
    /// * `max_pages` - Number of tasks `next` will hand out before reporting exhaustion
    pub fn new(origin_domain: impl Into<String>, max_depth: u32, max_pages: u32) -> Self {
        Self {
            queue: VecDeque::new(),
            visited: HashSet::new(),
            origin_domain: origin_domain.into(),
            max_depth,
            max_pages,
            dispatched: 0,
            robots: ParsedRobots::allow_all(),
            robots_agent: String::new(),
        }
    }

    /// Installs robots.txt rules checked for every offered URL
    pub fn set_robots(&mut self, robots: ParsedRobots, agent: impl Into<String>) {
        self.robots = robots;
        self.robots_agent = agent.into();
    }

    /// Enqueues the normalized seed at depth 0
    ///
    /// The seed bypasses the exclusion filter; only robots.txt can refuse it.
    pub fn seed(&mut self, url: &Url) -> OfferOutcome {
        if !self.robots.is_allowed(url, &self.robots_agent) {
            self.visited.insert(url.as_str().to_string());
            return OfferOutcome::Rejected(SkipReason::RobotsDenied);
        }

        self.visited.insert(url.as_str().to_string());
        self.queue.push_back(CrawlTask {
            url: url.clone(),
            depth: 0,
        });
        tracing::debug!("Seeded {}", url);

        OfferOutcome::Enqueued(url.clone())
    }

    /// Offers a discovered URL at the given depth
    ///
    /// The reference is resolved against `base` and normalized. It is
    /// rejected if it is invalid, deeper than `max_depth`, on another domain,
    /// already seen, excluded, or disallowed by robots.txt; otherwise it is
    /// marked visited and appended to the queue.
    pub fn offer(&mut self, raw: &str, base: Option<&Url>, depth: u32) -> OfferOutcome {
        let outcome = self.evaluate(raw, base, depth);

        match &outcome {
            OfferOutcome::Enqueued(url) => {
                tracing::debug!("Enqueued depth={} {}", depth, url);
            }
            OfferOutcome::Rejected(reason) => {
                tracing::trace!("Rejected {} ({})", raw, reason);
            }
        }

        outcome
    }

    fn evaluate(&mut self, raw: &str, base: Option<&Url>, depth: u32) -> OfferOutcome {
        let url = match normalize_url(raw, base) {
            Ok(u) => u,
            Err(_) => return OfferOutcome::Rejected(SkipReason::InvalidUrl),
        };

        if depth > self.max_depth {
            return OfferOutcome::Rejected(SkipReason::DepthExceeded);
        }

        if extract_domain(&url).as_deref() != Some(self.origin_domain.as_str()) {
            return OfferOutcome::Rejected(SkipReason::OffDomain);
        }

        if self.visited.contains(url.as_str()) {
            return OfferOutcome::Rejected(SkipReason::AlreadySeen);
        }

        if is_excluded(&url) {
            return OfferOutcome::Rejected(SkipReason::Excluded);
        }

        if !self.robots.is_allowed(&url, &self.robots_agent) {
            // Remember it so later links to the same page are cheap rejections
            self.visited.insert(url.as_str().to_string());
            return OfferOutcome::Rejected(SkipReason::RobotsDenied);
        }

        self.visited.insert(url.as_str().to_string());
        self.queue.push_back(CrawlTask {
            url: url.clone(),
            depth,
        });

        OfferOutcome::Enqueued(url)
    }

    /// Pops the next task in FIFO order
    ///
    /// Returns `None` when the queue is empty or the page budget is spent.
    pub fn next(&mut self) -> Option<CrawlTask> {
        if self.is_exhausted() {
            return None;
        }

        let task = self.queue.pop_front()?;
        self.dispatched += 1;
        Some(task)
    }

    /// Returns true once `max_pages` tasks have been handed out
    pub fn is_exhausted(&self) -> bool {
        self.dispatched >= self.max_pages
    }

    /// Returns the number of queued tasks
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns whether the queue is empty
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Returns the number of tasks handed out so far
    pub fn dispatched(&self) -> u32 {
        self.dispatched
    }

    /// Returns the number of distinct URLs seen
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

}
