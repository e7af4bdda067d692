//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the main crawl loop that coordinates all aspects of
//! the crawling process, including:
//! - Seeding the frontier and loading robots.txt
//! - Fetching, extracting, enriching and writing each page in turn
//! - Feeding discovered links back into the frontier
//! - Absorbing per-page failures into the run statistics
//! - Handling interrupts and producing the final summary

use crate::config::{validate, Config};
use crate::crawler::frontier::{CrawlTask, Frontier, OfferOutcome};
use crate::crawler::throttle::Throttle;
use crate::crawler::{build_http_client, Fetcher};
use crate::enrich::enrich;
use crate::extract::extract;
use crate::output::{CrawlStats, DocumentWriter};
use crate::robots::fetch_robots;
use crate::state::{PageLifecycle, PageState};
use crate::url::{extract_domain, normalize_url};
use crate::{HarvestError, PageError, UrlError};
use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Main crawler coordinator structure
///
/// Owns every piece of crawl state: the frontier, the writer and the
/// statistics. Nothing is shared between runs.
pub struct Coordinator {
    config: Config,
    seed: Url,
    frontier: Frontier,
    fetcher: Fetcher,
    writer: DocumentWriter,
    throttle: Throttle,
    stats: CrawlStats,
    stop: Arc<AtomicBool>,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// The seed URL is checked first, before any I/O, so a malformed seed
    /// never creates an output file.
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(HarvestError)` - Bad seed, invalid configuration, HTTP client
    ///   construction failure or unwritable output path
    pub fn new(config: Config) -> Result<Self, HarvestError> {
        let seed = normalize_url(&config.crawler.start_url, None).map_err(HarvestError::InvalidSeed)?;
        validate(&config)?;

        let origin = extract_domain(&seed).ok_or(HarvestError::InvalidSeed(UrlError::MissingHost))?;

        let user_agent = config.user_agent.header_value();
        let client = build_http_client(&user_agent, Duration::from_secs(config.crawler.timeout))?;

        let writer = DocumentWriter::open(&config.output.path, config.output.format)?;

        let frontier = Frontier::new(origin, config.crawler.max_depth, config.crawler.max_pages);
        let throttle = Throttle::effective(config.crawler.delay, None);

        tracing::debug!("User-Agent: {}", user_agent);

        Ok(Self {
            config,
            seed,
            frontier,
            fetcher: Fetcher::new(client),
            writer,
            throttle,
            stats: CrawlStats::new(),
            stop: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Returns a flag that stops the crawl before the next dispatch when set
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    /// Runs the main crawl loop
    ///
    /// This is the core crawling logic that:
    /// 1. Loads robots.txt for the seed origin (when enabled)
    /// 2. Enqueues the seed at depth 0
    /// 3. Pops tasks in FIFO order until the frontier or page budget is exhausted
    /// 4. Fetches, extracts, enriches and writes each page
    /// 5. Closes the writer and finalizes the statistics
    ///
    /// Only output failures (and internal lifecycle violations) abort the
    /// run; the writer is flushed before the error is returned.
    pub async fn run(mut self) -> Result<CrawlStats, HarvestError> {
        tracing::info!(
            "Starting crawl of {} (max_pages={}, max_depth={}, output={} [{}])",
            self.seed,
            self.config.crawler.max_pages,
            self.config.crawler.max_depth,
            self.writer.path().display(),
            self.writer.format()
        );

        if self.config.crawler.respect_robots {
            self.load_robots().await;
        } else {
            tracing::info!("robots.txt checks disabled");
        }

        let seed = self.seed.clone();
        if let OfferOutcome::Rejected(reason) = self.frontier.seed(&seed) {
            tracing::warn!("Seed {} rejected: {}", seed, reason);
            self.stats.record_rejection(reason);
        }

        let max_pages = self.config.crawler.max_pages;

        loop {
            if self.stop.load(Ordering::SeqCst) {
                tracing::warn!("Stop requested, finishing early");
                self.stats.interrupted = true;
                break;
            }

            let Some(task) = self.frontier.next() else {
                break;
            };

            self.throttle.wait().await;

            tracing::info!(
                "[{}/{}] depth={} {}",
                self.frontier.dispatched(),
                max_pages,
                task.depth,
                task.url
            );

            if let Err(e) = self.process_task(task).await {
                tracing::error!("Aborting crawl: {}", e);
                if let Err(flush_err) = self.writer.flush() {
                    tracing::error!("Flush after failure also failed: {}", flush_err);
                }
                return Err(e);
            }

            if self.frontier.dispatched() % 10 == 0 {
                tracing::debug!(
                    "Progress: {} dispatched, {} queued, {} seen",
                    self.frontier.dispatched(),
                    self.frontier.len(),
                    self.frontier.visited_count()
                );
            }
        }

        if self.frontier.is_exhausted() && !self.frontier.is_empty() {
            tracing::info!(
                "Page budget of {} reached with {} URLs still queued",
                max_pages,
                self.frontier.len()
            );
        } else if !self.stats.interrupted {
            tracing::info!("Frontier is empty, crawl complete");
        }

        let written = self.writer.close()?;
        if written == 0 {
            tracing::warn!("No documents were written");
        }

        self.stats.finish();
        self.stats.log_summary();

        Ok(self.stats)
    }

    /// Fetches robots.txt once and installs it on the frontier
    async fn load_robots(&mut self) {
        let robots = fetch_robots(self.fetcher.client(), &self.seed).await;
        let token = self.config.user_agent.product_token().to_string();

        if let Some(crawl_delay) = robots.crawl_delay(&token) {
            let throttle = Throttle::effective(self.config.crawler.delay, Some(crawl_delay));
            if throttle.delay() > self.throttle.delay() {
                tracing::info!(
                    "robots.txt Crawl-delay raises the delay to {:.1}s",
                    throttle.delay().as_secs_f64()
                );
            }
            self.throttle = throttle;
        }

        self.frontier.set_robots(robots, token);
    }

    /// Offers a URL to the frontier and counts rejections
    fn offer(&mut self, raw: &str, base: Option<&Url>, depth: u32) -> OfferOutcome {
        let outcome = self.frontier.offer(raw, base, depth);
        if let OfferOutcome::Rejected(reason) = &outcome {
            self.stats.record_rejection(*reason);
        }
        outcome
    }

    /// Processes a single task through the page lifecycle
    ///
    /// Per-page problems are recorded and swallowed; the returned error is
    /// always run-aborting.
    async fn process_task(&mut self, task: CrawlTask) -> Result<(), HarvestError> {
        let mut lifecycle = PageLifecycle::new();

        lifecycle.advance(PageState::Fetching)?;
        let page = self.fetcher.fetch(&task.url).await;
        self.throttle.mark_completed();
        let fetched_at = Utc::now();

        // Relative links resolve against the post-redirect location
        let base = page.url.clone();
        let (http_status, html) = match page.into_html() {
            Ok(ok) => ok,
            Err(e) => {
                lifecycle.advance(PageState::FetchFailed)?;
                self.record_page_error(&task, PageError::from(e));
                return Ok(());
            }
        };
        lifecycle.advance(PageState::Fetched)?;
        self.stats.record_fetched();

        lifecycle.advance(PageState::Extracting)?;
        let extracted = match extract(&html) {
            Ok(content) => content,
            Err(e) => {
                lifecycle.advance(PageState::ExtractFailed)?;
                self.record_page_error(&task, PageError::from(e));
                return Ok(());
            }
        };

        let next_depth = task.depth + 1;
        for href in &extracted.links {
            self.offer(href, Some(&base), next_depth);
        }

        let minimum = self.config.crawler.min_body_chars;
        let actual = extracted.body_text.chars().count();
        if minimum > 0 && actual < minimum {
            lifecycle.advance(PageState::ExtractFailed)?;
            self.record_page_error(&task, PageError::InsufficientContent { actual, minimum });
            return Ok(());
        }
        lifecycle.advance(PageState::Extracted)?;

        lifecycle.advance(PageState::Enriching)?;
        let document = enrich(&extracted, &task.url, http_status, task.depth, fetched_at);
        lifecycle.advance(PageState::Enriched)?;

        self.writer.write(&document)?;
        lifecycle.advance(PageState::Written)?;
        self.stats.record_document(&document);

        tracing::debug!(
            "Wrote {} ({} words, {}, {})",
            document.url,
            document.word_count,
            document.language,
            document.content_type
        );

        Ok(())
    }

    fn record_page_error(&mut self, task: &CrawlTask, error: PageError) {
        let kind = error.kind();
        if kind.is_skip() {
            tracing::info!("Skipping {}: {}", task.url, error);
        } else {
            tracing::warn!("Failed {} [{}]: {}", task.url, kind.as_str(), error);
        }
        self.stats.record_failure(kind);
    }
}

/// Runs the main crawl operation
///
/// This function orchestrates the entire crawl process:
///
/// 1. Validate the seed URL and configuration
/// 2. Build the HTTP client and open the output
/// 3. Crawl breadth-first from the seed
/// 4. Close the output and return the statistics
///
/// # Arguments
///
/// * `config` - The crawler configuration
///
/// # Returns
///
/// * `Ok(CrawlStats)` - Crawl completed (possibly with zero documents)
/// * `Err(HarvestError)` - Configuration or output failure
///
/// # Example
///
/// ```no_run
/// use doc_harvest::config::load_config;
/// use doc_harvest::crawler::run_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("config.toml"))?;
/// let stats = run_crawl(config).await?;
/// println!("{} documents", stats.documents_written);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config) -> Result<CrawlStats, HarvestError> {
    Coordinator::new(config)?.run().await
}
