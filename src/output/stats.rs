//! Run statistics
//!
//! This module accumulates page outcomes during a crawl and renders the
//! end-of-run summary, both as tracing output and as a human report.

use super::Document;
use crate::crawler::SkipReason;
use crate::FailureKind;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Crawl statistics for one run
#[derive(Debug, Clone, Serialize)]
pub struct CrawlStats {
    /// Pages whose fetch returned HTML
    pub pages_fetched: u64,

    /// Frontier rejections plus pages below the minimum body length
    pub pages_skipped: u64,

    /// Pages that failed to fetch or to parse
    pub pages_failed: u64,

    /// Documents handed to the writer
    pub documents_written: u64,

    /// Failures and content skips by kind
    pub failures_by_kind: BTreeMap<String, u64>,

    /// Frontier rejections by reason
    pub skips_by_reason: BTreeMap<String, u64>,

    /// Sum of `word_count` over written documents
    pub total_words: u64,

    /// Written documents per language code
    pub languages: BTreeMap<String, u64>,

    /// Written documents per content type
    pub content_types: BTreeMap<String, u64>,

    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,

    /// Whether the run was stopped before the frontier was exhausted
    pub interrupted: bool,
}

impl Default for CrawlStats {
    fn default() -> Self {
        Self::new()
    }
}

impl CrawlStats {
    /// Creates empty statistics stamped with the current time
    pub fn new() -> Self {
        Self {
            pages_fetched: 0,
            pages_skipped: 0,
            pages_failed: 0,
            documents_written: 0,
            failures_by_kind: BTreeMap::new(),
            skips_by_reason: BTreeMap::new(),
            total_words: 0,
            languages: BTreeMap::new(),
            content_types: BTreeMap::new(),
            started_at: Utc::now(),
            finished_at: None,
            interrupted: false,
        }
    }

    pub fn record_fetched(&mut self) {
        self.pages_fetched += 1;
    }

    /// Records a per-page failure; content skips count as skipped
    pub fn record_failure(&mut self, kind: FailureKind) {
        if kind.is_skip() {
            self.pages_skipped += 1;
        } else {
            self.pages_failed += 1;
        }
        *self.failures_by_kind.entry(kind.as_str().to_string()).or_insert(0) += 1;
    }

    /// Records a URL the frontier refused
    pub fn record_rejection(&mut self, reason: SkipReason) {
        self.pages_skipped += 1;
        *self.skips_by_reason.entry(reason.as_str().to_string()).or_insert(0) += 1;
    }

    /// Records a document accepted by the writer
    pub fn record_document(&mut self, document: &Document) {
        self.documents_written += 1;
        self.total_words += document.word_count as u64;
        *self.languages.entry(document.language.clone()).or_insert(0) += 1;
        *self
            .content_types
            .entry(document.content_type.as_str().to_string())
            .or_insert(0) += 1;
    }

    /// Stamps the end of the run
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Seconds between start and finish (or now, if still running)
    pub fn duration_seconds(&self) -> f64 {
        let end = self.finished_at.unwrap_or_else(Utc::now);
        let millis = (end - self.started_at).num_milliseconds().max(0);
        millis as f64 / 1000.0
    }

    /// Fetched pages per second over the whole run
    pub fn pages_per_second(&self) -> f64 {
        let secs = self.duration_seconds();
        if secs > 0.0 {
            self.pages_fetched as f64 / secs
        } else {
            0.0
        }
    }

    /// Mean word count of written documents
    pub fn average_words(&self) -> f64 {
        if self.documents_written == 0 {
            0.0
        } else {
            self.total_words as f64 / self.documents_written as f64
        }
    }

    /// Emits the run summary through tracing
    pub fn log_summary(&self) {
        tracing::info!("=== Crawl summary ===");
        tracing::info!("Pages fetched: {}", self.pages_fetched);
        tracing::info!("Pages skipped: {}", self.pages_skipped);
        tracing::info!("Pages failed: {}", self.pages_failed);
        tracing::info!("Documents written: {}", self.documents_written);
        tracing::info!(
            "Duration: {:.1}s ({:.2} pages/sec)",
            self.duration_seconds(),
            self.pages_per_second()
        );

        for (kind, count) in &self.failures_by_kind {
            tracing::info!("  {}: {}", kind, count);
        }
        for (reason, count) in &self.skips_by_reason {
            tracing::debug!("  skipped {}: {}", reason, count);
        }

        if self.interrupted {
            tracing::warn!("Crawl was interrupted; output contains partial results");
        }
    }

    /// Prints the collection report to stdout
    pub fn print_summary(&self) {
        println!("=== Crawl Statistics ===\n");

        println!("Overview:");
        println!("  Pages fetched: {}", self.pages_fetched);
        println!("  Pages skipped: {}", self.pages_skipped);
        println!("  Pages failed: {}", self.pages_failed);
        println!("  Documents written: {}", self.documents_written);
        println!("  Duration: {:.1}s", self.duration_seconds());
        if self.interrupted {
            println!("  (interrupted)");
        }
        println!();

        if self.documents_written == 0 {
            return;
        }

        println!("Collection:");
        println!("  Total words: {}", self.total_words);
        println!("  Average words per page: {:.0}", self.average_words());
        println!();

        println!("Languages:");
        for (language, count) in sorted_desc(&self.languages) {
            println!("  {}: {}", language, count);
        }
        println!();

        println!("Content Types:");
        for (content_type, count) in sorted_desc(&self.content_types) {
            let percentage = (count as f64 / self.documents_written as f64) * 100.0;
            println!("  {}: {} ({:.1}%)", content_type, count, percentage);
        }
        println!();

        if !self.failures_by_kind.is_empty() {
            println!("Problems:");
            for (kind, count) in sorted_desc(&self.failures_by_kind) {
                println!("  {}: {}", kind, count);
            }
            println!();
        }
    }
}

/// Sorts map entries by count (descending), then by key
fn sorted_desc(map: &BTreeMap<String, u64>) -> Vec<(&str, u64)> {
    let mut entries: Vec<_> = map.iter().map(|(k, v)| (k.as_str(), *v)).collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::ContentType;

    fn document(words: usize, language: &str, content_type: ContentType) -> Document {
        Document {
            url: "https://example.com/".to_string(),
            title: String::new(),
            body_text: "w ".repeat(words).trim_end().to_string(),
            word_count: words,
            char_count: words * 2 - 1,
            language: language.to_string(),
            content_type,
            fetched_at: Utc::now(),
            estimated_read_time_minutes: 0.0,
            has_code_blocks: false,
            link_density: 0.0,
            paragraph_count: 1,
            http_status: 200,
            crawl_depth: 0,
        }
    }

    #[test]
    fn test_new_stats_empty() {
        let stats = CrawlStats::new();
        assert_eq!(stats.pages_fetched, 0);
        assert_eq!(stats.documents_written, 0);
        assert_eq!(stats.average_words(), 0.0);
        assert!(stats.finished_at.is_none());
        assert!(!stats.interrupted);
    }

    #[test]
    fn test_failures_and_skips() {
        let mut stats = CrawlStats::new();
        stats.record_failure(FailureKind::HttpStatusError);
        stats.record_failure(FailureKind::TransportError);
        stats.record_failure(FailureKind::InsufficientContent);
        stats.record_rejection(SkipReason::AlreadySeen);
        stats.record_rejection(SkipReason::AlreadySeen);

        assert_eq!(stats.pages_failed, 2);
        assert_eq!(stats.pages_skipped, 3);
        assert_eq!(stats.failures_by_kind.get("http_status_error"), Some(&1));
        assert_eq!(stats.failures_by_kind.get("insufficient_content"), Some(&1));
        assert_eq!(stats.skips_by_reason.get("already_seen"), Some(&2));
    }

    #[test]
    fn test_document_aggregates() {
        let mut stats = CrawlStats::new();
        stats.record_document(&document(10, "en", ContentType::Article));
        stats.record_document(&document(30, "en", ContentType::DocPage));
        stats.record_document(&document(20, "de", ContentType::Article));

        assert_eq!(stats.documents_written, 3);
        assert_eq!(stats.total_words, 60);
        assert_eq!(stats.average_words(), 20.0);
        assert_eq!(stats.languages.get("en"), Some(&2));
        assert_eq!(stats.content_types.get("article"), Some(&2));
        assert_eq!(stats.content_types.get("doc_page"), Some(&1));
    }

    #[test]
    fn test_finish_and_rates() {
        let mut stats = CrawlStats::new();
        stats.pages_fetched = 10;
        stats.started_at = Utc::now() - chrono::Duration::seconds(5);
        stats.finish();

        assert!(stats.finished_at.is_some());
        let secs = stats.duration_seconds();
        assert!(secs >= 5.0 && secs < 6.0);
        let rate = stats.pages_per_second();
        assert!(rate > 1.5 && rate <= 2.0);
    }

    #[test]
    fn test_sorted_desc() {
        let mut map = BTreeMap::new();
        map.insert("b".to_string(), 1);
        map.insert("a".to_string(), 1);
        map.insert("c".to_string(), 5);
        assert_eq!(sorted_desc(&map), vec![("c", 5), ("a", 1), ("b", 1)]);
    }

    #[test]
    fn test_serializes() {
        let stats = CrawlStats::new();
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["pages_fetched"], 0);
        assert!(json["finished_at"].is_null());
    }
}
