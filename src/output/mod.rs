//! Output module for documents and run statistics
//!
//! This module handles:
//! - The `Document` record and its JSON form
//! - Writing documents as JSONL or as a JSON array
//! - Recording crawl statistics and printing the run summary

mod document;
pub mod stats;
mod writer;

pub use document::{ContentType, Document};
pub use stats::CrawlStats;
pub use writer::{DocumentWriter, OutputFormat};

use thiserror::Error;

/// Output write errors; any of these aborts the crawl
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize document: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to persist output file: {0}")]
    Persist(#[from] tempfile::PersistError),
}
