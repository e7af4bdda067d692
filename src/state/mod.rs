//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `PageState`: the states a dispatched page moves through (fetching, extracting, enriching, written)
//! - `PageLifecycle`: enforces the legal order of those states for one task

mod page_state;

// Re-export main types
pub use page_state::{PageLifecycle, PageState};
