//! Fixed-interval throttle between fetches
//!
//! The interval is measured from the completion of the previous fetch, not
//! from its start, so a slow response never shortens the pause.

use std::time::{Duration, Instant};

/// Single shared throttle for the whole crawl
#[derive(Debug, Clone)]
pub struct Throttle {
    delay: Duration,
    last_completed: Option<Instant>,
}

impl Throttle {
    /// Creates a throttle with the given pause between fetches
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            last_completed: None,
        }
    }

    /// Builds a throttle from the configured delay and an optional robots.txt
    /// `Crawl-delay`, whichever is longer
    pub fn effective(config_delay_secs: f64, crawl_delay_secs: Option<f64>) -> Self {
        let configured = Duration::try_from_secs_f64(config_delay_secs).unwrap_or(Duration::ZERO);
        let robots = crawl_delay_secs
            .and_then(|s| Duration::try_from_secs_f64(s).ok())
            .unwrap_or(Duration::ZERO);
        Self::new(configured.max(robots))
    }

    /// Returns the pause between fetches
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Returns how long the next fetch must still wait at `now`
    pub fn remaining(&self, now: Instant) -> Duration {
        match self.last_completed {
            Some(last) => (last + self.delay).saturating_duration_since(now),
            None => Duration::ZERO,
        }
    }

    /// Sleeps until the next fetch may be dispatched
    pub async fn wait(&self) {
        let remaining = self.remaining(Instant::now());
        if !remaining.is_zero() {
            tracing::trace!("Throttling for {:?}", remaining);
            tokio::time::sleep(remaining).await;
        }
    }

    /// Records that a fetch has just completed
    pub fn mark_completed(&mut self) {
        self.last_completed = Some(Instant::now());
    }
}
