//! Run configuration for one scrape.
//!
//! Every knob is an explicit field sourced by the caller (in practice the
//! CLI). The engine never reads configuration from ambient state.

use std::time::Duration;

/// An inclusive `[min, max]` delay window in seconds.
pub type DelayRange = (f64, f64);

/// Tuning parameters for the load-and-extract pipeline.
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    /// Stop scrolling once this many items are rendered; also caps how many
    /// items one extraction pass will scan.
    pub target_items: usize,
    /// Pause after each synthetic scroll, seconds.
    pub scroll_pause: DelayRange,
    /// Magnitude of each synthetic scroll, pixels.
    pub scroll_step: (i64, i64),
    /// Upper bound on scroll attempts; the loader never errors on
    /// exhaustion, it returns the best count achieved.
    pub max_scroll_attempts: u32,
    /// Probability of an additional reading pause after a scroll.
    pub burst_chance: f64,
    /// Length of the reading pause, seconds.
    pub burst_pause: DelayRange,
    /// How many extraction passes to attempt before settling for no data.
    pub retry_passes: u32,
    /// Pause between failed extraction passes, seconds.
    pub retry_backoff: DelayRange,
    /// Pre-run pause letting the externally-completed session settle,
    /// seconds.
    pub settle_delay: DelayRange,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            target_items: 500,
            scroll_pause: (1.0, 2.0),
            scroll_step: (500, 1200),
            max_scroll_attempts: 200,
            burst_chance: 0.2,
            burst_pause: (0.5, 1.5),
            retry_passes: 5,
            retry_backoff: (3.0, 5.0),
            settle_delay: (5.0, 8.0),
        }
    }
}

/// Convert a seconds value to a `Duration`, clamping negatives to zero.
pub fn secs(value: f64) -> Duration {
    Duration::from_secs_f64(value.max(0.0))
}
