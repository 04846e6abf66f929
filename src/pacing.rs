//! Injected pacing source for human-like timing jitter.
//!
//! All randomness in the engine flows through the [`Pacer`] trait: uniform
//! delays within a `[min, max]` window, uniform scroll magnitudes, and
//! Bernoulli draws for occasional longer "reading" pauses. Timing policy is
//! therefore a constructor argument, not process-wide mutable state, and
//! tests inject a zero-variance pacer to make the loader and extractor
//! fully deterministic.
//!
//! The jitter is a deliberate anti-detection measure carried over from the
//! session's human-pacing behavior, not noise to be removed.

use crate::config::{secs, DelayRange};
use rand::Rng;
use std::time::Duration;

/// Source of pacing decisions for the loader and extractor.
pub trait Pacer: Send {
    /// A delay drawn uniformly from `[min, max]` seconds.
    fn delay(&mut self, range: DelayRange) -> Duration;
    /// A scroll magnitude drawn uniformly from `[min, max]` pixels.
    fn scroll_amount(&mut self, range: (i64, i64)) -> i64;
    /// One Bernoulli draw with the given probability.
    fn chance(&mut self, probability: f64) -> bool;
}

/// Production pacer backed by the thread-local RNG.
#[derive(Debug, Default)]
pub struct HumanPacer;

impl HumanPacer {
    pub fn new() -> Self {
        Self
    }
}

impl Pacer for HumanPacer {
    fn delay(&mut self, range: DelayRange) -> Duration {
        let (min, max) = range;
        if max <= min {
            return secs(min);
        }
        secs(rand::thread_rng().gen_range(min..=max))
    }

    fn scroll_amount(&mut self, range: (i64, i64)) -> i64 {
        let (min, max) = range;
        if max <= min {
            return min;
        }
        rand::thread_rng().gen_range(min..=max)
    }

    fn chance(&mut self, probability: f64) -> bool {
        rand::thread_rng().gen_bool(probability.clamp(0.0, 1.0))
    }
}

/// Zero-variance pacer for tests: always the range minimum, bursts decided
/// by a fixed answer instead of a draw.
#[derive(Debug)]
pub struct FixedPacer {
    burst: bool,
}

impl FixedPacer {
    /// A pacer that never takes burst pauses.
    pub fn new() -> Self {
        Self { burst: false }
    }

    /// A pacer whose burst draws always return `burst`.
    pub fn with_burst(burst: bool) -> Self {
        Self { burst }
    }
}

impl Default for FixedPacer {
    fn default() -> Self {
        Self::new()
    }
}

impl Pacer for FixedPacer {
    fn delay(&mut self, range: DelayRange) -> Duration {
        secs(range.0)
    }

    fn scroll_amount(&mut self, range: (i64, i64)) -> i64 {
        range.0
    }

    fn chance(&mut self, _probability: f64) -> bool {
        self.burst
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_human_pacer_stays_in_range() {
        let mut pacer = HumanPacer::new();
        for _ in 0..100 {
            let d = pacer.delay((0.5, 1.5));
            assert!(d >= Duration::from_millis(500));
            assert!(d <= Duration::from_millis(1500));

            let px = pacer.scroll_amount((500, 1200));
            assert!((500..=1200).contains(&px));
        }
    }

    #[test]
    fn test_human_pacer_degenerate_range() {
        let mut pacer = HumanPacer::new();
        assert_eq!(pacer.delay((2.0, 2.0)), Duration::from_secs(2));
        assert_eq!(pacer.scroll_amount((700, 700)), 700);
    }

    #[test]
    fn test_chance_extremes() {
        let mut pacer = HumanPacer::new();
        assert!(!pacer.chance(0.0));
        assert!(pacer.chance(1.0));
        // Out-of-range probabilities are clamped, not panicked on.
        assert!(pacer.chance(2.0));
    }

    #[test]
    fn test_fixed_pacer_is_deterministic() {
        let mut pacer = FixedPacer::new();
        assert_eq!(pacer.delay((3.0, 5.0)), Duration::from_secs(3));
        assert_eq!(pacer.scroll_amount((500, 1200)), 500);
        assert!(!pacer.chance(1.0));

        let mut bursty = FixedPacer::with_burst(true);
        assert!(bursty.chance(0.0));
    }
}
