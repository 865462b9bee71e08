//! Clock and randomness abstractions for identifier generation.
//!
//! Order numbers and SKUs embed a datestamp and a random suffix. Both
//! inputs are injected so generation is deterministic under test; the
//! retry loops in the domain services run against an injected uniqueness
//! check rather than global state.

use chrono::{DateTime, Utc};
use rand::Rng;

/// Source of the current time.
pub trait Clock: Send + Sync {
    /// Returns the current UTC time.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Source of random suffixes for generated identifiers.
pub trait RandomSource: Send + Sync {
    /// Returns a uniformly distributed value in `0..bound`.
    ///
    /// `bound` must be non-zero.
    fn next_below(&self, bound: u32) -> u32;
}

/// Thread-local RNG implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRngSource;

impl RandomSource for ThreadRngSource {
    fn next_below(&self, bound: u32) -> u32 {
        rand::thread_rng().gen_range(0..bound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_is_monotonic_enough() {
        let clock = SystemClock;
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }

    #[test]
    fn test_thread_rng_respects_bound() {
        let source = ThreadRngSource;
        for _ in 0..100 {
            assert!(source.next_below(10) < 10);
        }
    }
}
