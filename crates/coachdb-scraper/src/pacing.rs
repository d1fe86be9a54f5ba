//! Politeness and human-like timing.
//!
//! A [`Pacer`] is injected into strategies and the batch loop instead of
//! scattered `sleep` calls: every delay goes through one policy object, and
//! tests run with [`Pacer::zero`] for determinism. Delays are randomized
//! around the base value rather than fixed so navigation timing does not look
//! machine-regular.

use std::time::Duration;

use rand::Rng;

#[derive(Debug, Clone, Copy)]
pub struct Pacer {
    base: Duration,
    jitter_ratio: f64,
}

impl Pacer {
    /// `jitter_ratio` is clamped to `[0.0, 1.0]`; the actual delay is drawn
    /// uniformly from `base × (1 ± jitter_ratio)`.
    #[must_use]
    pub fn new(base_ms: u64, jitter_ratio: f64) -> Self {
        Self {
            base: Duration::from_millis(base_ms),
            jitter_ratio: jitter_ratio.clamp(0.0, 1.0),
        }
    }

    /// A pacer that never sleeps, for tests.
    #[must_use]
    pub fn zero() -> Self {
        Self::new(0, 0.0)
    }

    /// Draw the next delay from the jitter window.
    #[must_use]
    pub fn next_delay(&self) -> Duration {
        if self.base.is_zero() {
            return Duration::ZERO;
        }
        if self.jitter_ratio == 0.0 {
            return self.base;
        }
        let spread = self.base.as_secs_f64() * self.jitter_ratio;
        let lo = (self.base.as_secs_f64() - spread).max(0.0);
        let hi = self.base.as_secs_f64() + spread;
        Duration::from_secs_f64(rand::rng().random_range(lo..=hi))
    }

    /// Sleep for one jittered delay.
    pub async fn pause(&self) {
        let delay = self.next_delay();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}
