use std::time::Duration;

use rand::Rng;

/// Exponential backoff with subtractive jitter. The delay after `n`
/// consecutive failures is `min(max, base * 2^(n-1))`, shortened by a random
/// share of up to `jitter_fraction`, so it never exceeds `max`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Backoff {
    pub base: Duration,
    pub max: Duration,
    pub jitter_fraction: f64,
}

impl Default for Backoff {
    fn default() -> Self {
        Self {
            base: Duration::from_secs(2),
            max: Duration::from_secs(60),
            jitter_fraction: 0.25,
        }
    }
}

impl Backoff {
    /// Upper bound of the delay for the given failure count, before jitter.
    pub fn ceiling(&self, failures: u32) -> Duration {
        if failures == 0 {
            return Duration::ZERO;
        }
        let exponent = (failures - 1).min(31);
        self.base.saturating_mul(1u32 << exponent).min(self.max)
    }

    pub fn delay<R: Rng + ?Sized>(&self, failures: u32, rng: &mut R) -> Duration {
        let ceiling = self.ceiling(failures);
        let fraction = self.jitter_fraction.clamp(0.0, 1.0);
        if fraction == 0.0 || ceiling.is_zero() {
            return ceiling;
        }

        let cut = ceiling.mul_f64(rng.gen_range(0.0..=fraction));
        ceiling.saturating_sub(cut)
    }
}

#[cfg(test)]
#[path = "tests/backoff_tests.rs"]
mod tests;
