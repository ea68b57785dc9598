//! xorshift64* random number generator
//!
//! 64-bit state, 64-bit output. Same seed → same sequence, which is what
//! makes KPI jitter reproducible in tests and replays.

use serde::{Deserialize, Serialize};

/// Seedable generator injected into the KPI aggregator
///
/// # Example
/// ```
/// use railops_sim_core::RngManager;
///
/// let mut rng = RngManager::new(12345);
/// let sample = rng.next_f64();
/// assert!((0.0..1.0).contains(&sample));
///
/// let jitter = rng.uniform(-1.0, 1.0);
/// assert!((-1.0..1.0).contains(&jitter));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngManager {
    state: u64,
}

impl RngManager {
    pub fn new(seed: u64) -> Self {
        // xorshift must never hold a zero state
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Next raw 64-bit value
    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }

    /// Uniform sample in `[0.0, 1.0)`
    pub fn next_f64(&mut self) -> f64 {
        // Top 53 bits → exact f64 mantissa
        (self.next_u64() >> 11) as f64 * (1.0 / ((1u64 << 53) as f64))
    }

    /// Uniform sample in `[min, max)`
    ///
    /// # Panics
    /// Panics if `min > max`
    pub fn uniform(&mut self, min: f64, max: f64) -> f64 {
        assert!(min <= max, "min must not exceed max");
        min + (max - min) * self.next_f64()
    }

    /// Bernoulli trial: `true` with the given probability
    pub fn chance(&mut self, probability: f64) -> bool {
        self.next_f64() < probability
    }

    /// Current state (a generator rebuilt from it continues the same sequence)
    pub fn get_state(&self) -> u64 {
        self.state
    }
}
