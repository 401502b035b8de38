//! Injectable randomness for shuffling and zoom sampling.
//!
//! Everything random in a run flows through a [`RandomSource`]: the shuffle
//! of the input images and the per-clip zoom/pan draws. Production runs use
//! [`XorShift64`] seeded from the config (or the clock when no seed is set),
//! so the same seed always reproduces the same video. Tests use
//! [`SequenceSource`] to script exact values instead of only asserting ranges.

use std::time::{SystemTime, UNIX_EPOCH};

/// A source of uniformly distributed values.
pub trait RandomSource {
    /// Next value in `[0, 1)`.
    fn next_unit(&mut self) -> f64;

    /// Uniform value in `[low, high)`. Returns `low` when the range is empty.
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        if high <= low {
            return low;
        }
        let value = low + (high - low) * self.next_unit();
        // Guard against rounding pushing the sample onto `high`.
        value.min(high).max(low)
    }

    /// Uniform index in `[0, bound)`. `bound` must be non-zero.
    fn index_below(&mut self, bound: usize) -> usize {
        let index = (self.next_unit() * bound as f64) as usize;
        index.min(bound.saturating_sub(1))
    }
}

/// Small deterministic PRNG (xorshift64*).
#[derive(Debug, Clone, Copy)]
pub struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    /// Build a generator from a 64-bit seed.
    ///
    /// `seed = 0` is remapped to a non-zero state so the generator cannot
    /// lock into an all-zero sequence.
    pub const fn from_seed(seed: u64) -> Self {
        let mixed = seed ^ 0x9E37_79B9_7F4A_7C15;
        let state = if mixed == 0 {
            0xA076_1D64_78BD_642F
        } else {
            mixed
        };
        Self { state }
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545_F491_4F6C_DD1D)
    }
}

impl RandomSource for XorShift64 {
    fn next_unit(&mut self) -> f64 {
        // Top 53 bits → exactly representable f64 in [0, 1).
        (self.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    fn index_below(&mut self, bound: usize) -> usize {
        if bound <= 1 {
            return 0;
        }
        let bound = bound as u64;
        let zone = u64::MAX - (u64::MAX % bound);
        loop {
            let sample = self.next_u64();
            if sample < zone {
                return (sample % bound) as usize;
            }
        }
    }
}

/// Scripted source that replays a fixed list of unit values, cycling.
///
/// Values are clamped into `[0, 1)` on the way out so scripts can use `1.0`
/// to mean "as high as possible".
#[derive(Debug, Clone)]
pub struct SequenceSource {
    values: Vec<f64>,
    position: usize,
}

impl SequenceSource {
    pub fn new(values: Vec<f64>) -> Self {
        Self {
            values,
            position: 0,
        }
    }
}

impl RandomSource for SequenceSource {
    fn next_unit(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.position % self.values.len()];
        self.position += 1;
        value.clamp(0.0, 1.0 - f64::EPSILON)
    }
}

/// Fisher–Yates shuffle in place.
pub fn shuffle<T>(items: &mut [T], rng: &mut impl RandomSource) {
    for i in (1..items.len()).rev() {
        let j = rng.index_below(i + 1);
        items.swap(i, j);
    }
}

/// Derive a seed from the wall clock for runs without an explicit seed.
pub fn seed_from_clock() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0x5EED)
}
