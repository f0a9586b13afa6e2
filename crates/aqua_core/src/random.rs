//! Creature-local randomness.
//!
//! Each creature owns its own [`RandomSource`], seeded from its id, so phase
//! and drift retargeting are reproducible and independent of how many other
//! creatures exist or in which order they tick.

use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::math::clamp01;

/// Mixes a base seed with a creature id so neighbouring ids do not produce
/// correlated streams.
#[inline]
#[must_use]
pub fn creature_seed(base_seed: u64, creature_id: u64) -> u64 {
    // splitmix64 finalizer
    let mut z = base_seed ^ creature_id.wrapping_mul(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Source of uniform samples in `[0, 1)`.
pub trait RandomSource: Send {
    fn next_unit(&mut self) -> f32;

    /// Uniform sample within `range`. A zero-width range returns its bound.
    fn sample(&mut self, range: ValueRange) -> f32 {
        range.at(self.next_unit())
    }
}

/// Default per-creature generator.
pub struct CreatureRng {
    rng: StdRng,
}

impl CreatureRng {
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for CreatureRng {
    fn next_unit(&mut self) -> f32 {
        self.rng.random_range(0.0..1.0f32)
    }
}

/// Closed `[min, max]` interval of `f32` values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 2]", into = "[f32; 2]")]
pub struct ValueRange {
    pub min: f32,
    pub max: f32,
}

impl ValueRange {
    /// Creates a range, swapping the bounds if given in reverse.
    #[must_use]
    pub fn new(a: f32, b: f32) -> Self {
        if a <= b {
            Self { min: a, max: b }
        } else {
            Self { min: b, max: a }
        }
    }

    #[inline]
    #[must_use]
    pub fn at(&self, t: f32) -> f32 {
        (self.min + (self.max - self.min) * clamp01(t)).max(self.min).min(self.max)
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, v: f32) -> bool {
        v >= self.min && v <= self.max
    }

    #[inline]
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }
}

impl From<[f32; 2]> for ValueRange {
    fn from([a, b]: [f32; 2]) -> Self {
        Self::new(a, b)
    }
}

impl From<ValueRange> for [f32; 2] {
    fn from(r: ValueRange) -> Self {
        [r.min, r.max]
    }
}
