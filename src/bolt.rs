//! Fractal lightning bolt generation.
//!
//! A bolt starts as one straight segment from a point high in the cloud to a
//! point on the ground. The segment is split at a randomly displaced midpoint,
//! and both halves are split again, until the segment budget is spent.
//!
//! The budget (how many final segments a subtree must produce) drives the
//! recursion instead of a depth limit, so every bolt has exactly
//! `max_segments` segments. Segment storage is reserved once at construction
//! and reused by every [`LightningBolt::generate`] call.
//!
//! # Example
//!
//! ```
//! use thunderclap::LightningBolt;
//!
//! let mut bolt = LightningBolt::new(1000, 42);
//! bolt.generate(3000.0, 1000.0, 1.0).unwrap();
//! assert_eq!(bolt.segments().len(), 1000);
//! ```

use crate::config::BoltConfig;
use crate::error::{LightningError, Result};
use crate::geometry::{distance, Point3, Segment};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, StandardNormal};
use std::f64::consts::SQRT_2;

/// Midpoint displacement per unit of jaggedness, as a fraction of the
/// length of the segment being split.
pub const JAG_FACTOR: f64 = 0.15;

/// Source of randomness for bolt generation.
///
/// Every [`RngCore`] already is one. Implement it directly to drive the
/// generator from a scripted sequence.
pub trait BoltRandom {
    /// A draw from the standard normal distribution.
    fn gaussian(&mut self) -> f64;

    /// A fair coin flip.
    fn coin(&mut self) -> bool;
}

impl<R: RngCore> BoltRandom for R {
    #[inline]
    fn gaussian(&mut self) -> f64 {
        StandardNormal.sample(self)
    }

    #[inline]
    fn coin(&mut self) -> bool {
        self.next_u32() & 1 == 1
    }
}

/// Split `budget` as evenly as possible between two halves.
///
/// When the budget is odd the extra unit goes to the first half if
/// `extra_to_first` is set, otherwise to the second.
#[inline]
pub fn split_budget(budget: usize, extra_to_first: bool) -> (usize, usize) {
    let half = budget / 2;
    match (budget & 1 == 1, extra_to_first) {
        (true, true) => (half + 1, half),
        (true, false) => (half, half + 1),
        (false, _) => (half, half),
    }
}

/// A fractal lightning channel with a fixed segment budget.
///
/// The random engine belongs to this bolt alone, so two bolts built with the
/// same seed produce identical sequences of bolts. The default engine is
/// ChaCha8, whose output for a given seed is the same on every platform.
pub struct LightningBolt<R = ChaCha8Rng> {
    segments: Vec<Segment>,
    max_segments: usize,
    jag: f64,
    rng: R,
}

impl LightningBolt<ChaCha8Rng> {
    /// Create a bolt with room for `max_segments` segments, seeded for
    /// reproducible output.
    pub fn new(max_segments: usize, seed: u64) -> Self {
        Self::with_rng(max_segments, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R> LightningBolt<R> {
    /// Segment budget fixed at construction.
    #[inline]
    pub fn max_segments(&self) -> usize {
        self.max_segments
    }

    /// Segments of the most recent bolt, in generation order.
    #[inline]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Cloud end of the most recent bolt.
    pub fn top(&self) -> Option<Point3> {
        self.segments.first().map(|s| s.a)
    }

    /// Ground end of the most recent bolt.
    pub fn bottom(&self) -> Option<Point3> {
        self.segments.last().map(|s| s.b)
    }

    /// Total length of the channel, following every segment.
    pub fn channel_length(&self) -> f64 {
        self.segments.iter().map(Segment::length).sum()
    }
}

impl<R: BoltRandom> LightningBolt<R> {
    /// Create a bolt driven by the given random source.
    pub fn with_rng(max_segments: usize, rng: R) -> Self {
        // All allocation happens here; generate() only ever reuses this.
        Self {
            segments: Vec::with_capacity(max_segments),
            max_segments,
            jag: 0.0,
            rng,
        }
    }

    /// Replace the current bolt with a freshly generated one.
    ///
    /// * `height_meters` - Height of the top end above ground
    /// * `radius_meters` - Standard deviation of the horizontal offset of each end
    /// * `jaggedness` - Midpoint displacement multiplier (1.0 is lightning-like)
    ///
    /// Errors only on a broken budget invariant, which is fatal.
    pub fn generate(&mut self, height_meters: f64, radius_meters: f64, jaggedness: f64) -> Result<()> {
        self.segments.clear();

        if self.max_segments > 0 {
            let top = self.random_horizontal(height_meters, radius_meters);
            let bottom = self.random_horizontal(0.0, radius_meters);

            self.jag = JAG_FACTOR * jaggedness;
            self.crinkle(top, bottom, self.max_segments)?;
        }

        debug_assert!(self.segments.len() <= self.segments.capacity());
        log::debug!(
            "generated bolt: {} segments, {:.1} m of channel",
            self.segments.len(),
            self.channel_length()
        );
        Ok(())
    }

    /// [`generate`](Self::generate) with parameters taken from a config.
    pub fn generate_with(&mut self, config: &BoltConfig) -> Result<()> {
        self.generate(config.height_meters, config.radius_meters, config.jaggedness)
    }

    /// A point at height `z`, offset horizontally so the offset magnitude has
    /// standard deviation `radius`.
    fn random_horizontal(&mut self, z: f64, radius: f64) -> Point3 {
        let r = radius / SQRT_2;
        let x = r * self.rng.gaussian();
        let y = r * self.rng.gaussian();
        Point3::new(x, y, z)
    }

    fn crinkle(&mut self, first: Point3, second: Point3, budget: usize) -> Result<()> {
        match budget {
            0 => Err(LightningError::EmptyBudget),
            1 => {
                self.segments.push(Segment::new(first, second));
                Ok(())
            }
            _ => {
                let disp = self.jag * distance(first, second);
                let mut mid = Segment::new(first, second).midpoint();
                mid.x += disp * self.rng.gaussian();
                mid.y += disp * self.rng.gaussian();
                mid.z += disp * self.rng.gaussian();

                let extra_to_first = budget & 1 == 1 && self.rng.coin();
                let (first_budget, second_budget) = split_budget(budget, extra_to_first);
                if first_budget + second_budget != budget {
                    return Err(LightningError::BudgetMismatch {
                        budget,
                        first: first_budget,
                        second: second_budget,
                    });
                }

                self.crinkle(first, mid, first_budget)?;
                self.crinkle(mid, second, second_budget)
            }
        }
    }
}
