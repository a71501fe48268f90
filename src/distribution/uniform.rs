//! Uniform random key generation
//!
//! Every key is drawn independently with equal probability from a fixed range.
//! No ordering guarantee; duplicates are possible and expected.
//!
//! # Performance
//!
//! Uses the xoshiro256++ PRNG and a pre-built `Uniform` sampler, so a draw is a
//! handful of integer operations. This matters at hundreds of millions of keys.
//!
//! # Example
//!
//! ```
//! use keyforge::distribution::{KeyStream, uniform::UniformStream};
//!
//! let mut keys = UniformStream::with_seed(0, 100, 42).unwrap();
//! for _ in 0..10 {
//!     let key = keys.next_value().unwrap();
//!     assert!(key < 100);
//! }
//! ```

use super::KeyStream;
use crate::error::DatasetError;
use rand::SeedableRng;
use rand_distr::{Distribution, Uniform};
use rand_xoshiro::Xoshiro256PlusPlus;

/// Uniform random key generator
///
/// Draws from `[low, high)`, or from `[low, u64::MAX]` for the `to_max` forms.
pub struct UniformStream {
    low: u64,

    /// Exclusive upper bound, `None` for "through `u64::MAX`"
    high: Option<u64>,

    range: Uniform<u64>,

    rng: Xoshiro256PlusPlus,
}

impl UniformStream {
    /// Create a new uniform stream over `[low, high)` with random seed
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` if `low >= high`.
    pub fn new(low: u64, high: u64) -> Result<Self, DatasetError> {
        Self::half_open(low, high, Xoshiro256PlusPlus::from_entropy())
    }

    /// Create a new uniform stream over `[low, high)` with specific seed
    ///
    /// Useful for reproducible tests.
    pub fn with_seed(low: u64, high: u64, seed: u64) -> Result<Self, DatasetError> {
        Self::half_open(low, high, Xoshiro256PlusPlus::seed_from_u64(seed))
    }

    /// Uniform over `[low, u64::MAX]` with random seed
    pub fn to_max(low: u64) -> Self {
        Self::through_max(low, Xoshiro256PlusPlus::from_entropy())
    }

    /// Uniform over `[low, u64::MAX]` with specific seed
    pub fn to_max_with_seed(low: u64, seed: u64) -> Self {
        Self::through_max(low, Xoshiro256PlusPlus::seed_from_u64(seed))
    }

    fn half_open(low: u64, high: u64, rng: Xoshiro256PlusPlus) -> Result<Self, DatasetError> {
        if low >= high {
            return Err(DatasetError::invalid(format!(
                "uniform range requires low < high, got [{}, {})",
                low, high
            )));
        }

        Ok(Self {
            low,
            high: Some(high),
            range: Uniform::new(low, high),
            rng,
        })
    }

    fn through_max(low: u64, rng: Xoshiro256PlusPlus) -> Self {
        Self {
            low,
            high: None,
            range: Uniform::new_inclusive(low, u64::MAX),
            rng,
        }
    }

    /// Lower bound (inclusive)
    pub fn low(&self) -> u64 {
        self.low
    }

    /// Upper bound (exclusive), `None` when the range runs through `u64::MAX`
    pub fn high(&self) -> Option<u64> {
        self.high
    }
}

impl KeyStream for UniformStream {
    #[inline(always)]
    fn next_value(&mut self) -> Result<u64, DatasetError> {
        Ok(self.range.sample(&mut self.rng))
    }
}
