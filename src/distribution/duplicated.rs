//! Duplicated key generation
//!
//! Non-decreasing keys where each emitted key is repeated with a fixed
//! probability. Simulates monotone keys with duplicates (e.g. timestamps or
//! foreign keys).

use super::{check_probability, KeyStream};
use crate::error::DatasetError;
use rand::SeedableRng;
use rand_distr::{Bernoulli, Distribution};
use rand_xoshiro::Xoshiro256PlusPlus;

/// Duplicated key generator
///
/// After every emission, the current key is kept with probability
/// `duplicate_chance` and incremented by one otherwise.
pub struct DuplicatedStream {
    /// Key to emit next, `None` once incremented past `u64::MAX`
    current: Option<u64>,

    /// Pre-built Bernoulli(duplicate_chance) sampler
    repeat: Bernoulli,

    /// Random number generator
    rng: Xoshiro256PlusPlus,
}

impl DuplicatedStream {
    /// Create a new duplicated stream with random seed
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` if `duplicate_chance` is outside `[0, 1)`.
    pub fn new(start: u64, duplicate_chance: f64) -> Result<Self, DatasetError> {
        Self::with_rng(start, duplicate_chance, Xoshiro256PlusPlus::from_entropy())
    }

    /// Create a new duplicated stream with specific seed
    pub fn with_seed(start: u64, duplicate_chance: f64, seed: u64) -> Result<Self, DatasetError> {
        Self::with_rng(start, duplicate_chance, Xoshiro256PlusPlus::seed_from_u64(seed))
    }

    fn with_rng(
        start: u64,
        duplicate_chance: f64,
        rng: Xoshiro256PlusPlus,
    ) -> Result<Self, DatasetError> {
        check_probability("duplicate_chance", duplicate_chance)?;
        let repeat = Bernoulli::new(duplicate_chance)
            .map_err(|e| DatasetError::invalid(format!("duplicate_chance: {}", e)))?;

        Ok(Self {
            current: Some(start),
            repeat,
            rng,
        })
    }
}

impl KeyStream for DuplicatedStream {
    fn next_value(&mut self) -> Result<u64, DatasetError> {
        let key = self
            .current
            .ok_or(DatasetError::KeyDomainExhausted { last: u64::MAX })?;

        if !self.repeat.sample(&mut self.rng) {
            self.current = key.checked_add(1);
        }

        Ok(key)
    }
}
