//! Gapped key generation
//!
//! Dense keys with random gaps: every candidate key is independently deleted with
//! a fixed probability before the stream moves past it. Simulates auto-generated
//! primary keys after random deletes.
//!
//! # Example
//!
//! ```
//! use keyforge::distribution::{KeyStream, gapped::GappedStream};
//!
//! let mut keys = GappedStream::with_seed(1, 0.1, 42).unwrap();
//! let values = keys.collect_values(100).unwrap();
//! assert!(values.windows(2).all(|w| w[0] < w[1]));
//! ```

use super::{check_probability, KeyStream};
use crate::error::DatasetError;
use rand::SeedableRng;
use rand_distr::{Bernoulli, Distribution};
use rand_xoshiro::Xoshiro256PlusPlus;

/// Gapped key generator
///
/// Emits a strictly increasing subsequence of `start, start + 1, ...`. Each slot
/// is skipped with probability `delete_probability`, i.i.d. per slot.
pub struct GappedStream {
    /// Next candidate key, `None` once the domain is used up
    next: Option<u64>,

    /// Pre-built Bernoulli(delete_probability) sampler
    delete: Bernoulli,

    /// Random number generator
    rng: Xoshiro256PlusPlus,
}

impl GappedStream {
    /// Create a new gapped stream with random seed
    ///
    /// # Errors
    ///
    /// `InvalidConfiguration` if `delete_probability` is outside `[0, 1)`.
    pub fn new(start: u64, delete_probability: f64) -> Result<Self, DatasetError> {
        Self::with_rng(start, delete_probability, Xoshiro256PlusPlus::from_entropy())
    }

    /// Create a new gapped stream with specific seed
    ///
    /// Useful for reproducible datasets and tests.
    pub fn with_seed(
        start: u64,
        delete_probability: f64,
        seed: u64,
    ) -> Result<Self, DatasetError> {
        Self::with_rng(
            start,
            delete_probability,
            Xoshiro256PlusPlus::seed_from_u64(seed),
        )
    }

    fn with_rng(
        start: u64,
        delete_probability: f64,
        rng: Xoshiro256PlusPlus,
    ) -> Result<Self, DatasetError> {
        check_probability("delete_probability", delete_probability)?;
        let delete = Bernoulli::new(delete_probability)
            .map_err(|e| DatasetError::invalid(format!("delete_probability: {}", e)))?;

        Ok(Self {
            next: Some(start),
            delete,
            rng,
        })
    }
}

impl KeyStream for GappedStream {
    fn next_value(&mut self) -> Result<u64, DatasetError> {
        loop {
            let candidate = self
                .next
                .ok_or(DatasetError::KeyDomainExhausted { last: u64::MAX })?;
            self.next = candidate.checked_add(1);

            if !self.delete.sample(&mut self.rng) {
                return Ok(candidate);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::dense::DenseStream;

    #[test]
    fn test_gapped_zero_probability_is_dense() {
        let mut gapped = GappedStream::with_seed(1, 0.0, 12345).unwrap();
        let mut dense = DenseStream::new(1);

        assert_eq!(
            gapped.collect_values(10_000).unwrap(),
            dense.collect_values(10_000).unwrap()
        );
    }

    #[test]
    fn test_gapped_strictly_increasing() {
        for seed in [1u64, 42, 9001] {
            for p in [0.001, 0.1, 0.5, 0.9] {
                let mut dist = GappedStream::with_seed(1, p, seed).unwrap();
                let values = dist.collect_values(5_000).unwrap();

                assert!(values[0] >= 1);
                assert!(
                    values.windows(2).all(|w| w[0] < w[1]),
                    "not strictly increasing for p={} seed={}",
                    p,
                    seed
                );
            }
        }
    }

    #[test]
    fn test_gapped_seeded() {
        let mut dist1 = GappedStream::with_seed(100, 0.3, 777).unwrap();
        let mut dist2 = GappedStream::with_seed(100, 0.3, 777).unwrap();

        assert_eq!(
            dist1.collect_values(1_000).unwrap(),
            dist2.collect_values(1_000).unwrap()
        );
    }

    #[test]
    fn test_gapped_skip_rate() {
        let mut dist = GappedStream::with_seed(1, 0.25, 42).unwrap();
        let values = dist.collect_values(30_000).unwrap();

        // Emitted / scanned should approach 1 - p = 0.75
        let scanned = values[values.len() - 1] - values[0] + 1;
        let keep_rate = values.len() as f64 / scanned as f64;
        assert!(
            (keep_rate - 0.75).abs() < 0.02,
            "keep rate {} too far from 0.75",
            keep_rate
        );
    }

    #[test]
    fn test_gapped_rejects_probability_one() {
        assert!(matches!(
            GappedStream::new(1, 1.0),
            Err(DatasetError::InvalidConfiguration(_))
        ));
        assert!(GappedStream::with_seed(1, 1.5, 1).is_err());
        assert!(GappedStream::with_seed(1, -0.01, 1).is_err());
    }

    #[test]
    fn test_gapped_exhausts_domain() {
        let mut dist = GappedStream::with_seed(u64::MAX, 0.0, 1).unwrap();
        assert_eq!(dist.next_value().unwrap(), u64::MAX);
        assert!(matches!(
            dist.next_value(),
            Err(DatasetError::KeyDomainExhausted { .. })
        ));
    }
}
