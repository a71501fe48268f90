//! Key distribution generators
//!
//! This module provides lazy generators of non-negative integer keys following
//! different statistical shapes. Each generator is a pull-based cursor: every call
//! to [`KeyStream::next_value`] advances the state and returns one key. All
//! built-in generators are unbounded; the dataset writer decides how many keys to
//! draw.
//!
//! # Distributions
//!
//! - **Dense**: consecutive keys `start, start+1, ...` (primary keys, no deletes)
//! - **Gapped**: dense keys with each slot independently dropped (deletes)
//! - **Duplicated**: non-decreasing keys where each key may repeat
//! - **Uniform**: independent draws from a half-open range
//!
//! # Randomness
//!
//! Randomized generators own a xoshiro256++ PRNG. `new()` seeds it from OS
//! entropy, `with_seed()` makes a run reproducible.
//!
//! # Example
//!
//! ```
//! use keyforge::distribution::{KeyStream, dense::DenseStream};
//!
//! let mut keys = DenseStream::new(1);
//! assert_eq!(keys.collect_values(5).unwrap(), vec![1, 2, 3, 4, 5]);
//! ```

use crate::config::dataset::DistributionType;
use crate::error::DatasetError;

/// Key generator trait
///
/// Implementations produce an infinite (or, for adapted custom sources, finite)
/// sequence of keys. Generation itself is pure arithmetic plus a PRNG draw; the
/// only failures are a monotone stream running past `u64::MAX` and the contract
/// violations of custom sources (negative keys, early end).
///
/// # Thread Safety
///
/// Streams must be `Send` so independent datasets can be generated on separate
/// threads. Each dataset owns its own stream instance.
pub trait KeyStream: Send {
    /// Advance the stream and return the next key
    fn next_value(&mut self) -> Result<u64, DatasetError>;

    /// Draw `amount` keys into a vector
    ///
    /// Intended for tests and small previews; the dataset writer never
    /// materializes a stream.
    fn collect_values(&mut self, amount: usize) -> Result<Vec<u64>, DatasetError> {
        let mut values = Vec::with_capacity(amount);
        for _ in 0..amount {
            values.push(self.next_value()?);
        }
        Ok(values)
    }
}

impl<S: KeyStream + ?Sized> KeyStream for Box<S> {
    #[inline]
    fn next_value(&mut self) -> Result<u64, DatasetError> {
        (**self).next_value()
    }
}

/// Reject probabilities outside `[0, 1)`
///
/// A probability of exactly 1 would never emit (gapped) or never advance
/// (duplicated).
pub(crate) fn check_probability(name: &str, p: f64) -> Result<(), DatasetError> {
    if !(0.0..1.0).contains(&p) {
        return Err(DatasetError::invalid(format!(
            "{} must be in [0, 1), got {}",
            name, p
        )));
    }
    Ok(())
}

/// Build a boxed stream from a distribution configuration
///
/// `seed` only affects the randomized distributions; dense keys are fully
/// determined by `start`.
pub fn build_stream(
    dist: &DistributionType,
    seed: Option<u64>,
) -> Result<Box<dyn KeyStream>, DatasetError> {
    let stream: Box<dyn KeyStream> = match *dist {
        DistributionType::Dense { start } => Box::new(dense::DenseStream::new(start)),
        DistributionType::Gapped {
            start,
            delete_probability,
        } => Box::new(match seed {
            Some(seed) => gapped::GappedStream::with_seed(start, delete_probability, seed)?,
            None => gapped::GappedStream::new(start, delete_probability)?,
        }),
        DistributionType::Duplicated {
            start,
            duplicate_chance,
        } => Box::new(match seed {
            Some(seed) => {
                duplicated::DuplicatedStream::with_seed(start, duplicate_chance, seed)?
            }
            None => duplicated::DuplicatedStream::new(start, duplicate_chance)?,
        }),
        DistributionType::Uniform { low, high } => Box::new(match (high, seed) {
            (Some(high), Some(seed)) => uniform::UniformStream::with_seed(low, high, seed)?,
            (Some(high), None) => uniform::UniformStream::new(low, high)?,
            (None, Some(seed)) => uniform::UniformStream::to_max_with_seed(low, seed),
            (None, None) => uniform::UniformStream::to_max(low),
        }),
    };

    Ok(stream)
}

pub mod custom;
pub mod dense;
pub mod duplicated;
pub mod gapped;
pub mod uniform;
