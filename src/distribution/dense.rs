//! Dense key generation
//!
//! Generates consecutive keys starting from a configurable first key. Simulates
//! auto-generated primary keys without deletions.

use crate::distribution::KeyStream;
use crate::error::DatasetError;

/// Dense key generator
///
/// Generates `start, start + 1, start + 2, ...`. Never wraps: once `u64::MAX`
/// has been emitted, the next draw fails with `KeyDomainExhausted`.
#[derive(Debug, Clone)]
pub struct DenseStream {
    /// Next key to emit, `None` once the domain is used up
    next: Option<u64>,
}

impl DenseStream {
    /// Create a new dense stream whose first key is `start`
    pub fn new(start: u64) -> Self {
        Self { next: Some(start) }
    }
}

impl Default for DenseStream {
    fn default() -> Self {
        Self::new(1)
    }
}

impl KeyStream for DenseStream {
    #[inline(always)]
    fn next_value(&mut self) -> Result<u64, DatasetError> {
        let key = self
            .next
            .ok_or(DatasetError::KeyDomainExhausted { last: u64::MAX })?;
        self.next = key.checked_add(1);
        Ok(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dense_basic() {
        let mut dist = DenseStream::new(1);
        assert_eq!(dist.collect_values(5).unwrap(), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_dense_default_starts_at_one() {
        let mut dist = DenseStream::default();
        assert_eq!(dist.next_value().unwrap(), 1);
    }

    #[test]
    fn test_dense_large_range() {
        let mut dist = DenseStream::new(1000);
        for i in 0..100_000u64 {
            assert_eq!(dist.next_value().unwrap(), 1000 + i);
        }
    }

    #[test]
    fn test_dense_emits_max_then_fails() {
        let mut dist = DenseStream::new(u64::MAX - 1);
        assert_eq!(dist.next_value().unwrap(), u64::MAX - 1);
        assert_eq!(dist.next_value().unwrap(), u64::MAX);

        let err = dist.next_value().unwrap_err();
        assert!(matches!(err, DatasetError::KeyDomainExhausted { last: u64::MAX }));
        // Stays exhausted
        assert!(dist.next_value().is_err());
    }
}
