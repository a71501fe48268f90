//! Adapters for caller-supplied key sources
//!
//! Any iterator can feed the dataset writer. Unsigned sources are passed through
//! unchanged; signed sources are checked so a negative key fails loudly instead
//! of being reinterpreted as a huge unsigned value.

use super::KeyStream;
use crate::error::DatasetError;

/// Wraps an `Iterator<Item = u64>`
///
/// Finite iterators are allowed. Running dry yields `StreamExhausted`; the writer
/// fills in the requested amount.
#[derive(Debug, Clone)]
pub struct IterStream<I> {
    inner: I,
    produced: u64,
}

impl<I> IterStream<I>
where
    I: Iterator<Item = u64> + Send,
{
    pub fn new(inner: I) -> Self {
        Self { inner, produced: 0 }
    }
}

impl<I> KeyStream for IterStream<I>
where
    I: Iterator<Item = u64> + Send,
{
    fn next_value(&mut self) -> Result<u64, DatasetError> {
        match self.inner.next() {
            Some(key) => {
                self.produced += 1;
                Ok(key)
            }
            None => Err(DatasetError::StreamExhausted {
                produced: self.produced,
                requested: 0,
            }),
        }
    }
}

/// Wraps an `Iterator<Item = i64>`, rejecting negative keys
#[derive(Debug, Clone)]
pub struct SignedStream<I> {
    inner: I,
    produced: u64,
}

impl<I> SignedStream<I>
where
    I: Iterator<Item = i64> + Send,
{
    pub fn new(inner: I) -> Self {
        Self { inner, produced: 0 }
    }
}

impl<I> KeyStream for SignedStream<I>
where
    I: Iterator<Item = i64> + Send,
{
    fn next_value(&mut self) -> Result<u64, DatasetError> {
        let index = self.produced;
        let value = self.inner.next().ok_or(DatasetError::StreamExhausted {
            produced: index,
            requested: 0,
        })?;

        let key = u64::try_from(value).map_err(|_| DatasetError::NegativeValue { value, index })?;
        self.produced += 1;
        Ok(key)
    }
}
