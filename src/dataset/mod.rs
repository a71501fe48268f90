//! Binary dataset format
//!
//! A dataset file is an 8-byte little-endian element count followed by exactly
//! that many fixed-width little-endian unsigned integers:
//!
//! ```text
//! offset 0..8   : count (u64, little-endian)
//! offset 8..end : count * bytes_per_number bytes
//! ```
//!
//! There is no magic number, version, or checksum. The element width travels in
//! the file name (`<name>_uint<bits>`), so a file is exactly
//! `8 + count * bytes_per_number` bytes long.
//!
//! # Example
//!
//! ```
//! use keyforge::dataset::{ByteWidth, dataset_file_name, expected_file_size};
//!
//! let width = ByteWidth::try_from(4u8).unwrap();
//! assert_eq!(dataset_file_name("consecutive_100M", width), "consecutive_100M_uint32");
//! assert_eq!(expected_file_size(10, width), 48);
//! ```

pub mod writer;

pub use writer::{write_dataset, write_dataset_file, DatasetWriter, WriteOptions, WriterState};

use crate::error::DatasetError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Length of the count header in bytes
pub const HEADER_LEN: usize = 8;

/// Element width in bytes
///
/// Only power-of-two widths up to 8 bytes are supported; other values are
/// rejected as invalid configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ByteWidth {
    One = 1,
    Two = 2,
    Four = 4,
    Eight = 8,
}

impl ByteWidth {
    /// Width in bytes
    #[inline]
    pub fn bytes(self) -> usize {
        self as usize
    }

    /// Width in bits, as used in file names
    #[inline]
    pub fn bits(self) -> u32 {
        self as u32 * 8
    }

    /// Largest value representable in this width
    #[inline]
    pub fn max_value(self) -> u64 {
        match self {
            Self::One => u8::MAX as u64,
            Self::Two => u16::MAX as u64,
            Self::Four => u32::MAX as u64,
            Self::Eight => u64::MAX,
        }
    }

    /// Whether `value` fits without truncation
    #[inline]
    pub fn fits(self, value: u64) -> bool {
        value <= self.max_value()
    }
}

impl Default for ByteWidth {
    fn default() -> Self {
        Self::Eight
    }
}

impl TryFrom<u8> for ByteWidth {
    type Error = DatasetError;

    fn try_from(bytes: u8) -> Result<Self, Self::Error> {
        match bytes {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            4 => Ok(Self::Four),
            8 => Ok(Self::Eight),
            other => Err(DatasetError::invalid(format!(
                "bytes_per_number must be one of 1, 2, 4, 8, got {}",
                other
            ))),
        }
    }
}

impl From<ByteWidth> for u8 {
    fn from(width: ByteWidth) -> Self {
        width as u8
    }
}

impl fmt::Display for ByteWidth {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "uint{}", self.bits())
    }
}

/// One encoded element, `width` bytes of little-endian data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodedValue {
    bytes: [u8; 8],
    len: usize,
}

impl EncodedValue {
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }
}

/// Encode the count header
#[inline]
pub fn encode_header(count: u64) -> [u8; HEADER_LEN] {
    count.to_le_bytes()
}

/// Encode one element at position `index`
///
/// # Errors
///
/// `ValueOutOfRange` if `value` needs more than `width` bytes. Nothing is
/// truncated.
#[inline]
pub fn encode_value(value: u64, index: u64, width: ByteWidth) -> Result<EncodedValue, DatasetError> {
    if !width.fits(value) {
        return Err(DatasetError::ValueOutOfRange {
            value,
            index,
            bytes_per_number: width.into(),
        });
    }

    Ok(EncodedValue {
        bytes: value.to_le_bytes(),
        len: width.bytes(),
    })
}

/// File name for a dataset: `<name>_uint<bits>`
pub fn dataset_file_name(name: &str, width: ByteWidth) -> String {
    format!("{}_{}", name, width)
}

/// Exact size in bytes of a dataset holding `count` elements
///
/// Returns `None` if the size does not fit in a `u64`.
pub fn checked_file_size(count: u64, width: ByteWidth) -> Option<u64> {
    count
        .checked_mul(width.bytes() as u64)
        .and_then(|payload| payload.checked_add(HEADER_LEN as u64))
}

/// Exact size in bytes of a dataset holding `count` elements
///
/// Saturates at `u64::MAX` for counts no file system could hold.
pub fn expected_file_size(count: u64, width: ByteWidth) -> u64 {
    checked_file_size(count, width).unwrap_or(u64::MAX)
}
