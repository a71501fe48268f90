//! Error types for key generation and dataset encoding
//!
//! Generation and encoding failures are typed so callers can tell a bad
//! configuration apart from a value that does not fit the chosen width or a
//! failing destination. Application code (config, CLI, runner) wraps these in
//! `anyhow::Error` and can recover them with `downcast_ref::<DatasetError>()`.

use std::io;
use thiserror::Error;

/// Errors raised while generating keys or writing a dataset file
#[derive(Debug, Error)]
pub enum DatasetError {
    /// Distribution parameters or width rejected before any I/O
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A monotone stream would have to emit a value past `u64::MAX`
    #[error("key domain exhausted: next key after {last} does not fit in u64")]
    KeyDomainExhausted { last: u64 },

    /// A generated value does not fit in `bytes_per_number` unsigned bytes
    #[error("value {value} at element {index} does not fit in {bytes_per_number} byte(s)")]
    ValueOutOfRange {
        value: u64,
        index: u64,
        bytes_per_number: u8,
    },

    /// A custom signed stream produced a negative key
    #[error("negative value {value} at element {index}")]
    NegativeValue { value: i64, index: u64 },

    /// A finite custom stream ended before the requested amount was drawn
    #[error("key stream exhausted after {produced} of {requested} elements")]
    StreamExhausted { produced: u64, requested: u64 },

    /// Writer operation issued in the wrong state
    #[error("cannot {operation} while writer is {state}")]
    InvalidState {
        operation: &'static str,
        state: &'static str,
    },

    /// Destination could not be opened, written, flushed, or renamed
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
}

impl DatasetError {
    /// Shorthand for `InvalidConfiguration`
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    /// Wrap an I/O error with a description of what was being attempted
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}
