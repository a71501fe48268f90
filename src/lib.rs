//! keyforge - synthetic sorted-key dataset generator
//!
//! keyforge writes large binary files of unsigned integer keys for benchmarking
//! sorted-key data structures (learned indexes, B-trees, search algorithms).
//!
//! # Architecture
//!
//! - **Distributions**: dense, gapped, duplicated, and uniform key streams
//!   behind the [`distribution::KeyStream`] trait, each with a seedable PRNG
//! - **Dataset format**: 8-byte little-endian count followed by fixed-width
//!   little-endian keys, written by [`dataset::DatasetWriter`]
//! - **Progress**: sampled progress updates with a console bar
//! - **Runner**: atomic file creation and parallel generation of batches

pub mod config;
pub mod dataset;
pub mod distribution;
pub mod error;
pub mod output;
pub mod progress;
pub mod runner;
pub mod util;

// Re-export commonly used types
pub use config::Config;
pub use dataset::{ByteWidth, DatasetWriter};
pub use distribution::KeyStream;
pub use error::DatasetError;

/// Result type used throughout keyforge
pub type Result<T> = anyhow::Result<T>;
