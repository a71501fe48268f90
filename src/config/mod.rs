//! Configuration module
//!
//! Handles CLI argument parsing, TOML batch files, and validation.

pub mod cli;
pub mod cli_convert;
pub mod dataset;
pub mod toml;
pub mod validator;

use crate::dataset::writer::DEFAULT_BUFFER_CAPACITY;
use crate::progress::DEFAULT_PROGRESS_INTERVAL;
use dataset::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Complete generation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub runtime: RuntimeConfig,
    /// Datasets to generate, in order
    #[serde(default)]
    pub datasets: Vec<DatasetConfig>,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory the dataset files are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// JSON summary file path
    pub json_output: Option<PathBuf>,
    /// Disable the progress bar
    #[serde(default)]
    pub no_progress: bool,
    /// Elements between progress updates
    #[serde(default = "default_progress_interval")]
    pub progress_interval: u64,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_progress_interval() -> u64 {
    DEFAULT_PROGRESS_INTERVAL
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            json_output: None,
            no_progress: false,
            progress_interval: default_progress_interval(),
        }
    }
}

/// Runtime configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Datasets generated concurrently
    #[serde(default = "default_jobs")]
    pub jobs: usize,
    /// Output buffer size in bytes
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,
    /// Write to a temporary file and rename on success
    #[serde(default = "default_atomic")]
    pub atomic: bool,
    /// Dry run mode
    #[serde(default)]
    pub dry_run: bool,
    /// Enable debug output
    #[serde(default)]
    pub debug: bool,
}

fn default_jobs() -> usize {
    1
}

fn default_buffer_size() -> usize {
    DEFAULT_BUFFER_CAPACITY
}

fn default_atomic() -> bool {
    true
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            jobs: default_jobs(),
            buffer_size: default_buffer_size(),
            atomic: default_atomic(),
            dry_run: false,
            debug: false,
        }
    }
}

impl Config {
    /// Configuration with default output/runtime settings
    pub fn with_datasets(datasets: Vec<DatasetConfig>) -> Self {
        Self {
            output: OutputConfig::default(),
            runtime: RuntimeConfig::default(),
            datasets,
        }
    }

    /// Sum of the sizes of all dataset files
    pub fn total_bytes(&self) -> u64 {
        self.datasets
            .iter()
            .map(|ds| crate::dataset::expected_file_size(ds.amount, ds.bytes_per_number))
            .fold(0u64, |acc, size| acc.saturating_add(size))
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Output directory: {}", self.output.output_dir.display())?;
        writeln!(f, "Jobs: {}", self.runtime.jobs)?;
        for ds in &self.datasets {
            writeln!(
                f,
                "  {} ({} keys, {}, {})",
                ds.file_name(),
                ds.amount,
                ds.bytes_per_number,
                ds.distribution
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::ByteWidth;

    #[test]
    fn test_defaults() {
        let output = OutputConfig::default();
        assert_eq!(output.output_dir, PathBuf::from("."));
        assert_eq!(output.progress_interval, 100_000);
        assert!(!output.no_progress);

        let runtime = RuntimeConfig::default();
        assert_eq!(runtime.jobs, 1);
        assert_eq!(runtime.buffer_size, 1024 * 1024);
        assert!(runtime.atomic);
    }

    #[test]
    fn test_total_bytes() {
        let config = Config::with_datasets(vec![
            DatasetConfig {
                name: "a".to_string(),
                amount: 10,
                bytes_per_number: ByteWidth::Eight,
                distribution: DistributionType::default(),
                seed: None,
            },
            DatasetConfig {
                name: "b".to_string(),
                amount: 3,
                bytes_per_number: ByteWidth::Two,
                distribution: DistributionType::default(),
                seed: None,
            },
        ]);
        assert_eq!(config.total_bytes(), 88 + 14);
    }

    #[test]
    fn test_display_lists_datasets() {
        let config = Config::with_datasets(paper_preset());
        let text = config.to_string();
        assert!(text.contains("uniform_200M_uint64"));
        assert!(text.contains("Jobs: 1"));
    }
}
