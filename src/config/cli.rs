//! CLI argument parsing using clap

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Key distribution for a single dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DistributionKind {
    /// Consecutive keys: start, start+1, ...
    Dense,
    /// Consecutive keys with random deletes
    Gapped,
    /// Non-decreasing keys with random repeats
    Duplicated,
    /// Independent uniform draws from [low, high)
    Uniform,
}

/// Built-in dataset batches
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Preset {
    /// The seven 64-bit benchmark datasets (debug, uniform_200M, consecutive_*, gapped_*)
    Paper,
}

/// keyforge - synthetic sorted-key dataset generator
#[derive(Parser, Debug)]
#[command(name = "keyforge")]
#[command(version, about, long_about = None)]
pub struct Cli {
    // === Single Dataset ===
    /// Dataset name (file is written as <name>_uint<bits>)
    #[arg(short = 'n', long)]
    pub name: Option<String>,

    /// Number of keys (e.g., 1000, 100M, 2B; decimal suffixes)
    #[arg(short = 'a', long)]
    pub amount: Option<String>,

    /// Bytes per key: 1, 2, 4, or 8
    #[arg(short = 'b', long, default_value = "8")]
    pub bytes_per_number: u8,

    /// Key distribution
    #[arg(long, value_enum, default_value = "dense")]
    pub distribution: DistributionKind,

    /// First key for dense, gapped, and duplicated (default 1)
    #[arg(long)]
    pub start: Option<u64>,

    /// Probability of skipping each candidate key (gapped, default 0.05)
    #[arg(long)]
    pub delete_probability: Option<f64>,

    /// Probability of repeating the previous key (duplicated, default 0.4)
    #[arg(long)]
    pub duplicate_chance: Option<f64>,

    /// Inclusive lower bound (uniform, default 0)
    #[arg(long)]
    pub low: Option<u64>,

    /// Exclusive upper bound (uniform, default 2^64)
    #[arg(long)]
    pub high: Option<u64>,

    /// PRNG seed for reproducible output
    #[arg(long)]
    pub seed: Option<u64>,

    // === Batches ===
    /// TOML configuration file
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Generate a built-in batch of datasets
    #[arg(long, value_enum)]
    pub preset: Option<Preset>,

    // === Output Options ===
    /// Directory for dataset files (default: current directory)
    #[arg(short = 'o', long)]
    pub output_dir: Option<PathBuf>,

    /// JSON summary output file
    #[arg(long)]
    pub json_output: Option<PathBuf>,

    /// Elements between progress updates (e.g., 100k)
    #[arg(long)]
    pub progress_interval: Option<String>,

    /// Disable the progress bar
    #[arg(long)]
    pub no_progress: bool,

    // === Runtime Options ===
    /// Number of datasets generated in parallel
    #[arg(short = 'j', long)]
    pub jobs: Option<usize>,

    /// Output buffer size (e.g., 64k, 1M)
    #[arg(long)]
    pub buffer_size: Option<String>,

    /// Write the destination file directly instead of renaming a temporary file
    #[arg(long)]
    pub no_atomic: bool,

    /// Dry run - validate configuration without writing files
    #[arg(long)]
    pub dry_run: bool,

    /// Enable debug output (timing, file operations, etc.)
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Whether the single-dataset flags describe the datasets to generate
    pub fn is_single_dataset(&self) -> bool {
        self.config.is_none() && self.preset.is_none()
    }

    /// Validate CLI arguments
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.config.is_some() && self.preset.is_some() {
            anyhow::bail!("--config and --preset cannot be used together");
        }

        if self.is_single_dataset() {
            if self.name.is_none() {
                anyhow::bail!("--name is required (or use --config / --preset)");
            }
            if self.amount.is_none() {
                anyhow::bail!("--amount is required (or use --config / --preset)");
            }
        } else if self.name.is_some() || self.amount.is_some() {
            anyhow::bail!("--name and --amount cannot be combined with --config or --preset");
        }

        if let Some(jobs) = self.jobs {
            if jobs == 0 {
                anyhow::bail!("--jobs must be at least 1");
            }
        }

        // Distribution parameters only make sense for their own distribution
        match self.distribution {
            DistributionKind::Dense => {
                self.reject_param(self.delete_probability.is_some(), "--delete-probability")?;
                self.reject_param(self.duplicate_chance.is_some(), "--duplicate-chance")?;
                self.reject_param(self.low.is_some() || self.high.is_some(), "--low/--high")?;
            }
            DistributionKind::Gapped => {
                self.reject_param(self.duplicate_chance.is_some(), "--duplicate-chance")?;
                self.reject_param(self.low.is_some() || self.high.is_some(), "--low/--high")?;
            }
            DistributionKind::Duplicated => {
                self.reject_param(self.delete_probability.is_some(), "--delete-probability")?;
                self.reject_param(self.low.is_some() || self.high.is_some(), "--low/--high")?;
            }
            DistributionKind::Uniform => {
                self.reject_param(self.start.is_some(), "--start")?;
                self.reject_param(self.delete_probability.is_some(), "--delete-probability")?;
                self.reject_param(self.duplicate_chance.is_some(), "--duplicate-chance")?;
            }
        }

        Ok(())
    }

    fn reject_param(&self, given: bool, flag: &str) -> anyhow::Result<()> {
        if given {
            anyhow::bail!(
                "{} does not apply to --distribution {:?}",
                flag,
                self.distribution
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let mut full = vec!["keyforge"];
        full.extend_from_slice(args);
        Cli::parse_from(full)
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&["--name", "keys", "--amount", "100"]);
        assert_eq!(cli.bytes_per_number, 8);
        assert_eq!(cli.distribution, DistributionKind::Dense);
        assert!(cli.is_single_dataset());
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn test_single_dataset_requires_name_and_amount() {
        assert!(parse(&["--amount", "100"]).validate().is_err());
        assert!(parse(&["--name", "keys"]).validate().is_err());
    }

    #[test]
    fn test_config_and_preset_exclusive() {
        let cli = parse(&["--config", "batch.toml", "--preset", "paper"]);
        assert!(cli.validate().is_err());

        let cli = parse(&["--preset", "paper", "--name", "keys"]);
        assert!(cli.validate().is_err());

        let cli = parse(&["--preset", "paper", "--jobs", "4"]);
        assert!(!cli.is_single_dataset());
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn test_distribution_params_must_match() {
        let cli = parse(&[
            "--name", "g", "--amount", "10", "--distribution", "gapped",
            "--delete-probability", "0.1",
        ]);
        assert!(cli.validate().is_ok());

        let cli = parse(&["--name", "d", "--amount", "10", "--delete-probability", "0.1"]);
        assert!(cli.validate().is_err());

        let cli = parse(&[
            "--name", "u", "--amount", "10", "--distribution", "uniform", "--start", "5",
        ]);
        assert!(cli.validate().is_err());

        let cli = parse(&[
            "--name", "u", "--amount", "10", "--distribution", "uniform", "--low", "5",
            "--high", "50",
        ]);
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn test_zero_jobs_rejected() {
        let cli = parse(&["--name", "k", "--amount", "1", "--jobs", "0"]);
        assert!(cli.validate().is_err());
    }

    #[test]
    fn test_unknown_distribution_rejected_by_parser() {
        let result = Cli::try_parse_from(["keyforge", "--distribution", "zipf"]);
        assert!(result.is_err());
    }
}
