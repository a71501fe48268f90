//! CLI to Config conversion utilities

use crate::config::cli::{self, Cli};
use crate::config::dataset::{DatasetConfig, DistributionType};
use crate::dataset::ByteWidth;
use anyhow::{Context, Result};

/// Parse an element count (e.g., "1000", "100k", "200M", "2B") using decimal suffixes
pub fn parse_count(s: &str) -> Result<u64> {
    let s = s.trim().to_lowercase().replace('_', "");

    let (num_str, multiplier) = if let Some(n) = s.strip_suffix('k') {
        (n, 1_000u64)
    } else if let Some(n) = s.strip_suffix('m') {
        (n, 1_000_000)
    } else if let Some(n) = s.strip_suffix('b').or_else(|| s.strip_suffix('g')) {
        (n, 1_000_000_000)
    } else if let Some(n) = s.strip_suffix('t') {
        (n, 1_000_000_000_000)
    } else {
        (s.as_str(), 1)
    };

    let num: u64 = num_str
        .trim()
        .parse()
        .with_context(|| format!("Invalid count format: {}", s))?;

    num.checked_mul(multiplier)
        .with_context(|| format!("Count out of range: {}", s))
}

/// Parse a size string (e.g., "1G", "100M", "4k") to bytes
pub fn parse_size(s: &str) -> Result<u64> {
    let s = s.trim().to_lowercase();

    let (num_str, multiplier) = if s.ends_with("k") || s.ends_with("kb") {
        (s.trim_end_matches("kb").trim_end_matches("k"), 1024u64)
    } else if s.ends_with("m") || s.ends_with("mb") {
        (s.trim_end_matches("mb").trim_end_matches("m"), 1024 * 1024)
    } else if s.ends_with("g") || s.ends_with("gb") {
        (s.trim_end_matches("gb").trim_end_matches("g"), 1024 * 1024 * 1024)
    } else {
        (s.as_str(), 1)
    };

    let num: u64 = num_str
        .parse()
        .with_context(|| format!("Invalid size format: {}", s))?;

    num.checked_mul(multiplier)
        .with_context(|| format!("Size out of range: {}", s))
}

/// Convert CLI distribution flags to a dataset DistributionType
///
/// Unset parameters take the distribution's defaults.
pub fn convert_distribution_type(cli: &Cli) -> DistributionType {
    let start = cli.start.unwrap_or(1);
    match cli.distribution {
        cli::DistributionKind::Dense => DistributionType::Dense { start },
        cli::DistributionKind::Gapped => DistributionType::Gapped {
            start,
            delete_probability: cli.delete_probability.unwrap_or(0.05),
        },
        cli::DistributionKind::Duplicated => DistributionType::Duplicated {
            start,
            duplicate_chance: cli.duplicate_chance.unwrap_or(0.4),
        },
        cli::DistributionKind::Uniform => DistributionType::Uniform {
            low: cli.low.unwrap_or(0),
            high: cli.high,
        },
    }
}

/// Build the single dataset described by `--name`/`--amount` and friends
pub fn dataset_from_cli(cli: &Cli) -> Result<DatasetConfig> {
    let name = cli
        .name
        .clone()
        .context("--name is required for a single dataset")?;
    let amount = cli
        .amount
        .as_deref()
        .context("--amount is required for a single dataset")?;
    let amount = parse_count(amount).context("Invalid --amount")?;
    let bytes_per_number =
        ByteWidth::try_from(cli.bytes_per_number).context("Invalid --bytes-per-number")?;

    Ok(DatasetConfig {
        name,
        amount,
        bytes_per_number,
        distribution: convert_distribution_type(cli),
        seed: cli.seed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_parse_count_plain() {
        assert_eq!(parse_count("1000").unwrap(), 1000);
        assert_eq!(parse_count("0").unwrap(), 0);
        assert_eq!(parse_count("1_000_000").unwrap(), 1_000_000);
    }

    #[test]
    fn test_parse_count_suffixes() {
        assert_eq!(parse_count("100k").unwrap(), 100_000);
        assert_eq!(parse_count("200M").unwrap(), 200_000_000);
        assert_eq!(parse_count("2B").unwrap(), 2_000_000_000);
        assert_eq!(parse_count("1g").unwrap(), 1_000_000_000);
        assert_eq!(parse_count("3T").unwrap(), 3_000_000_000_000);
    }

    #[test]
    fn test_parse_count_invalid() {
        assert!(parse_count("").is_err());
        assert!(parse_count("abc").is_err());
        assert!(parse_count("-5").is_err());
        assert!(parse_count("1.5M").is_err());
        assert!(parse_count("99999999999999999t").is_err());
    }

    #[test]
    fn test_parse_size_bytes() {
        assert_eq!(parse_size("1024").unwrap(), 1024);
        assert_eq!(parse_size("512").unwrap(), 512);
    }

    #[test]
    fn test_parse_size_kb() {
        assert_eq!(parse_size("4k").unwrap(), 4096);
        assert_eq!(parse_size("4KB").unwrap(), 4096);
    }

    #[test]
    fn test_parse_size_mb() {
        assert_eq!(parse_size("1m").unwrap(), 1024 * 1024);
        assert_eq!(parse_size("1M").unwrap(), 1_048_576);
    }

    #[test]
    fn test_convert_distribution_defaults() {
        let cli = Cli::parse_from(["keyforge", "--distribution", "gapped"]);
        assert_eq!(
            convert_distribution_type(&cli),
            DistributionType::Gapped {
                start: 1,
                delete_probability: 0.05
            }
        );

        let cli = Cli::parse_from(["keyforge", "--distribution", "uniform", "--high", "10"]);
        assert_eq!(
            convert_distribution_type(&cli),
            DistributionType::Uniform {
                low: 0,
                high: Some(10)
            }
        );
    }

    #[test]
    fn test_dataset_from_cli() {
        let cli = Cli::parse_from([
            "keyforge", "--name", "dup", "--amount", "1M", "-b", "4",
            "--distribution", "duplicated", "--start", "7", "--seed", "42",
        ]);
        let ds = dataset_from_cli(&cli).unwrap();
        assert_eq!(ds.name, "dup");
        assert_eq!(ds.amount, 1_000_000);
        assert_eq!(ds.bytes_per_number, ByteWidth::Four);
        assert_eq!(ds.seed, Some(42));
        assert_eq!(
            ds.distribution,
            DistributionType::Duplicated {
                start: 7,
                duplicate_chance: 0.4
            }
        );
    }

    #[test]
    fn test_dataset_from_cli_bad_width() {
        let cli = Cli::parse_from(["keyforge", "--name", "x", "--amount", "5", "-b", "3"]);
        assert!(dataset_from_cli(&cli).is_err());
    }
}
