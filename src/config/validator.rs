//! Configuration validation

use super::*;
use crate::dataset::{checked_file_size, ByteWidth};
use anyhow::Result;
use std::collections::HashSet;

/// Smallest accepted output buffer
const MIN_BUFFER_SIZE: usize = 8;

/// Validate complete configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.datasets.is_empty() {
        anyhow::bail!("no datasets configured");
    }

    for (i, ds) in config.datasets.iter().enumerate() {
        validate_dataset(ds, i)?;
    }
    validate_unique_files(&config.datasets)?;
    validate_output(&config.output)?;
    validate_runtime(&config.runtime)?;

    Ok(())
}

/// Validate a single dataset definition
pub fn validate_dataset(ds: &DatasetConfig, index: usize) -> Result<()> {
    if ds.name.is_empty() {
        anyhow::bail!("dataset {}: name must not be empty", index);
    }
    if ds.name.contains('/') || ds.name.contains('\\') || ds.name == "." || ds.name == ".." {
        anyhow::bail!(
            "dataset {}: name '{}' must not contain path separators",
            index,
            ds.name
        );
    }

    if checked_file_size(ds.amount, ds.bytes_per_number).is_none() {
        anyhow::bail!(
            "dataset '{}': amount {} is too large for {}-byte keys",
            ds.name,
            ds.amount,
            ds.bytes_per_number.bytes()
        );
    }

    validate_distribution(&ds.distribution)
        .map_err(|e| anyhow::anyhow!("dataset '{}': {}", ds.name, e))?;
    validate_range(ds)?;

    if ds.seed.is_some() && !ds.distribution.is_randomized() {
        eprintln!(
            "Warning: dataset '{}': seed has no effect on {} keys",
            ds.name,
            ds.distribution.label()
        );
    }

    Ok(())
}

/// Validate distribution parameters
fn validate_distribution(dist: &DistributionType) -> Result<()> {
    match dist {
        DistributionType::Dense { .. } => {}
        DistributionType::Gapped {
            delete_probability, ..
        } => validate_probability("delete_probability", *delete_probability)?,
        DistributionType::Duplicated {
            duplicate_chance, ..
        } => validate_probability("duplicate_chance", *duplicate_chance)?,
        DistributionType::Uniform { low, high } => {
            if let Some(high) = high {
                if high <= low {
                    anyhow::bail!("uniform range is empty: low ({}) >= high ({})", low, high);
                }
            }
        }
    }

    Ok(())
}

fn validate_probability(name: &str, p: f64) -> Result<()> {
    if !(0.0..1.0).contains(&p) {
        anyhow::bail!("{} must be in [0, 1), got {}", name, p);
    }
    Ok(())
}

/// Check the key range against u64 and the element width
///
/// Certain failures are rejected; possible ones only warn.
fn validate_range(ds: &DatasetConfig) -> Result<()> {
    let width = ds.bytes_per_number;
    let max = width.max_value();

    match ds.distribution {
        DistributionType::Dense { start } => {
            let last = last_monotone_value(ds, start)?;
            if let Some(last) = last {
                if last > max {
                    anyhow::bail!(
                        "dataset '{}': final key {} does not fit in {}-byte keys (max {})",
                        ds.name,
                        last,
                        width.bytes(),
                        max
                    );
                }
            }
        }
        DistributionType::Duplicated {
            start,
            duplicate_chance,
        } => {
            let last = last_monotone_value(ds, start)?;
            check_start_fits(ds, start, width)?;
            if let Some(last) = last {
                // Without repeats every key steps by one
                if duplicate_chance == 0.0 && last > max {
                    anyhow::bail!(
                        "dataset '{}': final key {} does not fit in {}-byte keys (max {})",
                        ds.name,
                        last,
                        width.bytes(),
                        max
                    );
                }
                let expected_last = expected_last(ds, start);
                if expected_last > max as f64 {
                    eprintln!(
                        "Warning: dataset '{}': duplicated keys are expected to reach ~{:.0}, which exceeds the {}-byte maximum {}",
                        ds.name,
                        expected_last,
                        width.bytes(),
                        max
                    );
                }
            }
        }
        DistributionType::Gapped { start, .. } => {
            let last = last_monotone_value(ds, start)?;
            check_start_fits(ds, start, width)?;
            if let Some(last) = last {
                if last > max {
                    anyhow::bail!(
                        "dataset '{}': gapped keys reach at least {}, which does not fit in {}-byte keys",
                        ds.name,
                        last,
                        width.bytes()
                    );
                }
                // Each delete shifts the tail up by one
                let expected_last = expected_last(ds, start);
                if expected_last > max as f64 {
                    eprintln!(
                        "Warning: dataset '{}': gapped keys are expected to reach ~{:.0}, which exceeds the {}-byte maximum {}",
                        ds.name,
                        expected_last,
                        width.bytes(),
                        max
                    );
                }
            }
        }
        DistributionType::Uniform { low, high } => {
            if ds.amount > 0 && low > max {
                anyhow::bail!(
                    "dataset '{}': uniform low bound {} does not fit in {}-byte keys",
                    ds.name,
                    low,
                    width.bytes()
                );
            }
            let upper = high.map(|h| h - 1).unwrap_or(u64::MAX);
            if ds.amount > 0 && upper > max {
                eprintln!(
                    "Warning: dataset '{}': uniform range reaches {}, keys above {} will fail the write",
                    ds.name,
                    upper,
                    max
                );
            }
        }
    }

    Ok(())
}

/// Worst-case final key `start + amount - 1`, `None` for empty datasets
fn last_monotone_value(ds: &DatasetConfig, start: u64) -> Result<Option<u64>> {
    if ds.amount == 0 {
        return Ok(None);
    }
    match start.checked_add(ds.amount - 1) {
        Some(last) => Ok(Some(last)),
        None => anyhow::bail!(
            "dataset '{}': start {} + amount {} overflows the 64-bit key space",
            ds.name,
            start,
            ds.amount
        ),
    }
}

fn check_start_fits(ds: &DatasetConfig, start: u64, width: ByteWidth) -> Result<()> {
    if ds.amount > 0 && !width.fits(start) {
        anyhow::bail!(
            "dataset '{}': start {} does not fit in {}-byte keys",
            ds.name,
            start,
            width.bytes()
        );
    }
    Ok(())
}

/// Mean final key of a monotone stream
fn expected_last(ds: &DatasetConfig, start: u64) -> f64 {
    let steps = ds.amount as f64 - 1.0;
    match ds.distribution {
        DistributionType::Gapped {
            delete_probability, ..
        } => start as f64 + steps / (1.0 - delete_probability),
        DistributionType::Duplicated {
            duplicate_chance, ..
        } => start as f64 + steps * (1.0 - duplicate_chance),
        _ => start as f64 + steps,
    }
}

/// Two datasets must not write the same file
pub fn validate_unique_files(datasets: &[DatasetConfig]) -> Result<()> {
    let mut seen = HashSet::new();
    for ds in datasets {
        let file_name = ds.file_name();
        if !seen.insert(file_name.clone()) {
            anyhow::bail!("duplicate dataset file '{}'", file_name);
        }
    }
    Ok(())
}

/// Validate output configuration
pub fn validate_output(output: &OutputConfig) -> Result<()> {
    if output.progress_interval == 0 {
        anyhow::bail!("progress_interval must be greater than 0");
    }

    if output.output_dir.as_os_str().is_empty() {
        anyhow::bail!("output_dir must not be empty");
    }

    Ok(())
}

/// Validate runtime configuration
pub fn validate_runtime(runtime: &RuntimeConfig) -> Result<()> {
    if runtime.jobs == 0 {
        anyhow::bail!("jobs must be at least 1");
    }

    if runtime.buffer_size < MIN_BUFFER_SIZE {
        anyhow::bail!(
            "buffer_size must be at least {} bytes, got {}",
            MIN_BUFFER_SIZE,
            runtime.buffer_size
        );
    }

    let cpus = num_cpus::get();
    if runtime.jobs > cpus {
        eprintln!(
            "Warning: jobs ({}) exceeds available CPUs ({})",
            runtime.jobs, cpus
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset(name: &str, amount: u64, width: ByteWidth, dist: DistributionType) -> DatasetConfig {
        DatasetConfig {
            name: name.to_string(),
            amount,
            bytes_per_number: width,
            distribution: dist,
            seed: None,
        }
    }

    fn dense(name: &str, amount: u64, start: u64) -> DatasetConfig {
        dataset(name, amount, ByteWidth::Eight, DistributionType::Dense { start })
    }

    #[test]
    fn test_validate_paper_preset() {
        let config = Config::with_datasets(paper_preset());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_empty_batch() {
        let config = Config::with_datasets(vec![]);
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_names() {
        assert!(validate_dataset(&dense("", 1, 1), 0).is_err());
        assert!(validate_dataset(&dense("a/b", 1, 1), 0).is_err());
        assert!(validate_dataset(&dense("..", 1, 1), 0).is_err());
        assert!(validate_dataset(&dense("ok_name", 1, 1), 0).is_ok());
    }

    #[test]
    fn test_validate_unique_files() {
        let same = vec![dense("keys", 1, 1), dense("keys", 2, 1)];
        assert!(validate_unique_files(&same).is_err());

        // Same name, different width: different files
        let distinct = vec![
            dense("keys", 1, 1),
            dataset("keys", 1, ByteWidth::Four, DistributionType::Dense { start: 1 }),
        ];
        assert!(validate_unique_files(&distinct).is_ok());
    }

    #[test]
    fn test_validate_probabilities() {
        let gapped = |p| {
            dataset(
                "g",
                10,
                ByteWidth::Eight,
                DistributionType::Gapped {
                    start: 1,
                    delete_probability: p,
                },
            )
        };
        assert!(validate_dataset(&gapped(0.0), 0).is_ok());
        assert!(validate_dataset(&gapped(0.999), 0).is_ok());
        assert!(validate_dataset(&gapped(1.0), 0).is_err());
        assert!(validate_dataset(&gapped(-0.1), 0).is_err());
        assert!(validate_dataset(&gapped(f64::NAN), 0).is_err());

        let dup = dataset(
            "d",
            10,
            ByteWidth::Eight,
            DistributionType::Duplicated {
                start: 1,
                duplicate_chance: 1.0,
            },
        );
        assert!(validate_dataset(&dup, 0).is_err());
    }

    #[test]
    fn test_validate_uniform_bounds() {
        let uniform = |low, high| {
            dataset("u", 10, ByteWidth::Eight, DistributionType::Uniform { low, high })
        };
        assert!(validate_dataset(&uniform(0, None), 0).is_ok());
        assert!(validate_dataset(&uniform(5, Some(6)), 0).is_ok());
        assert!(validate_dataset(&uniform(5, Some(5)), 0).is_err());
        assert!(validate_dataset(&uniform(10, Some(5)), 0).is_err());

        // Range wider than the width is only a warning
        let narrow = dataset(
            "u8",
            10,
            ByteWidth::One,
            DistributionType::Uniform { low: 0, high: Some(1000) },
        );
        assert!(validate_dataset(&narrow, 0).is_ok());

        let unreachable = dataset(
            "u8",
            10,
            ByteWidth::One,
            DistributionType::Uniform { low: 300, high: Some(1000) },
        );
        assert!(validate_dataset(&unreachable, 0).is_err());
    }

    #[test]
    fn test_validate_dense_range() {
        // 256 keys from 0 fit exactly in one byte
        let fits = dataset("d", 256, ByteWidth::One, DistributionType::Dense { start: 0 });
        assert!(validate_dataset(&fits, 0).is_ok());

        let too_many = dataset("d", 257, ByteWidth::One, DistributionType::Dense { start: 0 });
        assert!(validate_dataset(&too_many, 0).is_err());

        assert!(validate_dataset(&dense("d", 1, u64::MAX), 0).is_ok());
        assert!(validate_dataset(&dense("d", 2, u64::MAX), 0).is_err());

        // Empty datasets never produce a key
        assert!(validate_dataset(&dense("d", 0, u64::MAX), 0).is_ok());
    }

    #[test]
    fn test_validate_monotone_overflow() {
        let dup = dataset(
            "d",
            10,
            ByteWidth::Eight,
            DistributionType::Duplicated {
                start: u64::MAX - 5,
                duplicate_chance: 0.4,
            },
        );
        assert!(validate_dataset(&dup, 0).is_err());

        let start_too_big = dataset(
            "d",
            1,
            ByteWidth::Two,
            DistributionType::Duplicated {
                start: 70_000,
                duplicate_chance: 0.4,
            },
        );
        assert!(validate_dataset(&start_too_big, 0).is_err());
    }

    #[test]
    fn test_validate_gapped_range() {
        let gapped = |amount, width| {
            dataset(
                "g",
                amount,
                width,
                DistributionType::Gapped {
                    start: 1,
                    delete_probability: 0.5,
                },
            )
        };
        // Expected to drift past 255 but not certain to: warning only
        assert!(validate_dataset(&gapped(200, ByteWidth::One), 0).is_ok());
        // Certain to exceed
        assert!(validate_dataset(&gapped(300, ByteWidth::One), 0).is_err());
    }

    #[test]
    fn test_validate_duplicated_range() {
        let duplicated = |amount, chance| {
            dataset(
                "d",
                amount,
                ByteWidth::One,
                DistributionType::Duplicated {
                    start: 1,
                    duplicate_chance: chance,
                },
            )
        };
        // No repeats behaves like dense: certain to exceed
        assert!(validate_dataset(&duplicated(1000, 0.0), 0).is_err());
        assert!(validate_dataset(&duplicated(255, 0.0), 0).is_ok());
        // Expected to stay near 200, may still exceed: accepted
        assert!(validate_dataset(&duplicated(400, 0.5), 0).is_ok());
        // Expected to drift past 255: warning only
        assert!(validate_dataset(&duplicated(1000, 0.5), 0).is_ok());
    }

    #[test]
    fn test_expected_last() {
        let dup = dataset(
            "d",
            401,
            ByteWidth::Eight,
            DistributionType::Duplicated {
                start: 1,
                duplicate_chance: 0.5,
            },
        );
        assert_eq!(expected_last(&dup, 1), 201.0);

        let gap = dataset(
            "g",
            401,
            ByteWidth::Eight,
            DistributionType::Gapped {
                start: 1,
                delete_probability: 0.5,
            },
        );
        assert_eq!(expected_last(&gap, 1), 801.0);
        assert_eq!(expected_last(&dense("d", 401, 1), 1), 401.0);
    }

    #[test]
    fn test_validate_seed_on_dense() {
        let mut ds = dense("d", 10, 1);
        ds.seed = Some(7);
        assert!(!ds.distribution.is_randomized());
        // Ignored seed only warns
        assert!(validate_dataset(&ds, 0).is_ok());
    }

    #[test]
    fn test_validate_runtime_and_output() {
        let mut runtime = RuntimeConfig::default();
        assert!(validate_runtime(&runtime).is_ok());
        runtime.jobs = 0;
        assert!(validate_runtime(&runtime).is_err());
        runtime.jobs = 1;
        runtime.buffer_size = 4;
        assert!(validate_runtime(&runtime).is_err());

        let mut output = OutputConfig::default();
        assert!(validate_output(&output).is_ok());
        output.progress_interval = 0;
        assert!(validate_output(&output).is_err());
    }
}
