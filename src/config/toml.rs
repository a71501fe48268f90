//! TOML configuration file parsing
//!
//! A batch file lists any number of datasets plus shared output/runtime settings:
//!
//! ```toml
//! [output]
//! output_dir = "data"
//!
//! [runtime]
//! jobs = 4
//!
//! [[datasets]]
//! name = "consecutive_100M"
//! amount = "100M"
//! bytes_per_number = 8
//!
//! [datasets.distribution]
//! type = "dense"
//! start = 1000
//! ```

use super::*;
use crate::config::cli::{Cli, Preset};
use crate::config::cli_convert::{dataset_from_cli, parse_count, parse_size};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Parse TOML configuration file
pub fn parse_toml_file(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_toml_string(&contents)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Parse TOML configuration from string
pub fn parse_toml_string(contents: &str) -> Result<Config> {
    let config: Config =
        ::toml::from_str(contents).context("Failed to parse TOML configuration")?;

    Ok(config)
}

/// Merge CLI arguments with a configuration (CLI takes precedence)
pub fn merge_cli_with_config(cli: &Cli, mut config: Config) -> Result<Config> {
    // Output overrides
    if let Some(ref dir) = cli.output_dir {
        config.output.output_dir = dir.clone();
    }
    if let Some(ref path) = cli.json_output {
        config.output.json_output = Some(path.clone());
    }
    if let Some(ref interval) = cli.progress_interval {
        config.output.progress_interval =
            parse_count(interval).context("Invalid --progress-interval")?;
    }
    if cli.no_progress {
        config.output.no_progress = true;
    }

    // Runtime overrides
    if let Some(jobs) = cli.jobs {
        config.runtime.jobs = jobs;
    }
    if let Some(ref size) = cli.buffer_size {
        let bytes = parse_size(size).context("Invalid --buffer-size")?;
        config.runtime.buffer_size =
            usize::try_from(bytes).context("--buffer-size does not fit in memory")?;
    }
    if cli.no_atomic {
        config.runtime.atomic = false;
    }
    if cli.dry_run {
        config.runtime.dry_run = true;
    }
    if cli.debug {
        config.runtime.debug = true;
    }

    Ok(config)
}

/// Build the effective configuration from a batch file, a preset, or single-dataset flags
pub fn load_config(cli: &Cli) -> Result<Config> {
    let base = if let Some(ref path) = cli.config {
        parse_toml_file(path)?
    } else if let Some(preset) = cli.preset {
        match preset {
            Preset::Paper => Config::with_datasets(dataset::paper_preset()),
        }
    } else {
        Config::with_datasets(vec![dataset_from_cli(cli)?])
    };

    merge_cli_with_config(cli, base)
}
