//! keyforge CLI entry point

use anyhow::{Context, Result};
use keyforge::config::cli::Cli;
use keyforge::config::{toml as config_toml, validator, Config};
use keyforge::output::{json, text};
use keyforge::runner;
use std::time::Instant;

fn main() -> Result<()> {
    let main_start = Instant::now();

    println!("keyforge v{}", env!("CARGO_PKG_VERSION"));
    println!("Synthetic sorted-key dataset generator");
    println!();

    // Parse CLI arguments
    let parse_start = Instant::now();
    let cli = Cli::parse_args();
    cli.validate()?;
    if cli.debug {
        eprintln!(
            "DEBUG TIMING: CLI parse: {:.3}s",
            parse_start.elapsed().as_secs_f64()
        );
    }

    // Build configuration (batch file, preset, or single dataset) with CLI overrides
    let config_start = Instant::now();
    let config = config_toml::load_config(&cli)?;
    if config.runtime.debug {
        eprintln!(
            "DEBUG TIMING: Config build: {:.3}s",
            config_start.elapsed().as_secs_f64()
        );
    }

    validator::validate_config(&config).context("Configuration validation failed")?;

    text::print_configuration(&config);

    if config.runtime.dry_run {
        println!();
        println!("Dry run mode - configuration validated successfully");
        return Ok(());
    }

    println!();
    println!("Generating {} dataset(s)...", config.datasets.len());
    println!();

    run(&config, main_start)
}

fn run(config: &Config, main_start: Instant) -> Result<()> {
    let run_start = Instant::now();
    let summaries = runner::run_all(config)?;
    let wall_time = run_start.elapsed();

    println!();
    text::print_summary(&summaries, wall_time);

    if let Some(ref path) = config.output.json_output {
        json::write_json_summary(path, &summaries, true)
            .with_context(|| format!("Failed to write JSON summary: {}", path.display()))?;
        println!("JSON summary written to {}", path.display());
    }

    if config.runtime.debug {
        eprintln!(
            "DEBUG TIMING: Total: {:.3}s",
            main_start.elapsed().as_secs_f64()
        );
    }

    Ok(())
}
