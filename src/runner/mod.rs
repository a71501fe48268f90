//! Dataset generation runner
//!
//! Turns validated [`DatasetConfig`]s into files on disk. Each dataset is written
//! to a temporary file in the output directory and renamed into place only after
//! the writer reaches `Finalized`, so a failed or interrupted run never leaves a
//! truncated file under the final name.
//!
//! Several datasets can be generated concurrently on a rayon pool; every dataset
//! owns its stream and writer, so jobs share nothing but the output directory.

use crate::config::dataset::DatasetConfig;
use crate::config::{Config, OutputConfig, RuntimeConfig};
use crate::dataset::{expected_file_size, write_dataset, write_dataset_file, WriteOptions};
use crate::distribution::build_stream;
use crate::progress::console::ConsoleProgress;
use crate::progress::{NoProgress, ProgressSink};
use crate::util::time::{calculate_rate, calculate_throughput, format_count, format_duration};
use crate::Result;
use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Prefix of in-progress temporary files
const TEMP_PREFIX: &str = ".keyforge-";

/// Result of generating one dataset
#[derive(Debug, Clone, Serialize)]
pub struct DatasetSummary {
    pub name: String,
    pub path: PathBuf,
    pub count: u64,
    pub bytes_per_number: u8,
    pub bytes: u64,
    pub distribution: String,
    pub seed: Option<u64>,
    pub elapsed_secs: f64,
    pub keys_per_sec: f64,
    pub bytes_per_sec: f64,
    pub created_at: DateTime<Utc>,
}

impl DatasetSummary {
    /// Generation time
    pub fn elapsed(&self) -> Duration {
        Duration::from_secs_f64(self.elapsed_secs)
    }
}

/// Generate a single dataset file
///
/// The caller is expected to have run `validate_config`; distribution parameters
/// are still checked when the stream is built.
pub fn run_dataset(
    ds: &DatasetConfig,
    output: &OutputConfig,
    runtime: &RuntimeConfig,
    progress: &mut dyn ProgressSink,
) -> Result<DatasetSummary> {
    let mut stream = build_stream(&ds.distribution, ds.seed)
        .with_context(|| format!("Invalid distribution for dataset '{}'", ds.name))?;

    let dir = &output.output_dir;
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;

    let path = ds.path_in(dir);
    let options = WriteOptions {
        buffer_capacity: runtime.buffer_size,
        progress_interval: output.progress_interval,
    };

    if runtime.debug {
        eprintln!(
            "DEBUG: writing {} ({} keys, {}, atomic={})",
            path.display(),
            ds.amount,
            ds.distribution,
            runtime.atomic
        );
    }

    let start = Instant::now();
    let bytes = if runtime.atomic {
        write_atomic(ds, dir, &path, stream.as_mut(), &options, progress)?
    } else {
        write_dataset_file(
            &path,
            stream.as_mut(),
            ds.amount,
            ds.bytes_per_number,
            &options,
            progress,
        )
        .with_context(|| format!("Failed to write dataset '{}'", ds.name))?
    };
    let elapsed = start.elapsed();

    if runtime.debug {
        eprintln!(
            "DEBUG: {} done in {:.3}s ({} bytes)",
            path.display(),
            elapsed.as_secs_f64(),
            bytes
        );
    }

    Ok(DatasetSummary {
        name: ds.name.clone(),
        path,
        count: ds.amount,
        bytes_per_number: ds.bytes_per_number.into(),
        bytes,
        distribution: ds.distribution.label().to_string(),
        seed: ds.seed,
        elapsed_secs: elapsed.as_secs_f64(),
        keys_per_sec: calculate_rate(ds.amount, elapsed),
        bytes_per_sec: calculate_throughput(bytes, elapsed),
        created_at: Utc::now(),
    })
}

/// Write into a temporary file next to `path`, then rename it into place
fn write_atomic(
    ds: &DatasetConfig,
    dir: &Path,
    path: &Path,
    stream: &mut dyn crate::distribution::KeyStream,
    options: &WriteOptions,
    progress: &mut dyn ProgressSink,
) -> Result<u64> {
    let mut tmp = tempfile::Builder::new()
        .prefix(TEMP_PREFIX)
        .suffix(".tmp")
        .tempfile_in(dir)
        .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;

    write_dataset(
        tmp.as_file_mut(),
        stream,
        ds.amount,
        ds.bytes_per_number,
        options,
        progress,
    )
    .with_context(|| format!("Failed to write dataset '{}'", ds.name))?;

    tmp.as_file()
        .sync_all()
        .with_context(|| format!("Failed to sync dataset '{}'", ds.name))?;

    // Temporary files are created owner-only
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file()
            .set_permissions(fs::Permissions::from_mode(0o644))
            .with_context(|| format!("Failed to set permissions for dataset '{}'", ds.name))?;
    }

    tmp.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("Failed to move dataset into place: {}", path.display()))?;

    Ok(expected_file_size(ds.amount, ds.bytes_per_number))
}

/// Generate every dataset in `config`
///
/// With `jobs == 1` datasets are written one after another with a progress bar.
/// Otherwise they run on a rayon pool and each prints a completion line. Results
/// are returned in configuration order; the first failure aborts the batch.
pub fn run_all(config: &Config) -> Result<Vec<DatasetSummary>> {
    let jobs = config.runtime.jobs.max(1).min(config.datasets.len().max(1));

    if jobs == 1 {
        return run_sequential(config);
    }

    if config.runtime.debug {
        eprintln!("DEBUG: generating {} datasets with {} jobs", config.datasets.len(), jobs);
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .build()
        .context("Failed to build generation thread pool")?;

    pool.install(|| {
        use rayon::prelude::*;

        config
            .datasets
            .par_iter()
            .map(|ds| -> Result<DatasetSummary> {
                let summary =
                    run_dataset(ds, &config.output, &config.runtime, &mut NoProgress)?;
                println!(
                    "  Completed {}: {} keys in {}",
                    ds.file_name(),
                    format_count(summary.count),
                    format_duration(summary.elapsed())
                );
                Ok(summary)
            })
            .collect()
    })
}

fn run_sequential(config: &Config) -> Result<Vec<DatasetSummary>> {
    let mut summaries = Vec::with_capacity(config.datasets.len());

    for ds in &config.datasets {
        let summary = if config.output.no_progress {
            run_dataset(ds, &config.output, &config.runtime, &mut NoProgress)?
        } else {
            let mut bar = ConsoleProgress::new(ds.file_name());
            run_dataset(ds, &config.output, &config.runtime, &mut bar)?
        };
        summaries.push(summary);
    }

    Ok(summaries)
}
