//! JSON output formatting
//!
//! Writes a machine-readable summary of a generation batch: tool version, run
//! timestamps, and one entry per dataset file.

use crate::runner::DatasetSummary;
use crate::util::time::{format_duration, format_throughput};
use crate::Result;
use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Duration;

/// Duration with both seconds and human-readable format
#[derive(Debug, Clone, Serialize)]
pub struct JsonDuration {
    pub secs: f64,
    pub human: String,
}

impl JsonDuration {
    pub fn from_duration(d: Duration) -> Self {
        Self {
            secs: d.as_secs_f64(),
            human: format_duration(d),
        }
    }
}

/// Throughput with bytes/sec and human-readable format
#[derive(Debug, Clone, Serialize)]
pub struct JsonThroughput {
    pub bytes_per_sec: u64,
    pub human: String,
}

impl JsonThroughput {
    pub fn new(bytes_per_sec: f64) -> Self {
        Self {
            bytes_per_sec: bytes_per_sec as u64,
            human: format_throughput(bytes_per_sec),
        }
    }
}

/// Batch totals
#[derive(Debug, Clone, Serialize)]
pub struct JsonTotals {
    pub datasets: usize,
    pub keys: u64,
    pub bytes: u64,
    pub elapsed: JsonDuration,
    pub throughput: JsonThroughput,
}

/// Complete JSON document
#[derive(Debug, Clone, Serialize)]
pub struct JsonSummary<'a> {
    pub tool: &'static str,
    pub version: &'static str,
    pub generated_at: DateTime<Utc>,
    pub totals: JsonTotals,
    pub datasets: &'a [DatasetSummary],
}

/// Build the JSON document for a batch
pub fn build_summary(summaries: &[DatasetSummary]) -> JsonSummary<'_> {
    let keys = summaries.iter().map(|s| s.count).sum();
    let bytes = summaries
        .iter()
        .fold(0u64, |acc, s| acc.saturating_add(s.bytes));
    let elapsed: Duration = summaries.iter().map(|s| s.elapsed()).sum();
    let rate = crate::util::time::calculate_throughput(bytes, elapsed);

    JsonSummary {
        tool: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        generated_at: Utc::now(),
        totals: JsonTotals {
            datasets: summaries.len(),
            keys,
            bytes,
            elapsed: JsonDuration::from_duration(elapsed),
            throughput: JsonThroughput::new(rate),
        },
        datasets: summaries,
    }
}

/// Write the batch summary to `output_path`
pub fn write_json_summary(
    output_path: &Path,
    summaries: &[DatasetSummary],
    pretty: bool,
) -> Result<()> {
    let file = File::create(output_path)
        .with_context(|| format!("Failed to create JSON output: {}", output_path.display()))?;
    let mut writer = BufWriter::new(file);
    let document = build_summary(summaries);

    if pretty {
        serde_json::to_writer_pretty(&mut writer, &document)?;
    } else {
        serde_json::to_writer(&mut writer, &document)?;
    }
    writer.flush().context("Failed to flush JSON output")?;

    Ok(())
}
