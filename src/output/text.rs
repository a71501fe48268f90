//! Human-readable text output

use crate::config::Config;
use crate::dataset::expected_file_size;
use crate::runner::DatasetSummary;
use crate::util::time::{
    calculate_rate, calculate_throughput, format_bytes, format_count, format_duration,
    format_rate, format_throughput,
};
use std::time::Duration;

const RULE: &str = "═══════════════════════════════════════════════════════════";

/// Render the configuration block
pub fn format_configuration(config: &Config) -> String {
    let mut out = String::new();
    out.push_str("Configuration:\n");
    out.push_str(&format!(
        "  Output directory: {}\n",
        config.output.output_dir.display()
    ));
    out.push_str(&format!(
        "  Jobs: {} ({} CPUs available)\n",
        config.runtime.jobs,
        num_cpus::get()
    ));
    out.push_str(&format!(
        "  Buffer: {}, atomic: {}\n",
        format_bytes(config.runtime.buffer_size as u64),
        if config.runtime.atomic { "yes" } else { "no" }
    ));
    if let Some(ref path) = config.output.json_output {
        out.push_str(&format!("  JSON output: {}\n", path.display()));
    }

    out.push_str("  Datasets:\n");
    for ds in &config.datasets {
        out.push_str(&format!("    {}\n", ds.file_name()));
        out.push_str(&format!(
            "      Keys: {} x {} bytes ({})\n",
            format_count(ds.amount),
            ds.bytes_per_number.bytes(),
            format_bytes(expected_file_size(ds.amount, ds.bytes_per_number))
        ));
        out.push_str(&format!("      Distribution: {}\n", ds.distribution));
        if let Some(seed) = ds.seed {
            out.push_str(&format!("      Seed: {}\n", seed));
        }
    }
    out.push_str(&format!("  Total size: {}\n", format_bytes(config.total_bytes())));
    out
}

/// Print configuration to console
pub fn print_configuration(config: &Config) {
    print!("{}", format_configuration(config));
}

/// Render the results block
pub fn format_summary(summaries: &[DatasetSummary], wall_time: Duration) -> String {
    let mut out = String::new();
    out.push_str(RULE);
    out.push('\n');
    out.push_str("                    GENERATION RESULTS\n");
    out.push_str(RULE);
    out.push_str("\n\n");

    for s in summaries {
        out.push_str(&format!("{}\n", s.path.display()));
        out.push_str(&format!(
            "  Keys:       {} ({})\n",
            format_count(s.count),
            s.distribution
        ));
        out.push_str(&format!("  Size:       {}\n", format_bytes(s.bytes)));
        out.push_str(&format!("  Time:       {}\n", format_duration(s.elapsed())));
        out.push_str(&format!(
            "  Rate:       {} keys/s, {}\n",
            format_rate(s.keys_per_sec),
            format_throughput(s.bytes_per_sec)
        ));
        out.push('\n');
    }

    let keys: u64 = summaries.iter().map(|s| s.count).sum();
    let bytes = summaries
        .iter()
        .fold(0u64, |acc, s| acc.saturating_add(s.bytes));

    out.push_str("Total:\n");
    out.push_str(&format!("  Datasets:   {}\n", summaries.len()));
    out.push_str(&format!("  Keys:       {}\n", format_count(keys)));
    out.push_str(&format!("  Size:       {}\n", format_bytes(bytes)));
    out.push_str(&format!("  Wall time:  {}\n", format_duration(wall_time)));
    out.push_str(&format!(
        "  Rate:       {} keys/s, {}\n",
        format_rate(calculate_rate(keys, wall_time)),
        format_throughput(calculate_throughput(bytes, wall_time))
    ));
    out.push_str(RULE);
    out.push('\n');
    out
}

/// Print generation results to console
pub fn print_summary(summaries: &[DatasetSummary], wall_time: Duration) {
    print!("{}", format_summary(summaries, wall_time));
}
