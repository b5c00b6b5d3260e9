//! Compress command implementation.

use crate::utils::{default_archive_path, format_size, write_output};
use clap::ValueEnum;
use kfrac_codec::{Codec, CompressReport, Config, DEFAULT_MAX_OUTPUT_LEN, MethodPolicy};
use log::{info, warn};
use std::path::Path;

/// Method selection on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MethodArg {
    /// Try both methods, keep the smaller archive
    Auto,
    /// Single order-1 stream over all MTF ranks
    Baseline,
    /// Structure, run and per-tier streams
    Tiered,
}

impl From<MethodArg> for MethodPolicy {
    fn from(arg: MethodArg) -> Self {
        match arg {
            MethodArg::Auto => MethodPolicy::Auto,
            MethodArg::Baseline => MethodPolicy::Baseline,
            MethodArg::Tiered => MethodPolicy::Tiered,
        }
    }
}

pub fn cmd_compress(
    input: &Path,
    output: Option<&Path>,
    method: MethodArg,
    force: bool,
    quiet: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let data = std::fs::read(input)?;
    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_archive_path(input));

    if data.len() > DEFAULT_MAX_OUTPUT_LEN {
        warn!(
            "{} is larger than the default decompression limit; restore it with --max-output {}",
            input.display(),
            data.len()
        );
    }

    let codec = Codec::new(Config::new().with_method(method.into()));
    let (archive, report) = codec.compress_with_report(&data)?;
    log_report(&report);

    write_output(&output, &archive, force)?;

    if !quiet {
        println!(
            "{} -> {} ({} -> {}, {:.1}%, {})",
            input.display(),
            output.display(),
            format_size(report.original_len as u64),
            format_size(report.archive_len as u64),
            report.ratio_percent(),
            report.method
        );
    }
    Ok(())
}

fn log_report(report: &CompressReport) {
    let stats = &report.stats;
    info!(
        "MTF distribution: zeros {:.1}%, tier 1 {:.1}%, tier 2 {:.1}%, tier 3 {:.1}%, tier 4 {:.1}%",
        stats.zero_percent(),
        stats.tier_percent(0),
        stats.tier_percent(1),
        stats.tier_percent(2),
        stats.tier_percent(3)
    );
    info!(
        "Zero runs: {} (longest {})",
        stats.zero_runs, stats.longest_run
    );
    if let Some(len) = report.baseline_len {
        info!("Baseline candidate: {} bytes", len);
    }
    if let Some(len) = report.tiered_len {
        info!("Tiered candidate: {} bytes", len);
    }
    for (name, len) in &report.streams {
        info!("  {:<10} {:>10} bytes", name, len);
    }
}
