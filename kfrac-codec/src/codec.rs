//! Compression driver.
//!
//! `compress` runs CRC, BWT and MTF once, then builds the baseline and/or
//! tiered archive depending on [`MethodPolicy`], keeping the smaller one.
//! `decompress` parses the container, decodes the payload and undoes MTF and
//! BWT, then checks the CRC. Every call builds its own models.

use crate::config::{Config, MethodPolicy};
use crate::container::{self, Archive, Method, Payload};
use crate::tier::TierStats;
use crate::{baseline, bwt, mtf, tiered, zero_run};
use kfrac_core::crc::Crc32;
use kfrac_core::error::{KfracError, Result};
use log::{debug, trace};

/// What `compress` did with one input.
#[derive(Debug, Clone, PartialEq)]
pub struct CompressReport {
    /// Method written to the archive.
    pub method: Method,
    /// Input length.
    pub original_len: usize,
    /// Length of the archive returned.
    pub archive_len: usize,
    /// Full archive size of the baseline candidate, if built.
    pub baseline_len: Option<usize>,
    /// Full archive size of the tiered candidate, if built.
    pub tiered_len: Option<usize>,
    /// Named sub-stream lengths of the chosen archive.
    pub streams: Vec<(&'static str, usize)>,
    /// MTF distribution.
    pub stats: TierStats,
}

impl CompressReport {
    /// Archive size relative to the input, in percent.
    pub fn ratio_percent(&self) -> f64 {
        if self.original_len == 0 {
            0.0
        } else {
            self.archive_len as f64 * 100.0 / self.original_len as f64
        }
    }
}

/// Block compressor with its settings.
#[derive(Debug, Clone, Default)]
pub struct Codec {
    config: Config,
}

impl Codec {
    /// Create a codec with the given settings.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Current settings.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Compress `input` into a KF34 archive.
    pub fn compress(&self, input: &[u8]) -> Result<Vec<u8>> {
        self.compress_with_report(input).map(|(archive, _)| archive)
    }

    /// Compress `input`, also reporting candidate sizes and statistics.
    pub fn compress_with_report(&self, input: &[u8]) -> Result<(Vec<u8>, CompressReport)> {
        let original_len = u32::try_from(input.len()).map_err(|_| {
            KfracError::capacity_exceeded("input length", input.len() as u64, u32::MAX as u64)
        })?;

        let crc = Crc32::compute(input);
        let (permuted, primary_index) = bwt::transform(input);
        let primary_index = primary_index as u32;
        let ranks = mtf::transform(&permuted);
        let split = zero_run::split(&ranks);
        let stats = TierStats::collect(&ranks, &split);

        debug!(
            "MTF: {} ranks, zeros {:.1}%, tiers {:.1}% / {:.1}% / {:.1}% / {:.1}%",
            stats.total,
            stats.zero_percent(),
            stats.tier_percent(0),
            stats.tier_percent(1),
            stats.tier_percent(2),
            stats.tier_percent(3),
        );
        debug!(
            "Zero runs: {} runs, longest {}, {} slots",
            stats.zero_runs,
            stats.longest_run,
            split.slot_count()
        );

        let policy = self.config.method;

        let baseline_archive = policy.tries_baseline().then(|| {
            let payload = baseline::encode(&ranks);
            container::write_baseline(original_len, primary_index, crc, &payload)
        });

        let tiered_archive = if policy.tries_tiered() {
            let streams = tiered::encode(&split);
            Some(container::write_tiered(original_len, primary_index, crc, &streams)?)
        } else {
            None
        };

        let baseline_len = baseline_archive.as_ref().map(Vec::len);
        let tiered_len = tiered_archive.as_ref().map(Vec::len);
        debug!("Candidates: baseline {baseline_len:?} bytes, tiered {tiered_len:?} bytes");

        let (method, archive) = match (baseline_archive, tiered_archive) {
            (Some(b), Some(t)) if t.len() < b.len() => (Method::Tiered, t),
            (Some(b), _) => (Method::Baseline, b),
            (None, Some(t)) => (Method::Tiered, t),
            (None, None) => unreachable!("every policy builds at least one candidate"),
        };
        debug!(
            "Selected {method}: {} -> {} bytes",
            input.len(),
            archive.len()
        );

        let streams = Archive::parse(&archive)?.stream_lens();
        let report = CompressReport {
            method,
            original_len: input.len(),
            archive_len: archive.len(),
            baseline_len,
            tiered_len,
            streams,
            stats,
        };
        Ok((archive, report))
    }

    /// Decompress a KF34 archive.
    pub fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        let archive = Archive::parse(data)?;
        let header = archive.header;
        let len = header.original_len as usize;

        if len > self.config.max_output_len {
            return Err(KfracError::capacity_exceeded(
                "original length",
                len as u64,
                self.config.max_output_len as u64,
            ));
        }

        trace!(
            "Header: method {}, length {}, primary index {}, crc {:08x}",
            header.method, header.original_len, header.primary_index, header.crc
        );

        let ranks = match archive.payload {
            Payload::Baseline(payload) => baseline::decode(payload, len)?,
            Payload::Tiered(slices) => {
                let (slot_count, run_count) = header
                    .tiered
                    .map(|l| (l.slot_count as usize, l.run_count as usize))
                    .ok_or_else(|| KfracError::invalid_header("tiered payload without layout"))?;
                trace!("Tiered layout: {slot_count} slots, {run_count} runs");
                let split = tiered::decode(&slices, slot_count, run_count)?;
                zero_run::join(&split.slots, &split.runs, len)?
            }
        };

        let permuted = mtf::inverse_transform(&ranks);
        let output = bwt::inverse_transform(&permuted, header.primary_index as usize)?;

        let computed = Crc32::compute(&output);
        if computed != header.crc {
            return Err(KfracError::crc_mismatch(header.crc, computed));
        }

        Ok(output)
    }
}

impl From<MethodPolicy> for Codec {
    fn from(method: MethodPolicy) -> Self {
        Self::new(Config::new().with_method(method))
    }
}

/// Compress with default settings.
pub fn compress(input: &[u8]) -> Result<Vec<u8>> {
    Codec::default().compress(input)
}

/// Decompress with default settings.
pub fn decompress(archive: &[u8]) -> Result<Vec<u8>> {
    Codec::default().decompress(archive)
}
