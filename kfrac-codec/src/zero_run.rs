//! Zero-run splitting and Elias-gamma run-length coding.
//!
//! After MTF, most of a typical block is zeros. [`split`] collapses every
//! maximal run of zeros into a single `0` slot and records its length in a
//! separate run list; non-zero ranks pass through as their own slots.
//!
//! Run lengths are coded with Elias gamma over the binary range coder:
//! `k` continue bits (`1`), a stop bit (`0`), then the `k` low-order bits of
//! the length MSB-first (the leading `1` is implicit). Flag bits and mantissa
//! bits use separate models, each conditioned on the previous bit of the same
//! kind.

use crate::model::BitModel;
use crate::range_coder::{RangeDecoder, RangeEncoder, reserve_hint};
use kfrac_core::error::{KfracError, Result};

/// Name of the run-length sub-stream in error messages.
pub const RUNS_STREAM: &str = "runs";

/// Largest gamma exponent a run length can have.
const MAX_EXPONENT: u32 = 31;

/// MTF ranks with every zero run collapsed into one slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ZeroRuns {
    /// Non-zero ranks, plus one `0` per zero run.
    pub slots: Vec<u8>,
    /// Length of each zero run, in slot order.
    pub runs: Vec<u32>,
}

impl ZeroRuns {
    /// Number of slots.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Number of zero runs.
    pub fn run_count(&self) -> usize {
        self.runs.len()
    }

    /// Longest zero run, or 0 when there are none.
    pub fn longest_run(&self) -> u32 {
        self.runs.iter().copied().max().unwrap_or(0)
    }
}

/// Collapse maximal zero runs of `mtf` into single slots.
pub fn split(mtf: &[u8]) -> ZeroRuns {
    let mut out = ZeroRuns::default();
    let mut i = 0;

    while i < mtf.len() {
        if mtf[i] != 0 {
            out.slots.push(mtf[i]);
            i += 1;
            continue;
        }

        let run = mtf[i..].iter().take_while(|&&b| b == 0).count();
        out.slots.push(0);
        out.runs.push(run as u32);
        i += run;
    }

    out
}

/// Expand `slots` back into MTF ranks using `runs`.
///
/// The output must come to exactly `expected_len` bytes; every zero slot must
/// have a positive run and every run must be used.
pub fn join(slots: &[u8], runs: &[u32], expected_len: usize) -> Result<Vec<u8>> {
    let zeros = runs.iter().fold(0usize, |sum, &run| sum.saturating_add(run as usize));
    let mut out = Vec::with_capacity(expected_len.min(slots.len().saturating_add(zeros)));
    let mut runs_iter = runs.iter();

    for &slot in slots {
        if slot != 0 {
            if out.len() >= expected_len {
                return Err(overflow(out.len() + 1, expected_len));
            }
            out.push(slot);
            continue;
        }

        let run = *runs_iter.next().ok_or_else(|| {
            KfracError::corrupted(RUNS_STREAM, "zero slot without a run length")
        })? as usize;
        if run == 0 {
            return Err(KfracError::corrupted(RUNS_STREAM, "zero-length run"));
        }
        let end = out.len().saturating_add(run);
        if end > expected_len {
            return Err(overflow(end, expected_len));
        }
        out.resize(end, 0);
    }

    let leftover = runs_iter.len();
    if leftover > 0 {
        return Err(KfracError::corrupted(
            RUNS_STREAM,
            format!("{leftover} run lengths without a zero slot"),
        ));
    }
    if out.len() != expected_len {
        return Err(KfracError::corrupted(
            RUNS_STREAM,
            format!("expanded to {} bytes, expected {expected_len}", out.len()),
        ));
    }

    Ok(out)
}

fn overflow(needed: usize, limit: usize) -> KfracError {
    KfracError::capacity_exceeded("zero-run expansion", needed as u64, limit as u64)
}

/// Elias-gamma coder state: one flag model and one mantissa model.
#[derive(Debug, Clone)]
pub struct GammaModel {
    flags: BitModel,
    mantissa: BitModel,
    prev_flag: usize,
    prev_mantissa: usize,
}

impl GammaModel {
    /// Fresh models with both contexts at 0.
    pub fn new() -> Self {
        Self {
            flags: BitModel::new(2),
            mantissa: BitModel::new(2),
            prev_flag: 0,
            prev_mantissa: 0,
        }
    }

    fn put_flag(&mut self, encoder: &mut RangeEncoder, bit: bool) {
        encoder.encode_bit(&mut self.flags, self.prev_flag, bit);
        self.prev_flag = bit as usize;
    }

    fn put_mantissa(&mut self, encoder: &mut RangeEncoder, bit: bool) {
        encoder.encode_bit(&mut self.mantissa, self.prev_mantissa, bit);
        self.prev_mantissa = bit as usize;
    }

    /// Encode a positive value.
    pub fn encode(&mut self, encoder: &mut RangeEncoder, value: u32) {
        debug_assert!(value > 0, "gamma codes positive values only");
        let k = u32::BITS - 1 - value.leading_zeros();

        for _ in 0..k {
            self.put_flag(encoder, true);
        }
        self.put_flag(encoder, false);

        for shift in (0..k).rev() {
            self.put_mantissa(encoder, (value >> shift) & 1 == 1);
        }
    }

    /// Decode a value; always at least 1.
    pub fn decode(&mut self, decoder: &mut RangeDecoder<'_>) -> Result<u32> {
        let mut k = 0u32;
        loop {
            let bit = decoder.decode_bit(&mut self.flags, self.prev_flag)?;
            self.prev_flag = bit as usize;
            if !bit {
                break;
            }
            k += 1;
            if k > MAX_EXPONENT {
                return Err(KfracError::corrupted(
                    RUNS_STREAM,
                    "gamma exponent exceeds 31 bits",
                ));
            }
        }

        let mut value = 1u32;
        for _ in 0..k {
            let bit = decoder.decode_bit(&mut self.mantissa, self.prev_mantissa)?;
            self.prev_mantissa = bit as usize;
            value = (value << 1) | bit as u32;
        }
        Ok(value)
    }
}

impl Default for GammaModel {
    fn default() -> Self {
        Self::new()
    }
}

/// Code all run lengths into a standalone range-coded stream.
pub fn encode_runs(runs: &[u32]) -> Vec<u8> {
    let mut encoder = RangeEncoder::with_capacity(runs.len() / 2 + 8);
    let mut model = GammaModel::new();
    for &run in runs {
        model.encode(&mut encoder, run);
    }
    encoder.finish()
}

/// Decode exactly `count` run lengths from `stream`.
///
/// `count` must already be validated against the original length.
pub fn decode_runs(stream: &[u8], count: usize) -> Result<Vec<u32>> {
    let mut decoder = RangeDecoder::new(stream, RUNS_STREAM)?;
    let mut model = GammaModel::new();
    let mut runs = Vec::with_capacity(reserve_hint(count, stream));
    for _ in 0..count {
        runs.push(model.decode(&mut decoder)?);
    }
    decoder.finish()?;
    Ok(runs)
}
