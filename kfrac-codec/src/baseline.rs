//! Baseline method: every MTF rank through one order-1 model.
//!
//! A single 256x256 context model codes each rank, conditioned on the
//! previous rank. This is the fallback whenever the tiered layout does not
//! pay for its larger header.

use crate::model::ContextModel;
use crate::range_coder::{RangeDecoder, RangeEncoder, reserve_hint};
use kfrac_core::error::Result;

/// Name of the baseline payload in error messages.
pub const BASELINE_STREAM: &str = "baseline";

const ALPHABET: usize = 256;

/// Code MTF ranks into a single range-coded payload.
pub fn encode(mtf: &[u8]) -> Vec<u8> {
    let mut model = ContextModel::new(ALPHABET, ALPHABET);
    let mut encoder = RangeEncoder::with_capacity(mtf.len() / 2 + 8);
    let mut prev = 0usize;

    for &rank in mtf {
        encoder.encode_context_symbol(&mut model, prev, rank as usize);
        prev = rank as usize;
    }

    encoder.finish()
}

/// Decode exactly `len` MTF ranks from `payload`.
pub fn decode(payload: &[u8], len: usize) -> Result<Vec<u8>> {
    let mut model = ContextModel::new(ALPHABET, ALPHABET);
    let mut decoder = RangeDecoder::new(payload, BASELINE_STREAM)?;
    let mut mtf = Vec::with_capacity(reserve_hint(len, payload));
    let mut prev = 0usize;

    for _ in 0..len {
        let rank = decoder.decode_context_symbol(&mut model, prev)?;
        mtf.push(rank as u8);
        prev = rank;
    }

    decoder.finish()?;
    Ok(mtf)
}
