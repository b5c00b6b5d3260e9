//! Tiered method: structure, run and per-tier streams.
//!
//! The zero-run split of the MTF ranks is coded as six independent
//! range-coded sub-streams:
//!
//! - `structure`: one symbol per slot, 0 for a zero run or `tier + 1`,
//!   conditioned on the previous slot's symbol;
//! - `runs`: the Elias-gamma coded zero-run lengths;
//! - `tier1`..`tier4`: the offset of each non-zero rank within its tier,
//!   conditioned on the previous offset coded in the same tier.
//!
//! Every sub-stream is flushed, so each one is at least four bytes long even
//! when it carries no symbols.

use crate::model::ContextModel;
use crate::range_coder::{RangeDecoder, RangeEncoder, reserve_hint};
use crate::tier::{self, SLOT_KINDS, SlotKind, TIER_COUNT};
use crate::zero_run::{self, ZeroRuns};
use kfrac_core::error::{KfracError, Result};

/// Name of the structure stream in error messages.
pub const STRUCTURE_STREAM: &str = "structure";

/// Names of the per-tier streams in error messages.
pub const TIER_STREAMS: [&str; TIER_COUNT] = ["tier1", "tier2", "tier3", "tier4"];

/// Encoded sub-streams of one block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TieredStreams {
    /// Number of slots in the structure stream.
    pub slot_count: usize,
    /// Number of zero runs.
    pub run_count: usize,
    /// Slot kinds.
    pub structure: Vec<u8>,
    /// Gamma-coded run lengths.
    pub runs: Vec<u8>,
    /// Per-tier offsets.
    pub tiers: [Vec<u8>; TIER_COUNT],
}

impl TieredStreams {
    /// Sum of all sub-stream lengths.
    pub fn payload_len(&self) -> usize {
        self.structure.len() + self.runs.len() + self.tiers.iter().map(Vec::len).sum::<usize>()
    }

    /// Borrow the streams for decoding.
    pub fn as_slices(&self) -> TieredSlices<'_> {
        TieredSlices {
            structure: &self.structure,
            runs: &self.runs,
            tiers: [&self.tiers[0], &self.tiers[1], &self.tiers[2], &self.tiers[3]],
        }
    }
}

/// Borrowed sub-streams, as cut out of an archive.
#[derive(Debug, Clone, Copy)]
pub struct TieredSlices<'a> {
    /// Slot kinds.
    pub structure: &'a [u8],
    /// Gamma-coded run lengths.
    pub runs: &'a [u8],
    /// Per-tier offsets.
    pub tiers: [&'a [u8]; TIER_COUNT],
}

fn tier_models() -> [ContextModel; TIER_COUNT] {
    std::array::from_fn(|t| ContextModel::new(tier::tier_size(t), tier::tier_size(t)))
}

/// Encode a zero-run split into tiered sub-streams.
pub fn encode(split: &ZeroRuns) -> TieredStreams {
    let mut structure_model = ContextModel::new(SLOT_KINDS, SLOT_KINDS);
    let mut structure = RangeEncoder::with_capacity(split.slot_count() / 4 + 8);
    let mut prev_kind = 0usize;

    let mut models = tier_models();
    let mut encoders: [RangeEncoder; TIER_COUNT] = std::array::from_fn(|_| RangeEncoder::new());
    let mut prev_offsets = [0usize; TIER_COUNT];

    for &slot in &split.slots {
        let kind = SlotKind::of(slot).symbol();
        structure.encode_context_symbol(&mut structure_model, prev_kind, kind);
        prev_kind = kind;

        if let Some((t, offset)) = tier::classify(slot) {
            let offset = offset as usize;
            encoders[t].encode_context_symbol(&mut models[t], prev_offsets[t], offset);
            prev_offsets[t] = offset;
        }
    }

    TieredStreams {
        slot_count: split.slot_count(),
        run_count: split.run_count(),
        structure: structure.finish(),
        runs: zero_run::encode_runs(&split.runs),
        tiers: encoders.map(RangeEncoder::finish),
    }
}

/// Decode tiered sub-streams back into a zero-run split.
///
/// `slot_count` and `run_count` must already be validated against the
/// original length. Every sub-stream must be consumed exactly.
pub fn decode(slices: &TieredSlices<'_>, slot_count: usize, run_count: usize) -> Result<ZeroRuns> {
    let mut structure_model = ContextModel::new(SLOT_KINDS, SLOT_KINDS);
    let mut structure = RangeDecoder::new(slices.structure, STRUCTURE_STREAM)?;
    let mut prev_kind = 0usize;

    let mut models = tier_models();
    let mut decoders = [
        RangeDecoder::new(slices.tiers[0], TIER_STREAMS[0])?,
        RangeDecoder::new(slices.tiers[1], TIER_STREAMS[1])?,
        RangeDecoder::new(slices.tiers[2], TIER_STREAMS[2])?,
        RangeDecoder::new(slices.tiers[3], TIER_STREAMS[3])?,
    ];
    let mut prev_offsets = [0usize; TIER_COUNT];

    let mut slots = Vec::with_capacity(reserve_hint(slot_count, slices.structure));
    let mut zero_slots = 0usize;

    for _ in 0..slot_count {
        let symbol = structure.decode_context_symbol(&mut structure_model, prev_kind)?;
        prev_kind = symbol;

        match SlotKind::from_symbol(symbol) {
            Some(SlotKind::ZeroRun) => {
                zero_slots += 1;
                slots.push(0);
            }
            Some(SlotKind::Tier(t)) => {
                let offset = decoders[t].decode_context_symbol(&mut models[t], prev_offsets[t])?;
                prev_offsets[t] = offset;
                let rank = u8::try_from(offset)
                    .ok()
                    .and_then(|offset| tier::unclassify(t, offset))
                    .ok_or_else(|| {
                        KfracError::corrupted(TIER_STREAMS[t], format!("offset {offset} outside tier"))
                    })?;
                slots.push(rank);
            }
            None => {
                return Err(KfracError::corrupted(
                    STRUCTURE_STREAM,
                    format!("unknown slot kind {symbol}"),
                ));
            }
        }
    }

    if zero_slots != run_count {
        return Err(KfracError::corrupted(
            STRUCTURE_STREAM,
            format!("{zero_slots} zero slots but {run_count} declared runs"),
        ));
    }

    structure.finish()?;
    for decoder in decoders {
        decoder.finish()?;
    }
    let runs = zero_run::decode_runs(slices.runs, run_count)?;

    Ok(ZeroRuns { slots, runs })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zero_run::split;
    use kfrac_core::ErrorKind;

    fn sample_mtf() -> Vec<u8> {
        (0..3000u32)
            .map(|i| match i % 11 {
                0..=4 => 0,
                5 | 6 => 1 + (i % 3) as u8,
                7 => 4 + (i % 6) as u8,
                8 => 10 + (i % 22) as u8,
                _ => 32 + (i % 224) as u8,
            })
            .collect()
    }

    #[test]
    fn test_tiered_roundtrip() {
        let mtf = sample_mtf();
        let parts = split(&mtf);
        let streams = encode(&parts);
        assert_eq!(streams.slot_count, parts.slot_count());
        assert_eq!(streams.run_count, parts.run_count());

        let decoded = decode(&streams.as_slices(), streams.slot_count, streams.run_count).unwrap();
        assert_eq!(decoded, parts);
        assert_eq!(zero_run::join(&decoded.slots, &decoded.runs, mtf.len()).unwrap(), mtf);
    }

    #[test]
    fn test_tiered_empty_streams_are_flushed() {
        let streams = encode(&ZeroRuns::default());
        assert_eq!(streams.structure.len(), 4);
        assert_eq!(streams.runs.len(), 4);
        assert!(streams.tiers.iter().all(|t| t.len() == 4));
        assert_eq!(streams.payload_len(), 24);
        assert_eq!(decode(&streams.as_slices(), 0, 0).unwrap(), ZeroRuns::default());
    }

    #[test]
    fn test_single_zero_run() {
        let parts = split(&[0u8; 1000]);
        let streams = encode(&parts);
        let decoded = decode(&streams.as_slices(), 1, 1).unwrap();
        assert_eq!(decoded.slots, vec![0]);
        assert_eq!(decoded.runs, vec![1000]);
    }

    #[test]
    fn test_run_count_mismatch() {
        let parts = split(&sample_mtf());
        let streams = encode(&parts);
        let err = decode(&streams.as_slices(), streams.slot_count, streams.run_count - 1)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
    }

    #[test]
    fn test_swapped_streams_rejected() {
        let parts = split(&sample_mtf());
        let streams = encode(&parts);
        let mut slices = streams.as_slices();
        slices.tiers.swap(0, 3);
        assert!(decode(&slices, streams.slot_count, streams.run_count).is_err());
    }
}
