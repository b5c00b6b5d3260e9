//! Tier partition of non-zero MTF ranks.
//!
//! Ranks `1..=255` are split into four fixed tiers. Small ranks dominate
//! post-BWT data, so each tier gets its own small alphabet and its own
//! adaptive model instead of sharing one 255-symbol table.
//!
//! | tier | ranks      | alphabet |
//! |------|------------|----------|
//! | 0    | `1..=3`    | 3        |
//! | 1    | `4..=9`    | 6        |
//! | 2    | `10..=31`  | 22       |
//! | 3    | `32..=255` | 224      |
//!
//! The partition is part of the archive format.

use crate::zero_run::ZeroRuns;

/// Number of tiers.
pub const TIER_COUNT: usize = 4;

/// Inclusive `(first, last)` rank of each tier.
pub const TIERS: [(u8, u8); TIER_COUNT] = [(1, 3), (4, 9), (10, 31), (32, 255)];

/// Alphabet size of `tier`.
#[inline]
pub const fn tier_size(tier: usize) -> usize {
    (TIERS[tier].1 - TIERS[tier].0) as usize + 1
}

/// Map a non-zero rank to `(tier, offset within tier)`.
///
/// Returns `None` for 0, which is carried by the zero-run stream instead.
pub fn classify(rank: u8) -> Option<(usize, u8)> {
    TIERS
        .iter()
        .position(|&(first, last)| (first..=last).contains(&rank))
        .map(|tier| (tier, rank - TIERS[tier].0))
}

/// Inverse of [`classify`]; `None` for an unknown tier or an offset past the
/// end of the tier.
pub fn unclassify(tier: usize, offset: u8) -> Option<u8> {
    let &(first, last) = TIERS.get(tier)?;
    first.checked_add(offset).filter(|&rank| rank <= last)
}

/// Kind of one slot in the structure stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    /// A zero run.
    ZeroRun,
    /// A non-zero rank in the given tier.
    Tier(usize),
}

/// Number of structure-stream symbols.
pub const SLOT_KINDS: usize = TIER_COUNT + 1;

impl SlotKind {
    /// Kind of a slot value.
    pub fn of(slot: u8) -> Self {
        match classify(slot) {
            Some((tier, _)) => SlotKind::Tier(tier),
            None => SlotKind::ZeroRun,
        }
    }

    /// Structure-stream symbol: 0 for a run, `tier + 1` otherwise.
    #[inline]
    pub fn symbol(self) -> usize {
        match self {
            SlotKind::ZeroRun => 0,
            SlotKind::Tier(tier) => tier + 1,
        }
    }

    /// Inverse of [`SlotKind::symbol`].
    pub fn from_symbol(symbol: usize) -> Option<Self> {
        match symbol {
            0 => Some(SlotKind::ZeroRun),
            s if s <= TIER_COUNT => Some(SlotKind::Tier(s - 1)),
            _ => None,
        }
    }
}

/// Distribution of an MTF block across zeros and tiers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TierStats {
    /// Total MTF ranks.
    pub total: usize,
    /// Ranks equal to zero.
    pub zeros: usize,
    /// Non-zero ranks per tier.
    pub tier_counts: [usize; TIER_COUNT],
    /// Number of zero runs.
    pub zero_runs: usize,
    /// Longest zero run.
    pub longest_run: u32,
}

impl TierStats {
    /// Collect statistics from MTF ranks and their zero-run split.
    pub fn collect(mtf: &[u8], split: &ZeroRuns) -> Self {
        let mut stats = TierStats {
            total: mtf.len(),
            zero_runs: split.run_count(),
            longest_run: split.longest_run(),
            ..Default::default()
        };
        for &rank in mtf {
            match classify(rank) {
                Some((tier, _)) => stats.tier_counts[tier] += 1,
                None => stats.zeros += 1,
            }
        }
        stats
    }

    /// Share of ranks that are zero, in percent.
    pub fn zero_percent(&self) -> f64 {
        percent(self.zeros, self.total)
    }

    /// Share of ranks in `tier`, in percent.
    pub fn tier_percent(&self, tier: usize) -> f64 {
        percent(self.tier_counts[tier], self.total)
    }
}

fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 * 100.0 / total as f64
    }
}
