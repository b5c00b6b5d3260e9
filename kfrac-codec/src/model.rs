//! Adaptive probability models for the range coder.
//!
//! Two kinds of model are used:
//! - [`BitModel`]: one 12-bit probability of a `1` bit per context, moved
//!   toward the observed bit by 1/32 of the remaining distance.
//! - [`FrequencyTable`] / [`ContextModel`]: adaptive symbol counts. A
//!   [`ContextModel`] keeps one table per order-1 context (the previous
//!   symbol of the same stream).
//!
//! The encoder and decoder apply the same update after every coded symbol,
//! so both sides always see identical model state.

/// Number of bits in a binary probability.
pub const PROB_BITS: u32 = 12;

/// Probability representing 50%.
pub const PROB_INIT: u16 = 1 << (PROB_BITS - 1);

/// Probability scale (exclusive upper bound).
pub const PROB_MAX: u16 = 1 << PROB_BITS;

/// Adaptation shift for binary probabilities.
pub const MOVE_BITS: u32 = 5;

/// Count added to a symbol each time it is coded.
pub const FREQ_INCREMENT: u16 = 16;

/// Total above which all counts of a table are halved.
pub const FREQ_LIMIT: u32 = 0x3FFF;

/// Adaptive binary model with one probability per context.
#[derive(Debug, Clone)]
pub struct BitModel {
    probs: Vec<u16>,
}

impl BitModel {
    /// Create a model with `contexts` independent probabilities, all at 50%.
    pub fn new(contexts: usize) -> Self {
        Self {
            probs: vec![PROB_INIT; contexts],
        }
    }

    /// Probability (out of [`PROB_MAX`]) that the next bit in `ctx` is `1`.
    #[inline]
    pub fn probability(&self, ctx: usize) -> u16 {
        self.probs[ctx]
    }

    /// Move the probability of `ctx` toward the coded bit.
    #[inline]
    pub fn update(&mut self, ctx: usize, bit: bool) {
        let prob = &mut self.probs[ctx];
        if bit {
            *prob += (PROB_MAX - *prob) >> MOVE_BITS;
        } else {
            *prob -= *prob >> MOVE_BITS;
        }
    }
}

/// Adaptive frequency table over a fixed alphabet.
#[derive(Debug, Clone)]
pub struct FrequencyTable {
    freq: Vec<u16>,
    total: u32,
}

impl FrequencyTable {
    /// Create a table over `symbols` symbols, each with count 1.
    pub fn new(symbols: usize) -> Self {
        Self {
            freq: vec![1; symbols],
            total: symbols as u32,
        }
    }

    /// Sum of all counts.
    #[inline]
    pub fn total(&self) -> u32 {
        self.total
    }

    /// Cumulative count below `symbol` and the symbol's own count.
    #[inline]
    pub fn range_of(&self, symbol: usize) -> (u32, u32) {
        let cum = self.freq[..symbol].iter().map(|&f| f as u32).sum();
        (cum, self.freq[symbol] as u32)
    }

    /// Locate the symbol whose cumulative interval contains `target`.
    ///
    /// Returns `(symbol, cum, freq)`, or `None` when `target >= total`.
    pub fn find(&self, target: u32) -> Option<(usize, u32, u32)> {
        if target >= self.total {
            return None;
        }
        let mut cum = 0u32;
        for (symbol, &f) in self.freq.iter().enumerate() {
            let f = f as u32;
            if target < cum + f {
                return Some((symbol, cum, f));
            }
            cum += f;
        }
        None
    }

    /// Record one occurrence of `symbol`, halving all counts on overflow.
    pub fn update(&mut self, symbol: usize) {
        self.freq[symbol] += FREQ_INCREMENT;
        self.total += FREQ_INCREMENT as u32;

        if self.total > FREQ_LIMIT {
            let mut total = 0u32;
            for f in &mut self.freq {
                *f = (*f >> 1) | 1;
                total += *f as u32;
            }
            self.total = total;
        }
    }
}

/// Order-1 context model: one [`FrequencyTable`] per context.
#[derive(Debug, Clone)]
pub struct ContextModel {
    tables: Vec<FrequencyTable>,
}

impl ContextModel {
    /// Create `contexts` tables over `symbols` symbols each.
    pub fn new(contexts: usize, symbols: usize) -> Self {
        Self {
            tables: vec![FrequencyTable::new(symbols); contexts],
        }
    }

    /// Mutable table for `ctx`.
    #[inline]
    pub fn table_mut(&mut self, ctx: usize) -> &mut FrequencyTable {
        &mut self.tables[ctx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prob_constants() {
        assert_eq!(PROB_INIT, 2048);
        assert_eq!(PROB_MAX, 4096);
    }

    #[test]
    fn test_bit_model_adapts_and_stays_in_range() {
        let mut model = BitModel::new(2);
        for _ in 0..1000 {
            model.update(0, true);
            model.update(1, false);
        }
        assert!(model.probability(0) > 4000 && model.probability(0) < PROB_MAX);
        assert!(model.probability(1) > 0 && model.probability(1) < 100);
        assert_eq!(model.probs.len(), 2);
    }

    #[test]
    fn test_bit_model_update_steps() {
        let mut model = BitModel::new(1);
        model.update(0, true);
        assert_eq!(model.probability(0), 2048 + (2048 >> 5));
        let mut model = BitModel::new(1);
        model.update(0, false);
        assert_eq!(model.probability(0), 2048 - (2048 >> 5));
    }

    #[test]
    fn test_frequency_table_ranges() {
        let mut table = FrequencyTable::new(4);
        assert_eq!(table.total(), 4);
        table.update(2);
        assert_eq!(table.total(), 20);
        assert_eq!(table.range_of(0), (0, 1));
        assert_eq!(table.range_of(2), (2, 17));
        assert_eq!(table.range_of(3), (19, 1));
        assert_eq!(table.find(0), Some((0, 0, 1)));
        assert_eq!(table.find(2), Some((2, 2, 17)));
        assert_eq!(table.find(18), Some((2, 2, 17)));
        assert_eq!(table.find(19), Some((3, 19, 1)));
        assert_eq!(table.find(20), None);
    }

    #[test]
    fn test_frequency_table_rescale() {
        let mut table = FrequencyTable::new(3);
        for _ in 0..5000 {
            table.update(1);
            assert!(table.total() <= FREQ_LIMIT);
            let sum: u32 = (0..3).map(|s| table.range_of(s).1).sum();
            assert_eq!(sum, table.total());
        }
        // Halving keeps a floor of one for unseen symbols.
        assert!(table.range_of(0).1 >= 1);
        assert!(table.range_of(2).1 >= 1);
        assert!(table.range_of(1).1 > 8000);
    }

    #[test]
    fn test_context_model_independent_tables() {
        let mut model = ContextModel::new(3, 5);
        model.table_mut(1).update(4);
        assert_eq!(model.tables.len(), 3);
        assert_eq!(model.tables[0].total(), 5);
        assert_eq!(model.tables[1].total(), 21);
        assert_eq!(model.tables[2].total(), 5);
        assert_eq!(model.tables[1].freq.len(), 5);
    }
}
