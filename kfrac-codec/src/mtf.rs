//! Move-to-Front transform.
//!
//! Each byte is replaced by its current position in a 256-entry table, then
//! moved to the front. The table starts as the identity permutation on every
//! call, so repeated bytes coming out of the BWT become runs of zeros.

/// Identity-initialized move-to-front table.
#[derive(Debug, Clone)]
struct MtfTable {
    symbols: [u8; 256],
}

impl MtfTable {
    fn new() -> Self {
        let mut symbols = [0u8; 256];
        for (i, s) in symbols.iter_mut().enumerate() {
            *s = i as u8;
        }
        Self { symbols }
    }

    /// Rank of `byte`, moving it to the front.
    #[inline]
    fn encode(&mut self, byte: u8) -> u8 {
        // Every value 0..=255 is present in the table.
        let pos = self
            .symbols
            .iter()
            .position(|&b| b == byte)
            .unwrap_or_default();
        self.move_to_front(pos);
        pos as u8
    }

    /// Byte at `rank`, moving it to the front.
    #[inline]
    fn decode(&mut self, rank: u8) -> u8 {
        let pos = rank as usize;
        let byte = self.symbols[pos];
        self.move_to_front(pos);
        byte
    }

    #[inline]
    fn move_to_front(&mut self, pos: usize) {
        if pos > 0 {
            let byte = self.symbols[pos];
            self.symbols.copy_within(0..pos, 1);
            self.symbols[0] = byte;
        }
    }
}

/// Replace every byte by its move-to-front rank.
pub fn transform(data: &[u8]) -> Vec<u8> {
    let mut table = MtfTable::new();
    data.iter().map(|&byte| table.encode(byte)).collect()
}

/// Restore the bytes behind a sequence of move-to-front ranks.
pub fn inverse_transform(ranks: &[u8]) -> Vec<u8> {
    let mut table = MtfTable::new();
    ranks.iter().map(|&rank| table.decode(rank)).collect()
}
