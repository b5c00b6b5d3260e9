//! Carry-less 32-bit range coder.
//!
//! The coder narrows `[low, low + range)` in proportion to the probability of
//! each coded symbol. Instead of propagating carries, renormalization shifts
//! out the top byte of `low` whenever it is settled, or forces it to settle by
//! clipping `range` once it drops below [`BOT`]. After every renormalization
//! `low` and `low + range` differ in their top byte and `range >= BOT`.
//!
//! All arithmetic is unsigned 32-bit and wraps. The decoder performs the same
//! narrowing against a `code` register filled from its input slice; running
//! off the end of that slice is an error, never a silent zero fill.

use crate::model::{BitModel, ContextModel, FrequencyTable, PROB_BITS};
use kfrac_core::error::{KfracError, Result};

/// Top-byte settle threshold.
const TOP: u32 = 1 << 24;

/// Minimum range after renormalization.
const BOT: u32 = 1 << 16;

/// Bytes written by [`RangeEncoder::finish`] and read by [`RangeDecoder::new`].
pub const FLUSH_BYTES: usize = 4;

/// Decoded items reserved up front per coded byte.
const RESERVE_PER_BYTE: usize = 64;

/// Initial capacity for `declared` items decoded from `coded`.
///
/// Counts come from the header and are not trusted for allocation; the
/// buffer still grows to whatever the stream actually yields.
pub fn reserve_hint(declared: usize, coded: &[u8]) -> usize {
    declared.min(coded.len().saturating_mul(RESERVE_PER_BYTE))
}

/// Range encoder writing into an owned buffer.
#[derive(Debug)]
pub struct RangeEncoder {
    buffer: Vec<u8>,
    low: u32,
    range: u32,
}

impl RangeEncoder {
    /// Create a new range encoder.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an encoder whose output buffer is pre-sized to `capacity` bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
            low: 0,
            range: 0xFFFF_FFFF,
        }
    }

    fn normalize(&mut self) {
        loop {
            if (self.low ^ self.low.wrapping_add(self.range)) >= TOP {
                if self.range >= BOT {
                    break;
                }
                self.range = self.low.wrapping_neg() & (BOT - 1);
            }
            self.buffer.push((self.low >> 24) as u8);
            self.low <<= 8;
            self.range <<= 8;
        }
    }

    /// Encode one bit with the probability held by `model` for `ctx`.
    pub fn encode_bit(&mut self, model: &mut BitModel, ctx: usize, bit: bool) {
        let bound = (self.range >> PROB_BITS) * model.probability(ctx) as u32;

        if bit {
            self.range = bound;
        } else {
            self.low = self.low.wrapping_add(bound);
            self.range -= bound;
        }

        self.normalize();
        model.update(ctx, bit);
    }

    /// Encode `symbol` with an adaptive frequency table.
    pub fn encode_symbol(&mut self, table: &mut FrequencyTable, symbol: usize) {
        let (cum, freq) = table.range_of(symbol);
        let r = self.range / table.total();

        self.low = self.low.wrapping_add(cum * r);
        self.range = r * freq;

        self.normalize();
        table.update(symbol);
    }

    /// Encode `symbol` in context `ctx` of an order-1 model.
    #[inline]
    pub fn encode_context_symbol(&mut self, model: &mut ContextModel, ctx: usize, symbol: usize) {
        self.encode_symbol(model.table_mut(ctx), symbol);
    }

    /// Flush the final state and return the encoded bytes.
    pub fn finish(mut self) -> Vec<u8> {
        for _ in 0..FLUSH_BYTES {
            self.buffer.push((self.low >> 24) as u8);
            self.low <<= 8;
        }
        self.buffer
    }
}

impl Default for RangeEncoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Range decoder over one declared sub-stream.
#[derive(Debug)]
pub struct RangeDecoder<'a> {
    input: &'a [u8],
    pos: usize,
    low: u32,
    range: u32,
    code: u32,
    stream: &'static str,
}

impl<'a> RangeDecoder<'a> {
    /// Create a decoder over `input`, priming the code register.
    ///
    /// `stream` names the sub-stream in error messages.
    pub fn new(input: &'a [u8], stream: &'static str) -> Result<Self> {
        let mut decoder = Self {
            input,
            pos: 0,
            low: 0,
            range: 0xFFFF_FFFF,
            code: 0,
            stream,
        };
        for _ in 0..FLUSH_BYTES {
            decoder.code = (decoder.code << 8) | decoder.next_byte()? as u32;
        }
        Ok(decoder)
    }

    fn next_byte(&mut self) -> Result<u8> {
        let byte = *self
            .input
            .get(self.pos)
            .ok_or_else(|| KfracError::stream_exhausted(self.stream, self.pos))?;
        self.pos += 1;
        Ok(byte)
    }

    fn normalize(&mut self) -> Result<()> {
        loop {
            if (self.low ^ self.low.wrapping_add(self.range)) >= TOP {
                if self.range >= BOT {
                    break;
                }
                self.range = self.low.wrapping_neg() & (BOT - 1);
            }
            self.code = (self.code << 8) | self.next_byte()? as u32;
            self.low <<= 8;
            self.range <<= 8;
        }
        Ok(())
    }

    /// Decode one bit with the probability held by `model` for `ctx`.
    pub fn decode_bit(&mut self, model: &mut BitModel, ctx: usize) -> Result<bool> {
        let bound = (self.range >> PROB_BITS) * model.probability(ctx) as u32;
        let bit = self.code.wrapping_sub(self.low) < bound;

        if bit {
            self.range = bound;
        } else {
            self.low = self.low.wrapping_add(bound);
            self.range -= bound;
        }

        self.normalize()?;
        model.update(ctx, bit);
        Ok(bit)
    }

    /// Decode one symbol with an adaptive frequency table.
    pub fn decode_symbol(&mut self, table: &mut FrequencyTable) -> Result<usize> {
        let r = self.range / table.total();
        let target = self.code.wrapping_sub(self.low) / r;

        let (symbol, cum, freq) = table.find(target).ok_or_else(|| {
            KfracError::corrupted(
                self.stream,
                format!(
                    "code points past the model total at byte {} ({} >= {})",
                    self.pos,
                    target,
                    table.total()
                ),
            )
        })?;

        self.low = self.low.wrapping_add(cum * r);
        self.range = r * freq;

        self.normalize()?;
        table.update(symbol);
        Ok(symbol)
    }

    /// Decode a symbol in context `ctx` of an order-1 model.
    #[inline]
    pub fn decode_context_symbol(&mut self, model: &mut ContextModel, ctx: usize) -> Result<usize> {
        self.decode_symbol(model.table_mut(ctx))
    }

    /// Check that the whole declared stream was consumed.
    ///
    /// The encoder emits exactly one byte per renormalization shift plus the
    /// flush, so a well-formed stream ends precisely at the last symbol.
    pub fn finish(self) -> Result<()> {
        if self.pos != self.input.len() {
            return Err(KfracError::corrupted(
                self.stream,
                format!(
                    "{} trailing bytes after the last symbol",
                    self.input.len() - self.pos
                ),
            ));
        }
        Ok(())
    }
}
