//! KF34 container format.
//!
//! All integers are big-endian.
//!
//! ```text
//! offset  size  field
//! 0       4     magic 0x4B463334 ("KF34")
//! 4       4     original length
//! 8       4     BWT primary index
//! 12      4     CRC-32 of the original data
//! 16      1     method (1 = baseline, 2 = tiered)
//! 17      3     reserved, zero
//! ```
//!
//! The baseline payload follows the 20-byte header directly. The tiered
//! method adds seven fields (slot count, run count, then the lengths of the
//! structure, run, tier-1, tier-2 and tier-3 streams); the tier-4 stream is
//! the rest of the archive.

use crate::baseline::BASELINE_STREAM;
use crate::range_coder::FLUSH_BYTES;
use crate::tier::TIER_COUNT;
use crate::tiered::{STRUCTURE_STREAM, TIER_STREAMS, TieredSlices, TieredStreams};
use crate::zero_run::RUNS_STREAM;
use kfrac_core::error::{KfracError, Result};
use kfrac_core::wire::{ByteReader, put_u8, put_u32_be};
use std::fmt;

/// Archive magic number ("KF34").
pub const MAGIC: u32 = 0x4B46_3334;

/// Size of the common header.
pub const HEADER_LEN: usize = 20;

/// Size of the tiered header extension.
pub const TIERED_EXTENSION_LEN: usize = 28;

/// Encoding method stored in the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Method {
    /// One order-1 stream over all MTF ranks.
    Baseline = 1,
    /// Structure, run and per-tier streams.
    Tiered = 2,
}

impl Method {
    /// Parse the method byte.
    pub fn from_u8(value: u8) -> Result<Self> {
        match value {
            1 => Ok(Method::Baseline),
            2 => Ok(Method::Tiered),
            other => Err(KfracError::unsupported_method(other)),
        }
    }

    /// Method byte.
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Method::Baseline => "baseline",
            Method::Tiered => "tiered",
        }
    }

    /// Header size for archives using this method.
    pub fn header_len(self) -> usize {
        match self {
            Method::Baseline => HEADER_LEN,
            Method::Tiered => HEADER_LEN + TIERED_EXTENSION_LEN,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Counts and stream lengths of a tiered archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TieredLayout {
    /// Slots in the structure stream.
    pub slot_count: u32,
    /// Zero runs.
    pub run_count: u32,
    /// Structure stream length.
    pub structure_len: u32,
    /// Run stream length.
    pub runs_len: u32,
    /// Lengths of the tier-1 to tier-3 streams.
    pub tier_lens: [u32; TIER_COUNT - 1],
}

impl TieredLayout {
    /// Layout describing `streams`.
    pub fn of(streams: &TieredStreams) -> Result<Self> {
        Ok(Self {
            slot_count: to_u32("slot count", streams.slot_count)?,
            run_count: to_u32("run count", streams.run_count)?,
            structure_len: to_u32("structure stream", streams.structure.len())?,
            runs_len: to_u32("run stream", streams.runs.len())?,
            tier_lens: [
                to_u32("tier stream", streams.tiers[0].len())?,
                to_u32("tier stream", streams.tiers[1].len())?,
                to_u32("tier stream", streams.tiers[2].len())?,
            ],
        })
    }

    /// Total length of the explicitly sized streams.
    fn declared_len(&self) -> u64 {
        self.structure_len as u64
            + self.runs_len as u64
            + self.tier_lens.iter().map(|&l| l as u64).sum::<u64>()
    }
}

fn to_u32(what: &'static str, value: usize) -> Result<u32> {
    u32::try_from(value)
        .map_err(|_| KfracError::capacity_exceeded(what, value as u64, u32::MAX as u64))
}

/// Parsed archive header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Length of the original data.
    pub original_len: u32,
    /// BWT primary index.
    pub primary_index: u32,
    /// CRC-32 of the original data.
    pub crc: u32,
    /// Encoding method.
    pub method: Method,
    /// Present exactly when `method` is [`Method::Tiered`].
    pub tiered: Option<TieredLayout>,
}

impl Header {
    /// Serialized size of this header.
    pub fn len(&self) -> usize {
        self.method.header_len()
    }

    /// Whether the archive holds no data.
    pub fn is_empty(&self) -> bool {
        self.original_len == 0
    }

    /// Append the header to `out`.
    pub fn write(&self, out: &mut Vec<u8>) {
        put_u32_be(out, MAGIC);
        put_u32_be(out, self.original_len);
        put_u32_be(out, self.primary_index);
        put_u32_be(out, self.crc);
        put_u8(out, self.method.as_u8());
        out.extend_from_slice(&[0; 3]);

        if let Some(layout) = &self.tiered {
            put_u32_be(out, layout.slot_count);
            put_u32_be(out, layout.run_count);
            put_u32_be(out, layout.structure_len);
            put_u32_be(out, layout.runs_len);
            for &len in &layout.tier_lens {
                put_u32_be(out, len);
            }
        }
    }

    /// Parse and validate the header at the start of `reader`.
    pub fn read(reader: &mut ByteReader<'_>) -> Result<Self> {
        let magic = reader.read_u32_be()?;
        if magic != MAGIC {
            return Err(KfracError::invalid_magic(MAGIC, magic));
        }

        let original_len = reader.read_u32_be()?;
        let primary_index = reader.read_u32_be()?;
        let crc = reader.read_u32_be()?;
        let method = Method::from_u8(reader.read_u8()?)?;
        let reserved = reader.read_array::<3>()?;
        if reserved != [0; 3] {
            return Err(KfracError::invalid_header(format!(
                "reserved bytes must be zero, found {reserved:02x?}"
            )));
        }

        if original_len == 0 {
            if primary_index != 0 {
                return Err(KfracError::invalid_header(format!(
                    "primary index {primary_index} in an empty archive"
                )));
            }
        } else if primary_index >= original_len {
            return Err(KfracError::invalid_header(format!(
                "primary index {primary_index} out of range for {original_len} bytes"
            )));
        }

        let tiered = match method {
            Method::Baseline => None,
            Method::Tiered => Some(Self::read_tiered(reader, original_len)?),
        };

        Ok(Self {
            original_len,
            primary_index,
            crc,
            method,
            tiered,
        })
    }

    fn read_tiered(reader: &mut ByteReader<'_>, original_len: u32) -> Result<TieredLayout> {
        let layout = TieredLayout {
            slot_count: reader.read_u32_be()?,
            run_count: reader.read_u32_be()?,
            structure_len: reader.read_u32_be()?,
            runs_len: reader.read_u32_be()?,
            tier_lens: [
                reader.read_u32_be()?,
                reader.read_u32_be()?,
                reader.read_u32_be()?,
            ],
        };

        if layout.slot_count > original_len {
            return Err(KfracError::invalid_header(format!(
                "{} slots for {original_len} bytes",
                layout.slot_count
            )));
        }
        if layout.run_count > layout.slot_count {
            return Err(KfracError::invalid_header(format!(
                "{} runs for {} slots",
                layout.run_count, layout.slot_count
            )));
        }
        if layout.declared_len() > reader.remaining() as u64 {
            return Err(KfracError::invalid_header(format!(
                "declared streams need {} bytes after offset {}, only {} remain",
                layout.declared_len(),
                reader.position(),
                reader.remaining()
            )));
        }

        Ok(layout)
    }
}

/// Coded payload of an archive, borrowed from its bytes.
#[derive(Debug, Clone, Copy)]
pub enum Payload<'a> {
    /// Single baseline stream.
    Baseline(&'a [u8]),
    /// Tiered sub-streams.
    Tiered(TieredSlices<'a>),
}

/// Parsed archive: header plus payload slices.
#[derive(Debug, Clone, Copy)]
pub struct Archive<'a> {
    /// Validated header.
    pub header: Header,
    /// Payload slices.
    pub payload: Payload<'a>,
}

impl<'a> Archive<'a> {
    /// Parse `data`, validating the header and cutting out every sub-stream.
    ///
    /// Every coded stream carries at least the range coder flush, so a
    /// shorter stream is a header error. The baseline payload and the tier-4
    /// stream have no stored length; trailing bytes after them are only
    /// detected when decoding shows the stream was not consumed exactly.
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        if data.len() < HEADER_LEN {
            return Err(KfracError::truncated(HEADER_LEN, data.len()));
        }

        let mut reader = ByteReader::new(data);
        let header = Header::read(&mut reader)?;

        let payload = match &header.tiered {
            None => Payload::Baseline(coded(BASELINE_STREAM, reader.rest())?),
            Some(layout) => Payload::Tiered(TieredSlices {
                structure: coded(STRUCTURE_STREAM, reader.take(layout.structure_len as usize)?)?,
                runs: coded(RUNS_STREAM, reader.take(layout.runs_len as usize)?)?,
                tiers: [
                    coded(TIER_STREAMS[0], reader.take(layout.tier_lens[0] as usize)?)?,
                    coded(TIER_STREAMS[1], reader.take(layout.tier_lens[1] as usize)?)?,
                    coded(TIER_STREAMS[2], reader.take(layout.tier_lens[2] as usize)?)?,
                    coded(TIER_STREAMS[3], reader.rest())?,
                ],
            }),
        };

        Ok(Self { header, payload })
    }

    /// Named lengths of every sub-stream, in archive order.
    pub fn stream_lens(&self) -> Vec<(&'static str, usize)> {
        match &self.payload {
            Payload::Baseline(stream) => vec![(BASELINE_STREAM, stream.len())],
            Payload::Tiered(slices) => {
                let mut lens = vec![
                    (STRUCTURE_STREAM, slices.structure.len()),
                    (RUNS_STREAM, slices.runs.len()),
                ];
                lens.extend(
                    TIER_STREAMS
                        .iter()
                        .zip(slices.tiers.iter())
                        .map(|(&name, stream)| (name, stream.len())),
                );
                lens
            }
        }
    }
}

fn coded<'a>(name: &str, stream: &'a [u8]) -> Result<&'a [u8]> {
    if stream.len() < FLUSH_BYTES {
        return Err(KfracError::invalid_header(format!(
            "{name} stream is {} bytes, shorter than the {FLUSH_BYTES}-byte flush",
            stream.len()
        )));
    }
    Ok(stream)
}

/// Write a baseline archive.
pub fn write_baseline(original_len: u32, primary_index: u32, crc: u32, payload: &[u8]) -> Vec<u8> {
    let header = Header {
        original_len,
        primary_index,
        crc,
        method: Method::Baseline,
        tiered: None,
    };
    let mut out = Vec::with_capacity(HEADER_LEN + payload.len());
    header.write(&mut out);
    out.extend_from_slice(payload);
    out
}

/// Write a tiered archive.
pub fn write_tiered(
    original_len: u32,
    primary_index: u32,
    crc: u32,
    streams: &TieredStreams,
) -> Result<Vec<u8>> {
    let header = Header {
        original_len,
        primary_index,
        crc,
        method: Method::Tiered,
        tiered: Some(TieredLayout::of(streams)?),
    };
    let mut out = Vec::with_capacity(header.len() + streams.payload_len());
    header.write(&mut out);
    out.extend_from_slice(&streams.structure);
    out.extend_from_slice(&streams.runs);
    for tier in &streams.tiers {
        out.extend_from_slice(tier);
    }
    Ok(out)
}

/// Header-level description of an archive, produced without decoding.
#[derive(Debug, Clone, PartialEq)]
pub struct ArchiveInfo {
    /// Encoding method.
    pub method: Method,
    /// Length of the original data.
    pub original_len: u32,
    /// BWT primary index.
    pub primary_index: u32,
    /// CRC-32 of the original data.
    pub crc: u32,
    /// Total archive length.
    pub archive_len: usize,
    /// Header length.
    pub header_len: usize,
    /// Slot and run counts (tiered only).
    pub counts: Option<(u32, u32)>,
    /// Named sub-stream lengths.
    pub streams: Vec<(&'static str, usize)>,
}

impl ArchiveInfo {
    /// Archive size relative to the original, in percent.
    pub fn ratio_percent(&self) -> f64 {
        if self.original_len == 0 {
            0.0
        } else {
            self.archive_len as f64 * 100.0 / self.original_len as f64
        }
    }
}

/// Parse and validate an archive's header and layout without decoding.
pub fn inspect(data: &[u8]) -> Result<ArchiveInfo> {
    let archive = Archive::parse(data)?;
    let header = archive.header;
    Ok(ArchiveInfo {
        method: header.method,
        original_len: header.original_len,
        primary_index: header.primary_index,
        crc: header.crc,
        archive_len: data.len(),
        header_len: header.len(),
        counts: header.tiered.map(|l| (l.slot_count, l.run_count)),
        streams: archive.stream_lens(),
    })
}
