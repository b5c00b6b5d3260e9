//! Error types for KFrac operations.
//!
//! Every failure the compressor can report is a variant of [`KfracError`].
//! Variants fall into four recoverable-by-caller classes (see [`ErrorKind`]):
//! malformed containers, desynchronized or exhausted coded streams, checksum
//! mismatches after a complete decode, and length fields that would exceed
//! the configured output capacity.

use std::io;
use thiserror::Error;

/// Broad classification of a [`KfracError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The container header or its declared lengths are malformed.
    Format,
    /// A coded sub-stream is exhausted, over-long, or internally inconsistent.
    Decode,
    /// The fully decoded data does not match the stored checksum.
    Integrity,
    /// A declared length would exceed the allowed output size.
    Capacity,
    /// Underlying I/O failure (file handling around the codec).
    Io,
}

/// The main error type for KFrac operations.
#[derive(Debug, Error)]
pub enum KfracError {
    /// I/O error from underlying reader/writer.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Invalid magic number in archive header.
    #[error("Invalid magic number: expected {expected:#010x}, found {found:#010x}")]
    InvalidMagic {
        /// Expected magic value.
        expected: u32,
        /// Magic value found in the input.
        found: u32,
    },

    /// Input ends before a fixed-size structure is complete.
    #[error("Truncated input: need {needed} bytes, have {available}")]
    Truncated {
        /// Number of bytes needed.
        needed: usize,
        /// Number of bytes available.
        available: usize,
    },

    /// Invalid header field.
    #[error("Invalid header: {message}")]
    InvalidHeader {
        /// Description of the header error.
        message: String,
    },

    /// Unknown coding method byte.
    #[error("Unsupported coding method: {method}")]
    UnsupportedMethod {
        /// The method identifier found in the header.
        method: u8,
    },

    /// A range-coded stream ran out of bytes before all symbols were decoded.
    #[error("Stream '{stream}' exhausted at byte {offset}")]
    StreamExhausted {
        /// Name of the sub-stream.
        stream: &'static str,
        /// Offset at which more input was required.
        offset: usize,
    },

    /// A decoded stream is inconsistent with itself or with the header.
    #[error("Corrupted stream '{stream}': {message}")]
    CorruptedStream {
        /// Name of the sub-stream.
        stream: &'static str,
        /// Description of the inconsistency.
        message: String,
    },

    /// CRC checksum mismatch.
    #[error("CRC mismatch: expected {expected:#010x}, computed {computed:#010x}")]
    CrcMismatch {
        /// CRC stored in the archive.
        expected: u32,
        /// CRC of the decoded data.
        computed: u32,
    },

    /// A length would exceed the permitted capacity.
    #[error("Capacity exceeded: {what} needs {needed} bytes, limit is {limit}")]
    CapacityExceeded {
        /// What was being sized.
        what: &'static str,
        /// Requested size.
        needed: u64,
        /// Permitted maximum.
        limit: u64,
    },
}

/// Result type alias for KFrac operations.
pub type Result<T> = std::result::Result<T, KfracError>;

impl KfracError {
    /// Create an invalid magic error.
    pub fn invalid_magic(expected: u32, found: u32) -> Self {
        Self::InvalidMagic { expected, found }
    }

    /// Create a truncated input error.
    pub fn truncated(needed: usize, available: usize) -> Self {
        Self::Truncated { needed, available }
    }

    /// Create an invalid header error.
    pub fn invalid_header(message: impl Into<String>) -> Self {
        Self::InvalidHeader {
            message: message.into(),
        }
    }

    /// Create an unsupported method error.
    pub fn unsupported_method(method: u8) -> Self {
        Self::UnsupportedMethod { method }
    }

    /// Create a stream exhausted error.
    pub fn stream_exhausted(stream: &'static str, offset: usize) -> Self {
        Self::StreamExhausted { stream, offset }
    }

    /// Create a corrupted stream error.
    pub fn corrupted(stream: &'static str, message: impl Into<String>) -> Self {
        Self::CorruptedStream {
            stream,
            message: message.into(),
        }
    }

    /// Create a CRC mismatch error.
    pub fn crc_mismatch(expected: u32, computed: u32) -> Self {
        Self::CrcMismatch { expected, computed }
    }

    /// Create a capacity exceeded error.
    pub fn capacity_exceeded(what: &'static str, needed: u64, limit: u64) -> Self {
        Self::CapacityExceeded {
            what,
            needed,
            limit,
        }
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Io(_) => ErrorKind::Io,
            Self::InvalidMagic { .. }
            | Self::Truncated { .. }
            | Self::InvalidHeader { .. }
            | Self::UnsupportedMethod { .. } => ErrorKind::Format,
            Self::StreamExhausted { .. } | Self::CorruptedStream { .. } => ErrorKind::Decode,
            Self::CrcMismatch { .. } => ErrorKind::Integrity,
            Self::CapacityExceeded { .. } => ErrorKind::Capacity,
        }
    }
}
