//! # KFrac Core
//!
//! Core components shared by the KFrac compressor crates:
//!
//! - [`crc`]: CRC-32 checksum used to verify lossless round-trips
//! - [`wire`]: big-endian fixed-width integer helpers for container headers
//! - [`error`]: error taxonomy and `Result` alias
//!
//! Nothing here knows about transforms or entropy coding. `kfrac-codec`
//! builds the BWT/MTF pipeline, the range coder and the KF34 container on
//! top of these pieces, and `kfrac-cli` wraps the codec for files.
//!
//! ## Example
//!
//! ```rust
//! use kfrac_core::crc::Crc32;
//! use kfrac_core::wire::{ByteReader, put_u32_be};
//!
//! let mut header = Vec::new();
//! put_u32_be(&mut header, Crc32::compute(b"Hello, World!"));
//!
//! let mut reader = ByteReader::new(&header);
//! assert_eq!(reader.read_u32_be().unwrap(), 0xEC4AC3D0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod crc;
pub mod error;
pub mod wire;

pub use crc::Crc32;
pub use error::{ErrorKind, KfracError, Result};
pub use wire::ByteReader;
