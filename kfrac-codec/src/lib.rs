//! KFrac block compression.
//!
//! A whole input is compressed as one block through this pipeline:
//! 1. Burrows-Wheeler Transform - groups bytes that share a context
//! 2. Move-to-Front - turns those groups into small ranks, mostly zero
//! 3. Zero-run split - collapses zero runs into single slots
//! 4. Adaptive range coding - either one order-1 stream over all ranks
//!    (baseline) or separate structure, run and per-tier streams (tiered)
//!
//! Both encodings are tried and the smaller archive is kept.
//!
//! # Example
//!
//! ```rust
//! use kfrac_codec::{Codec, Config, MethodPolicy, compress, decompress};
//!
//! let data = b"hierarchical block compression, hierarchical block compression";
//! let archive = compress(data).unwrap();
//! assert_eq!(decompress(&archive).unwrap(), data);
//!
//! let codec = Codec::new(Config::new().with_method(MethodPolicy::Tiered));
//! let (archive, report) = codec.compress_with_report(data).unwrap();
//! assert_eq!(report.method.name(), "tiered");
//! assert_eq!(codec.decompress(&archive).unwrap(), data);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod baseline;
/// Burrows-Wheeler Transform implementation.
pub mod bwt;
mod codec;
pub mod config;
pub mod container;
pub mod model;
pub mod mtf;
pub mod range_coder;
pub mod tier;
pub mod tiered;
pub mod zero_run;

pub use codec::{Codec, CompressReport, compress, decompress};
pub use config::{Config, DEFAULT_MAX_OUTPUT_LEN, MethodPolicy};
pub use container::{ArchiveInfo, HEADER_LEN, MAGIC, Method, TIERED_EXTENSION_LEN, inspect};
pub use tier::TierStats;
