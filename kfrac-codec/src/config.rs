//! Codec configuration.

use crate::container::Method;

/// Default limit on the original length `decompress` accepts (256 MiB).
///
/// A block this size already needs several times its length in working
/// memory for the inverse BWT. Raise it with [`Config::with_max_output_len`]
/// for larger archives.
pub const DEFAULT_MAX_OUTPUT_LEN: usize = 256 << 20;

/// How `compress` picks the encoding method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MethodPolicy {
    /// Encode both ways and keep the smaller archive; ties go to baseline.
    #[default]
    Auto,
    /// Always use the baseline method.
    Baseline,
    /// Always use the tiered method.
    Tiered,
}

impl MethodPolicy {
    /// Whether the baseline candidate must be produced.
    pub fn tries_baseline(self) -> bool {
        matches!(self, MethodPolicy::Auto | MethodPolicy::Baseline)
    }

    /// Whether the tiered candidate must be produced.
    pub fn tries_tiered(self) -> bool {
        matches!(self, MethodPolicy::Auto | MethodPolicy::Tiered)
    }
}

impl From<Method> for MethodPolicy {
    fn from(method: Method) -> Self {
        match method {
            Method::Baseline => MethodPolicy::Baseline,
            Method::Tiered => MethodPolicy::Tiered,
        }
    }
}

/// Compression and decompression settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Method selection.
    pub method: MethodPolicy,
    /// Largest original length `decompress` accepts.
    pub max_output_len: usize,
}

impl Config {
    /// Default settings: automatic method, output limited to
    /// [`DEFAULT_MAX_OUTPUT_LEN`].
    pub fn new() -> Self {
        Self {
            method: MethodPolicy::Auto,
            max_output_len: DEFAULT_MAX_OUTPUT_LEN,
        }
    }

    /// Set the method policy.
    pub fn with_method(mut self, method: MethodPolicy) -> Self {
        self.method = method;
        self
    }

    /// Set the decompression output limit.
    pub fn with_max_output_len(mut self, limit: usize) -> Self {
        self.max_output_len = limit;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
