//! CRC-32 checksum.
//!
//! KFrac archives store the CRC-32 (reflected polynomial `0xEDB88320`, the
//! ZIP/GZIP variant) of the uncompressed data. A decode is only accepted once
//! the restored bytes hash to the stored value.
//!
//! Inputs of [`SLICE_THRESHOLD`] bytes or more are hashed eight bytes per step
//! through eight derived tables; shorter inputs and the tail use the plain
//! table. All tables are built at compile time.

/// Reflected CRC-32 polynomial.
const POLY: u32 = 0xEDB8_8320;

/// Register value before any data and the final XOR mask.
const INIT: u32 = 0xFFFF_FFFF;

/// Input length from which the eight-table path is used.
pub const SLICE_THRESHOLD: usize = 16;

const fn build_tables() -> [[u32; 256]; 8] {
    let mut tables = [[0u32; 256]; 8];

    let mut n = 0;
    while n < 256 {
        let mut reg = n as u32;
        let mut bit = 0;
        while bit < 8 {
            reg = if reg & 1 == 1 { (reg >> 1) ^ POLY } else { reg >> 1 };
            bit += 1;
        }
        tables[0][n] = reg;
        n += 1;
    }

    // tables[k][n]: CRC of byte n followed by k zero bytes.
    let mut k = 1;
    while k < 8 {
        let mut n = 0;
        while n < 256 {
            let prev = tables[k - 1][n];
            tables[k][n] = (prev >> 8) ^ tables[0][(prev & 0xFF) as usize];
            n += 1;
        }
        k += 1;
    }

    tables
}

static TABLES: [[u32; 256]; 8] = build_tables();

/// Incremental CRC-32 hasher.
///
/// ```
/// use kfrac_core::crc::Crc32;
///
/// let mut crc = Crc32::new();
/// crc.update(b"Hello, ");
/// crc.update(b"World!");
/// assert_eq!(crc.finalize(), 0xEC4AC3D0);
/// ```
#[derive(Debug, Clone)]
pub struct Crc32 {
    state: u32,
}

impl Crc32 {
    /// Start a new checksum.
    pub fn new() -> Self {
        Self { state: INIT }
    }

    /// Discard everything hashed so far.
    pub fn reset(&mut self) {
        self.state = INIT;
    }

    /// Feed more bytes.
    #[inline]
    pub fn update(&mut self, data: &[u8]) {
        self.state = if data.len() >= SLICE_THRESHOLD {
            update_sliced(self.state, data)
        } else {
            update_bytewise(self.state, data)
        };
    }

    /// Checksum of the bytes fed so far; hashing may continue.
    #[inline]
    pub fn value(&self) -> u32 {
        self.state ^ INIT
    }

    /// Consume the hasher and return the checksum.
    #[inline]
    pub fn finalize(self) -> u32 {
        self.value()
    }

    /// Checksum of `data` in one call.
    #[inline]
    pub fn compute(data: &[u8]) -> u32 {
        let mut crc = Self::new();
        crc.update(data);
        crc.finalize()
    }
}

impl Default for Crc32 {
    fn default() -> Self {
        Self::new()
    }
}

#[inline]
fn update_bytewise(mut state: u32, data: &[u8]) -> u32 {
    for &byte in data {
        state = (state >> 8) ^ TABLES[0][((state ^ byte as u32) & 0xFF) as usize];
    }
    state
}

#[inline]
fn update_sliced(mut state: u32, data: &[u8]) -> u32 {
    let mut chunks = data.chunks_exact(8);

    for chunk in &mut chunks {
        let lo = state ^ u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        let hi = u32::from_le_bytes([chunk[4], chunk[5], chunk[6], chunk[7]]);

        state = TABLES[7][(lo & 0xFF) as usize]
            ^ TABLES[6][((lo >> 8) & 0xFF) as usize]
            ^ TABLES[5][((lo >> 16) & 0xFF) as usize]
            ^ TABLES[4][(lo >> 24) as usize]
            ^ TABLES[3][(hi & 0xFF) as usize]
            ^ TABLES[2][((hi >> 8) & 0xFF) as usize]
            ^ TABLES[1][((hi >> 16) & 0xFF) as usize]
            ^ TABLES[0][(hi >> 24) as usize];
    }

    update_bytewise(state, chunks.remainder())
}
