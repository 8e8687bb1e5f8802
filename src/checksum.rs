//! Checksum algorithm selection and computation.
//!
//! The header's `F_H_CRC32` flag picks between Adler-32 and CRC-32.  The
//! writer only ever stores the algorithm's *initial* value in the header
//! checksum field; [`ChecksumKind::compute`] is the real rolling checksum
//! for callers that need a verifiable value to substitute.

use crate::header::F_H_CRC32;

/// Adler-32 initial value (also the seed stored for Adler-mode headers).
pub const ADLER32_INIT_VALUE: u32 = 1;
/// CRC-32 initial value (also the seed stored for CRC-mode headers).
pub const CRC32_INIT_VALUE: u32 = 0;

/// Checksum algorithm selected by the header flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChecksumKind {
    Adler32,
    Crc32,
}

impl ChecksumKind {
    /// Which algorithm a flags word calls for.
    pub fn from_flags(flags: u32) -> Self {
        if flags & F_H_CRC32 != 0 {
            ChecksumKind::Crc32
        } else {
            ChecksumKind::Adler32
        }
    }

    /// The algorithm's initial value.
    pub fn init_value(self) -> u32 {
        match self {
            ChecksumKind::Adler32 => ADLER32_INIT_VALUE,
            ChecksumKind::Crc32 => CRC32_INIT_VALUE,
        }
    }

    /// Roll the checksum over `data`, continuing from `seed`.
    pub fn compute(self, seed: u32, data: &[u8]) -> u32 {
        match self {
            ChecksumKind::Adler32 => {
                let mut adler = adler2::Adler32::from_checksum(seed);
                adler.write_slice(data);
                adler.checksum()
            }
            ChecksumKind::Crc32 => {
                let mut hasher = crc32fast::Hasher::new_with_initial(seed);
                hasher.update(data);
                hasher.finalize()
            }
        }
    }
}
