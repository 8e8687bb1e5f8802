//! lzop container header: record, constants, and binary layout.
//!
//! # Wire layout
//! Every container starts with the 9-byte magic, followed by the header
//! fields in this exact order (all multi-byte integers big-endian):
//!
//! ```text
//! version(2) lib_version(2) version_needed_to_extract(2)
//! method(1) level(1) flags(4) [filter(4)]
//! mode(4) mtime_low(4) mtime_high(4)
//! file_name_length(1) file_name(N) header_checksum(4)
//! ```
//!
//! The `filter` field is on the wire if and only if `F_H_FILTER` is set in
//! `flags`; its presence shifts the offset of every field after it.  The
//! full layout is driven by one ordered descriptor walk (see
//! [`Header::field_offset`]) so callers never hand-compute offsets.
//!
//! # Header checksum
//! `header_checksum` is stored as the checksum algorithm's *initial* value
//! (0 for CRC-32, 1 for Adler-32, selected by `F_H_CRC32`) rather than a
//! checksum computed over the header bytes.  The reference tool's output
//! is reproduced bit-for-bit this way; strict readers that verify the
//! field will reject it.  [`crate::checksum::ChecksumKind::compute`] is
//! available to callers who need to substitute a real value.

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::io::{self, Read, Write};
use thiserror::Error;

use crate::checksum::ChecksumKind;
use crate::method::Method;

/// Fixed magic sequence opening every lzop container.
pub const LZOP_MAGIC: [u8; 9] = [0x89, 0x4c, 0x5a, 0x4f, 0x00, 0x0d, 0x0a, 0x1a, 0x0a];

/// Container format version recorded in `version`.
pub const LZOP_VERSION: u16 = 0x1030;
/// Compression-library version identifier recorded in `lib_version`.
pub const LZO_LIB_VERSION: u16 = 0x2080;
/// Minimum extractor version recorded in `version_needed_to_extract`.
pub const VERSION_NEEDED_TO_EXTRACT: u16 = 0x0940;

// ── Header flag bits ─────────────────────────────────────────────────────────

pub const F_ADLER32_D: u32 = 0x0000_0001;
pub const F_ADLER32_C: u32 = 0x0000_0002;
pub const F_STDIN: u32 = 0x0000_0004;
pub const F_STDOUT: u32 = 0x0000_0008;
pub const F_NAME_DEFAULT: u32 = 0x0000_0010;
pub const F_DOSISH: u32 = 0x0000_0020;
pub const F_H_EXTRA_FIELD: u32 = 0x0000_0040;
pub const F_H_GMTDIFF: u32 = 0x0000_0080;
pub const F_CRC32_D: u32 = 0x0000_0100;
pub const F_CRC32_C: u32 = 0x0000_0200;
pub const F_MULTIPART: u32 = 0x0000_0400;
pub const F_H_FILTER: u32 = 0x0000_0800;
pub const F_H_CRC32: u32 = 0x0000_1000;
pub const F_H_PATH: u32 = 0x0000_2000;
/// Mask of all defined flag bits.
pub const F_MASK: u32 = 0x0000_3fff;

/// Flags word the writer always emits.  The two high bits outside
/// [`F_MASK`] are reserved and carried verbatim by compatible tools.
pub const DEFAULT_FLAGS: u32 = 0x0300_0001;

/// Mode recorded for every member: regular file, permissions 0644.
pub const DEFAULT_MODE: u32 = 0x0000_81a4;

// ── Error type ───────────────────────────────────────────────────────────────

#[derive(Error, Debug)]
pub enum HeaderError {
    #[error("invalid compression method: {0}. Valid values are: 1 (LZO1X-1(15)), 2 (LZO1X-1), 3 (LZO1X-999)")]
    InvalidMethod(u8),
    #[error("invalid compression level: {0}. Valid values are 1-9")]
    InvalidLevel(u8),
    #[error("file name length field says {declared} but the name is {actual} bytes")]
    NameLengthMismatch { declared: u8, actual: usize },
    #[error("file name is {0} bytes; the length field holds at most 255")]
    NameTooLong(usize),
    #[error("filter value and F_H_FILTER flag disagree")]
    FilterFlagMismatch,
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

// ── Field descriptors ────────────────────────────────────────────────────────

/// Named header field, in the order fields appear on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Version,
    LibVersion,
    VersionNeededToExtract,
    Method,
    Level,
    Flags,
    Filter,
    Mode,
    MtimeLow,
    MtimeHigh,
    FileNameLength,
    FileName,
    HeaderChecksum,
}

const FIELD_ORDER: [Field; 13] = [
    Field::Version,
    Field::LibVersion,
    Field::VersionNeededToExtract,
    Field::Method,
    Field::Level,
    Field::Flags,
    Field::Filter,
    Field::Mode,
    Field::MtimeLow,
    Field::MtimeHigh,
    Field::FileNameLength,
    Field::FileName,
    Field::HeaderChecksum,
];

// ── Header ───────────────────────────────────────────────────────────────────

/// One container header, built fresh per write and discarded after encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub version: u16,
    pub lib_version: u16,
    pub version_needed_to_extract: u16,
    pub method: u8,
    pub level: u8,
    pub flags: u32,
    pub filter: Option<u32>,
    pub mode: u32,
    pub mtime_low: u32,
    pub mtime_high: u32,
    pub file_name_length: u8,
    pub file_name: Vec<u8>,
    pub header_checksum: u32,
}

impl Header {
    /// Build a header with the fixed format constants and [`DEFAULT_FLAGS`].
    ///
    /// `mtime` is Unix epoch seconds; it is split into the low/high 32-bit
    /// fields here.  The checksum seed is derived from the flags.
    pub fn new(method: Method, level: u8, file_name: &[u8], mtime: i64) -> Result<Self, HeaderError> {
        Self::with_flags(method, level, file_name, mtime, DEFAULT_FLAGS)
    }

    /// Build a header with an arbitrary flags word.  No filter value is
    /// attached; callers setting `F_H_FILTER` must fill [`Header::filter`]
    /// themselves before encoding.
    pub fn with_flags(
        method: Method,
        level: u8,
        file_name: &[u8],
        mtime: i64,
        flags: u32,
    ) -> Result<Self, HeaderError> {
        if file_name.len() > u8::MAX as usize {
            return Err(HeaderError::NameTooLong(file_name.len()));
        }
        let mtime = mtime as u64;
        Ok(Self {
            version: LZOP_VERSION,
            lib_version: LZO_LIB_VERSION,
            version_needed_to_extract: VERSION_NEEDED_TO_EXTRACT,
            method: method.code(),
            level,
            flags,
            filter: None,
            mode: DEFAULT_MODE,
            mtime_low: mtime as u32,
            mtime_high: (mtime >> 32) as u32,
            file_name_length: file_name.len() as u8,
            file_name: file_name.to_vec(),
            header_checksum: ChecksumKind::from_flags(flags).init_value(),
        })
    }

    /// Whether the flags call for a filter field on the wire.
    pub fn has_filter(&self) -> bool {
        self.flags & F_H_FILTER != 0
    }

    fn field_width(&self, field: Field) -> usize {
        match field {
            Field::Version | Field::LibVersion | Field::VersionNeededToExtract => 2,
            Field::Method | Field::Level | Field::FileNameLength => 1,
            Field::Flags | Field::Mode | Field::MtimeLow | Field::MtimeHigh
            | Field::HeaderChecksum => 4,
            Field::Filter => {
                if self.has_filter() {
                    4
                } else {
                    0
                }
            }
            Field::FileName => self.file_name_length as usize,
        }
    }

    /// Byte offset of `field` from the start of the encoded header (the
    /// byte after the magic), walking the field order with this header's
    /// filter presence and name length.  `None` for an absent filter.
    pub fn field_offset(&self, field: Field) -> Option<usize> {
        if field == Field::Filter && !self.has_filter() {
            return None;
        }
        let mut offset = 0;
        for f in FIELD_ORDER {
            if f == field {
                return Some(offset);
            }
            offset += self.field_width(f);
        }
        None
    }

    /// Total encoded size of this header in bytes.
    pub fn encoded_len(&self) -> usize {
        FIELD_ORDER.iter().map(|&f| self.field_width(f)).sum()
    }

    fn validate(&self) -> Result<(), HeaderError> {
        if Method::from_code(self.method).is_none() {
            return Err(HeaderError::InvalidMethod(self.method));
        }
        if !(1..=9).contains(&self.level) {
            return Err(HeaderError::InvalidLevel(self.level));
        }
        if self.file_name_length as usize != self.file_name.len() {
            return Err(HeaderError::NameLengthMismatch {
                declared: self.file_name_length,
                actual: self.file_name.len(),
            });
        }
        if self.has_filter() != self.filter.is_some() {
            return Err(HeaderError::FilterFlagMismatch);
        }
        Ok(())
    }

    /// Encode the header.  Validation runs first; nothing reaches `writer`
    /// on an inconsistent record.
    pub fn write<W: Write>(&self, mut writer: W) -> Result<(), HeaderError> {
        self.validate()?;
        writer.write_u16::<BigEndian>(self.version)?;
        writer.write_u16::<BigEndian>(self.lib_version)?;
        writer.write_u16::<BigEndian>(self.version_needed_to_extract)?;
        writer.write_u8(self.method)?;
        writer.write_u8(self.level)?;
        writer.write_u32::<BigEndian>(self.flags)?;
        if let Some(filter) = self.filter {
            writer.write_u32::<BigEndian>(filter)?;
        }
        writer.write_u32::<BigEndian>(self.mode)?;
        writer.write_u32::<BigEndian>(self.mtime_low)?;
        writer.write_u32::<BigEndian>(self.mtime_high)?;
        writer.write_u8(self.file_name_length)?;
        writer.write_all(&self.file_name)?;
        writer.write_u32::<BigEndian>(self.header_checksum)?;
        Ok(())
    }

    /// Encode the header into a fresh buffer.
    pub fn to_bytes(&self) -> Result<Vec<u8>, HeaderError> {
        let mut buf = Vec::with_capacity(self.encoded_len());
        self.write(&mut buf)?;
        Ok(buf)
    }

    /// Decode a header from the byte after the magic onward.  The filter
    /// field is consumed exactly when the decoded flags call for it.
    pub fn read<R: Read>(mut reader: R) -> Result<Self, HeaderError> {
        let version = reader.read_u16::<BigEndian>()?;
        let lib_version = reader.read_u16::<BigEndian>()?;
        let version_needed_to_extract = reader.read_u16::<BigEndian>()?;
        let method = reader.read_u8()?;
        let level = reader.read_u8()?;
        let flags = reader.read_u32::<BigEndian>()?;
        let filter = if flags & F_H_FILTER != 0 {
            Some(reader.read_u32::<BigEndian>()?)
        } else {
            None
        };
        let mode = reader.read_u32::<BigEndian>()?;
        let mtime_low = reader.read_u32::<BigEndian>()?;
        let mtime_high = reader.read_u32::<BigEndian>()?;
        let file_name_length = reader.read_u8()?;
        let mut file_name = vec![0u8; file_name_length as usize];
        reader.read_exact(&mut file_name)?;
        let header_checksum = reader.read_u32::<BigEndian>()?;
        Ok(Self {
            version,
            lib_version,
            version_needed_to_extract,
            method,
            level,
            flags,
            filter,
            mode,
            mtime_low,
            mtime_high,
            file_name_length,
            file_name,
            header_checksum,
        })
    }
}
