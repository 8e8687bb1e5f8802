//! Container assembly — magic, header, compressed payload.
//!
//! [`ContainerWriter`] owns its sink for the duration of one write
//! operation.  A write captures the clock once, resolves the compression
//! method from the requested level, builds and validates the header, then
//! emits magic bytes, encoded header, and the compressor's output
//! verbatim.  The sink is flushed on every exit path; a failure after the
//! header is out leaves a partial container behind (no rollback).

use std::io::Write;

use chrono::Utc;
use thiserror::Error;

use crate::codec::{CodecError, Compressor};
use crate::header::{Header, HeaderError, LZOP_MAGIC};
use crate::method::{Method, MethodError};

#[derive(Error, Debug)]
pub enum WriteError {
    #[error(transparent)]
    Method(#[from] MethodError),
    #[error(transparent)]
    Header(#[from] HeaderError),
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

// ── Writer ───────────────────────────────────────────────────────────────────

pub struct ContainerWriter<W: Write, C: Compressor> {
    sink: W,
    compressor: C,
}

impl<W: Write, C: Compressor> ContainerWriter<W, C> {
    pub fn new(sink: W, compressor: C) -> Self {
        Self { sink, compressor }
    }

    /// Write one complete container for `data`.
    ///
    /// `file_name` is the caller's path or name; a trailing `.lzo`/`.lzop`
    /// archive suffix is stripped before the name is recorded in the
    /// header.  The current time is captured once for the timestamp.
    pub fn write(&mut self, file_name: &str, level: u8, data: &[u8]) -> Result<(), WriteError> {
        self.write_with_mtime(file_name, level, data, Utc::now().timestamp())
    }

    /// Like [`write`](Self::write), with an explicit modification time in
    /// Unix epoch seconds.
    pub fn write_with_mtime(
        &mut self,
        file_name: &str,
        level: u8,
        data: &[u8],
        mtime: i64,
    ) -> Result<(), WriteError> {
        let result = self.write_inner(file_name, level, data, mtime);
        // Flushed on every exit path, including mid-write failures.
        let flushed = self.sink.flush();
        result?;
        flushed?;
        Ok(())
    }

    fn write_inner(
        &mut self,
        file_name: &str,
        level: u8,
        data: &[u8],
        mtime: i64,
    ) -> Result<(), WriteError> {
        let (method, level) = Method::for_level(level)?;
        let name = strip_archive_suffix(file_name);
        let header = Header::new(method, level, name.as_bytes(), mtime)?;
        // Validation runs here; an inconsistent header leaves the sink empty.
        let header_bytes = header.to_bytes()?;

        self.sink.write_all(&LZOP_MAGIC)?;
        self.sink.write_all(&header_bytes)?;

        let payload = self.compressor.compress(data, level)?;
        self.sink.write_all(&payload)?;
        Ok(())
    }

    /// Release the sink.
    pub fn into_inner(self) -> W {
        self.sink
    }
}

/// Strip a trailing container-format suffix from a file name, if present.
pub fn strip_archive_suffix(name: &str) -> &str {
    name.strip_suffix(".lzo")
        .or_else(|| name.strip_suffix(".lzop"))
        .unwrap_or(name)
}
