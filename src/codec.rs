use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Compression error: {0}")]
    Compression(String),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// External LZO1X compression service.
///
/// The container treats compressed payloads as opaque: whatever this
/// returns is written verbatim after the header, with no length prefix or
/// framing — the format relies on the compressor's own block markers.
/// `level` is the already-normalized value the header records.
pub trait Compressor {
    fn compress(&self, data: &[u8], level: u8) -> Result<Vec<u8>, CodecError>;
}
