use thiserror::Error;

#[derive(Error, Debug)]
pub enum MethodError {
    /// The level maps to a method the compression service does not provide.
    #[error("unsupported compression method: {0} (LZO1X-1(15) output is not available)")]
    UnsupportedMethod(u8),
    #[error("invalid compression level: {0}. Valid values are 1-9")]
    InvalidLevel(u8),
}

/// LZO1X variant recorded in the header's `method` byte.
///
/// Exactly three codes exist in the format; no other value is ever written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Lzo1x1_15,
    Lzo1x1,
    Lzo1x999,
}

impl Method {
    /// The method code as it appears on the wire.
    #[inline]
    pub fn code(self) -> u8 {
        match self {
            Method::Lzo1x1_15 => 1,
            Method::Lzo1x1 => 2,
            Method::Lzo1x999 => 3,
        }
    }

    /// Resolve a wire code back to a method.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Method::Lzo1x1_15),
            2 => Some(Method::Lzo1x1),
            3 => Some(Method::Lzo1x999),
            _ => None,
        }
    }

    /// Human-readable name (for diagnostics only — never parsed).
    pub fn name(self) -> &'static str {
        match self {
            Method::Lzo1x1_15 => "LZO1X-1(15)",
            Method::Lzo1x1 => "LZO1X-1",
            Method::Lzo1x999 => "LZO1X-999",
        }
    }

    /// Map a requested compression level (1-9) to the method that handles
    /// it and the level actually recorded in the header.
    ///
    /// Levels 2-6 all select LZO1X-1 and normalize to 5; their output is
    /// indistinguishable.  Levels 7-9 select LZO1X-999 unchanged.  Level 1
    /// selects LZO1X-1(15), which the compression service cannot produce,
    /// so it is rejected rather than silently remapped.
    pub fn for_level(level: u8) -> Result<(Method, u8), MethodError> {
        match level {
            1 => Err(MethodError::UnsupportedMethod(Method::Lzo1x1_15.code())),
            2..=6 => Ok((Method::Lzo1x1, 5)),
            7..=9 => Ok((Method::Lzo1x999, level)),
            _ => Err(MethodError::InvalidLevel(level)),
        }
    }
}
