//! Error types for packet operations

use thiserror::Error;

/// Error type for packet operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("allocation of {0} bytes failed")]
    AllocationFailure(usize),
    #[error("truncated read: needed {needed} bytes, {remaining} remaining")]
    TruncatedRead { needed: usize, remaining: usize },
    #[error("length does not fit in size field: {0}")]
    LengthOverflow(usize),
    #[error("invalid utf-8 in string")]
    InvalidUtf8,
    #[error("invalid utf-16 in wide string")]
    InvalidUtf16,
    #[error("invalid wide string byte count: {0}")]
    InvalidWideLength(usize),
    #[error("invalid length: {0}")]
    InvalidLength(usize),
    #[error("invalid header: {0}")]
    InvalidHeader(usize),
    #[error("extra data found: {0} bytes")]
    ExtraData(usize),
}

impl Error {
    /// Returns true if the error only means more bytes must arrive before
    /// the same operation can succeed.
    pub fn is_truncated(&self) -> bool {
        matches!(self, Error::TruncatedRead { .. })
    }
}
