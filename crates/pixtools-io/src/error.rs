//! Error types for the codec boundary and file persistence.

use std::io;
use thiserror::Error;

/// I/O operation error.
#[derive(Debug, Error)]
pub enum IoError {
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file could not be decoded.
    #[error("decode error: {0}")]
    DecodeError(String),

    /// The image could not be encoded.
    #[error("encode error: {0}")]
    EncodeError(String),

    /// Unknown or disabled file format.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Byte layout not supported in this direction.
    #[error("unsupported pixel layout: {0}")]
    UnsupportedLayout(String),

    /// Byte buffer length does not match `width * height * bytes_per_pixel`.
    #[error("buffer size mismatch: expected {expected} bytes, got {actual}")]
    BufferSize {
        /// Expected length in bytes.
        expected: usize,
        /// Actual length in bytes.
        actual: usize,
    },

    /// Error from the image data model.
    #[error(transparent)]
    Core(#[from] pixtools_core::Error),
}

/// Result type for I/O operations.
pub type IoResult<T> = Result<T, IoError>;
