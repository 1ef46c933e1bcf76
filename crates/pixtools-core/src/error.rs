//! Error types for pixtools-core operations.
//!
//! Every fallible operation on [`Grid`](crate::Grid),
//! [`PackedImage`](crate::PackedImage) and
//! [`ChannelPlanes`](crate::ChannelPlanes) reports one of the variants
//! below instead of indexing out of bounds.
//!
//! # Usage
//!
//! ```rust
//! use pixtools_core::{Error, Grid, Result};
//!
//! fn same_size(a: &Grid<f64>, b: &Grid<f64>) -> Result<()> {
//!     a.ensure_same_size(b)
//! }
//!
//! let a = Grid::new(4, 4, 0.0);
//! let b = Grid::new(4, 5, 0.0);
//! assert!(matches!(same_size(&a, &b), Err(Error::DimensionMismatch { .. })));
//! ```

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the image data model.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Two operands of an elementwise operation have different sizes.
    ///
    /// Returned by channel setters, grid arithmetic and image-pair
    /// operators whenever the operand does not match the receiver.
    #[error(
        "dimension mismatch: expected {expected_width}x{expected_height}, got {width}x{height}"
    )]
    DimensionMismatch {
        /// Width of the receiver
        expected_width: usize,
        /// Height of the receiver
        expected_height: usize,
        /// Width of the offending operand
        width: usize,
        /// Height of the offending operand
        height: usize,
    },

    /// A channel id is out of range or not valid for the operation.
    ///
    /// Raw ids must lie in 0..=3. Floating-point planes carry no alpha,
    /// so [`Channel::Alpha`](crate::Channel::Alpha) is rejected there.
    #[error("invalid channel {channel} for {op}")]
    InvalidChannel {
        /// Raw channel id
        channel: u8,
        /// Operation that rejected it
        op: &'static str,
    },

    /// Buffer length or row shape does not describe a rectangular grid.
    #[error("invalid dimensions {width}x{height}: {reason}")]
    InvalidDimensions {
        /// Requested width
        width: usize,
        /// Requested height
        height: usize,
        /// Why the dimensions were rejected
        reason: String,
    },
}

impl Error {
    /// Creates an [`Error::DimensionMismatch`] error from `(width, height)` pairs.
    #[inline]
    pub fn dimension_mismatch(expected: (usize, usize), got: (usize, usize)) -> Self {
        Self::DimensionMismatch {
            expected_width: expected.0,
            expected_height: expected.1,
            width: got.0,
            height: got.1,
        }
    }

    /// Creates an [`Error::InvalidChannel`] error.
    #[inline]
    pub fn invalid_channel(channel: u8, op: &'static str) -> Self {
        Self::InvalidChannel { channel, op }
    }

    /// Creates an [`Error::InvalidDimensions`] error.
    #[inline]
    pub fn invalid_dimensions(width: usize, height: usize, reason: impl Into<String>) -> Self {
        Self::InvalidDimensions {
            width,
            height,
            reason: reason.into(),
        }
    }

    /// Returns `true` if this is a size-related error.
    #[inline]
    pub fn is_dimension_error(&self) -> bool {
        matches!(
            self,
            Self::DimensionMismatch { .. } | Self::InvalidDimensions { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_mismatch() {
        let err = Error::dimension_mismatch((100, 80), (200, 40));
        let msg = err.to_string();
        assert!(msg.contains("100x80"));
        assert!(msg.contains("200x40"));
        assert!(err.is_dimension_error());
    }

    #[test]
    fn test_invalid_channel() {
        let err = Error::invalid_channel(7, "channel lookup");
        assert_eq!(err.to_string(), "invalid channel 7 for channel lookup");
        assert!(!err.is_dimension_error());
    }

    #[test]
    fn test_invalid_dimensions() {
        let err = Error::invalid_dimensions(3, 2, "expected 6 elements, got 5");
        assert!(err.to_string().contains("expected 6 elements"));
        assert!(err.is_dimension_error());
    }
}
