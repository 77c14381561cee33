//! Contains the error type shared by all filters.

use crate::PixelFormat;
use thiserror::Error;

/// The error returned when a filter cannot produce a result.
///
/// A failed filter never exposes a partially written bitmap.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    /// The combination of source and target pixel formats is not implemented.
    #[error("conversion from {from} to {to} is not supported")]
    UnsupportedFormat {
        /// The pixel format of the input bitmap.
        from: PixelFormat,
        /// The requested pixel format of the output bitmap.
        to: PixelFormat,
    },
    /// The underlying bitmap could not be accessed.
    #[error("invalid operation: {0}")]
    InvalidOperation(String),
}

impl FilterError {
    /// Shorthand for [`FilterError::UnsupportedFormat`].
    pub(crate) const fn unsupported(from: PixelFormat, to: PixelFormat) -> Self {
        Self::UnsupportedFormat { from, to }
    }
}
