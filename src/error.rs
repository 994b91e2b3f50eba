//! Error types for pose upsampling.
//!
//! Every failure in this crate is reported through [`ResampleError`]. The
//! engine treats all of them as fatal for the current invocation: it either
//! returns the full set of samples or an error, never a partial result.

use thiserror::Error;

/// Main error type for trajectory resampling and pose-table I/O.
#[derive(Error, Debug)]
pub enum ResampleError {
    /// Fewer poses than interpolation needs.
    #[error("Insufficient data: need at least {min} poses, got {actual}")]
    InsufficientData { min: usize, actual: usize },

    /// Target sampling frequency is zero, negative or not finite.
    #[error("Invalid frequency: {0} Hz (must be positive and finite)")]
    InvalidFrequency(f64),

    /// Timestamps are not strictly increasing.
    #[error("Timestamps must be strictly increasing at index {index}")]
    NonMonotonicTimestamps { index: usize },

    /// A pose-table line could not be parsed into 8 numeric fields.
    #[error("Malformed row at line {line}: {reason}")]
    MalformedRow { line: usize, reason: String },

    /// Input contained NaN or Inf.
    #[error("Non-finite input: {context}")]
    NonFiniteInput { context: String },

    /// Configuration validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Reading or writing a table failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for resampling operations.
pub type Result<T> = std::result::Result<T, ResampleError>;

impl ResampleError {
    /// Create an insufficient data error.
    #[must_use]
    pub const fn insufficient_data(min: usize, actual: usize) -> Self {
        Self::InsufficientData { min, actual }
    }

    /// Create a malformed row error.
    #[must_use]
    pub fn malformed_row(line: usize, reason: impl Into<String>) -> Self {
        Self::MalformedRow {
            line,
            reason: reason.into(),
        }
    }

    /// Create a non-finite input error.
    #[must_use]
    pub fn non_finite(context: impl Into<String>) -> Self {
        Self::NonFiniteInput {
            context: context.into(),
        }
    }

    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
