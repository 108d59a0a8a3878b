//! Errors returned when constructing a [`Sketch`](crate::Sketch).

use std::error::Error;
use std::fmt;

use crate::sketch::{MAX_PRECISION, MIN_PRECISION};

/// Configuration error raised by `Sketch` constructors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// Precision outside of `[MIN_PRECISION..=MAX_PRECISION]`.
    PrecisionOutOfRange { precision: usize },
    /// Target standard error not strictly inside `(0, 1)`.
    ErrorRateOutOfRange { error_rate: f64 },
    /// Target standard error needs more registers than `MAX_PRECISION` provides.
    UnattainableErrorRate { error_rate: f64, precision: usize },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ConfigError::PrecisionOutOfRange { precision } => write!(
                f,
                "precision must be in [{}..={}] range, got {}",
                MIN_PRECISION, MAX_PRECISION, precision
            ),
            ConfigError::ErrorRateOutOfRange { error_rate } => write!(
                f,
                "error rate must be strictly between 0 and 1, got {}",
                error_rate
            ),
            ConfigError::UnattainableErrorRate {
                error_rate,
                precision,
            } => write!(
                f,
                "error rate {} requires precision {}, maximum is {}",
                error_rate, precision, MAX_PRECISION
            ),
        }
    }
}

impl Error for ConfigError {}
