//! Error types for jfmon-core.

use thiserror::Error;

/// Core error types.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid frame modulus: {0}")]
    InvalidModulus(u64),

    #[error("Invalid contrast: {0}")]
    InvalidContrast(f64),

    #[error("Invalid module id: {0}")]
    InvalidModule(usize),

    #[error("Resolution arrays differ in length: one_over_d2={x_len}, log_meanI={y_len}")]
    ResolutionLengthMismatch { x_len: usize, y_len: usize },
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
