//! Error types for regression and prediction.

use thiserror::Error;

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;

/// Errors that can occur while fitting or evaluating a model.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Not enough observations for the number of parameters
    #[error("Insufficient data: need at least {required} observations, got {actual}")]
    InsufficientData {
        /// Required number of observations
        required: usize,
        /// Actual number of observations
        actual: usize,
    },

    /// Dimension mismatch between inputs
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimension
        expected: usize,
        /// Actual dimension
        actual: usize,
    },

    /// Normal equations have no unique solution
    #[error("Design matrix is singular (failed at pivot {pivot})")]
    Singular {
        /// Column at which the factorisation broke down
        pivot: usize,
    },

    /// NaN or infinite value in the regression inputs
    #[error("Non-finite value in {0}")]
    NonFinite(String),

    /// Factor input outside the accepted range
    #[error("{factor} = {value} is outside [{min}, {max}]")]
    OutOfBounds {
        /// Factor column name
        factor: String,
        /// Rejected value
        value: f64,
        /// Lower bound
        min: f64,
        /// Upper bound
        max: f64,
    },

    /// Invalid parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}
