//! Error types for sphere-cluster-core.
//!
//! Every failure in a clustering run is terminal for that run and is returned
//! to the caller. Nothing in this crate retries or logs-and-continues.

use thiserror::Error;

use crate::dataset::PointId;

/// Top-level error type for sphere-cluster-core.
#[derive(Debug, Error)]
pub enum SvcError {
    /// The squared radius is NaN, infinite or negative.
    ///
    /// Signals that the sphere was not trained correctly. Raised before any
    /// connectivity work starts.
    #[error("Untrained model: squared radius is {r_squared}; expected a finite non-negative value")]
    UntrainedModel {
        /// The offending squared radius
        r_squared: f64,
    },

    /// An externally supplied table or ordering does not match the dataset size.
    #[error("Inconsistent size in {context}: expected {expected}, actual {actual}")]
    InconsistentSize {
        /// What was being sized
        context: &'static str,
        /// Expected length
        expected: usize,
        /// Actual length provided
        actual: usize,
    },

    /// Feature vectors of different dimension in one dataset.
    #[error("Dimension mismatch: expected {expected}, actual {actual}")]
    DimensionMismatch {
        /// Dimension of the first vector seen
        expected: usize,
        /// Dimension of the offending vector
        actual: usize,
    },

    /// The same point id appears twice.
    #[error("Duplicate point id: {id}")]
    DuplicatePoint {
        /// The repeated id
        id: PointId,
    },

    /// A point id is not part of the dataset or kernel matrix.
    #[error("Unknown point id: {id}")]
    UnknownPoint {
        /// The missing id
        id: PointId,
    },

    /// Invalid parameter provided.
    #[error("Invalid parameter: {message}")]
    InvalidParameter {
        /// Description of what's wrong with the parameter
        message: String,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The external sphere trainer failed.
    #[error("Training error: {0}")]
    Training(String),
}

impl SvcError {
    /// Create an UntrainedModel error.
    pub fn untrained(r_squared: f64) -> Self {
        Self::UntrainedModel { r_squared }
    }

    /// Create an InconsistentSize error.
    pub fn inconsistent_size(context: &'static str, expected: usize, actual: usize) -> Self {
        Self::InconsistentSize {
            context,
            expected,
            actual,
        }
    }

    /// Create a DimensionMismatch error.
    pub fn dimension_mismatch(expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch { expected, actual }
    }

    /// Create an InvalidParameter error.
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            message: message.into(),
        }
    }
}

impl From<config::ConfigError> for SvcError {
    fn from(err: config::ConfigError) -> Self {
        SvcError::ConfigError(err.to_string())
    }
}

impl From<toml::de::Error> for SvcError {
    fn from(err: toml::de::Error) -> Self {
        SvcError::ConfigError(format!("Failed to parse config file: {}", err))
    }
}

/// Result type alias for sphere-cluster operations.
pub type SvcResult<T> = Result<T, SvcError>;
