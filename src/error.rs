//! Error types for trend training, prediction and persistence.

use thiserror::Error;

/// Errors raised inside the training and persistence pipeline.
///
/// The stateful [`TechTrendPredictor`](crate::trend::TechTrendPredictor) facade
/// never lets these escape: it logs them and reports `false`/`None` instead.
#[derive(Error, Debug)]
pub enum TrendError {
    /// No records were supplied.
    #[error("no data available for training")]
    NoData,

    /// None of the records carried a timestamp field.
    #[error("no valid timestamps found")]
    NoTimestamps,

    /// Fewer distinct dates than the minimum required to fit.
    #[error("not enough data points for training: got {got}, need at least {required}")]
    InsufficientSamples {
        /// Distinct-date rows produced by feature preparation.
        got: usize,
        /// Configured minimum.
        required: usize,
    },

    /// A prediction or save was requested before training.
    #[error("model is not trained")]
    NotTrained,

    /// Feature dimension mismatch between fit and transform/predict.
    #[error("feature mismatch: expected {expected} features, got {got}")]
    FeatureMismatch {
        /// Number of columns seen during fit.
        expected: usize,
        /// Number of columns provided.
        got: usize,
    },

    /// Empty data provided where non-empty was required.
    #[error("empty data: {0}")]
    EmptyData(String),

    /// I/O error while reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Binary model (de)serialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    /// JSON input could not be parsed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for this crate.
pub type Result<T> = std::result::Result<T, TrendError>;
