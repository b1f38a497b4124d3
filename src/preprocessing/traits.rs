//! Core traits for preprocessing transformers.
//!
//! - [`Transformer`]: unfitted, holds hyperparameters and learns from data.
//! - [`FittedTransformer`]: fitted, ready for inference and serialization.

use crate::error::Result;
use crate::serialization::SerializableParams;
use ndarray::Array2;

/// Trait for unfitted transformers.
///
/// # Example
/// ```
/// use ndarray::array;
/// use tech_pulse_ml::preprocessing::{FittedTransformer, StandardScaler, Transformer};
///
/// let data = array![[1.0, 10.0], [3.0, 30.0]];
/// let fitted = StandardScaler::new().fit(&data).unwrap();
/// let scaled = fitted.transform(&data).unwrap();
/// assert_eq!(scaled[[0, 0]], -1.0);
/// ```
pub trait Transformer: Clone {
    /// Serializable representation of learned parameters.
    type Params: SerializableParams;
    /// The fitted transformer type ready for inference.
    type Fitted: FittedTransformer<Params = Self::Params>;

    /// Learn parameters from the training data.
    ///
    /// # Errors
    /// Returns [`TrendError::EmptyData`](crate::error::TrendError::EmptyData)
    /// when `data` has no rows.
    fn fit(&self, data: &Array2<f64>) -> Result<Self::Fitted>;
}

/// Trait for fitted transformers ready for inference.
///
/// `extract_params()` followed by `from_params()` reproduces a transformer
/// with identical output.
pub trait FittedTransformer: Clone {
    /// Serializable representation of learned parameters.
    type Params: SerializableParams;

    /// Transform data using learned parameters.
    ///
    /// # Errors
    /// Returns [`TrendError::FeatureMismatch`](crate::error::TrendError::FeatureMismatch)
    /// if the column count differs from the one seen during fit.
    fn transform(&self, data: &Array2<f64>) -> Result<Array2<f64>>;

    /// Extract learned parameters as a serializable representation.
    fn extract_params(&self) -> Self::Params;

    /// Reconstruct a fitted transformer from parameters.
    fn from_params(params: Self::Params) -> Result<Self>
    where
        Self: Sized;

    /// Number of features seen during fit.
    fn n_features_in(&self) -> usize;
}
