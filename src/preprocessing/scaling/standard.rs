//! Standard Scaler (Z-score normalization).
//!
//! Transforms features by removing the mean and scaling to unit variance:
//! ```text
//! z = (x - u) / s
//! ```
//! where `u` is the column mean of the training samples and `s` the
//! population standard deviation (ddof = 0). Columns with zero variance
//! keep `s = 1`, so constant features map to zero instead of NaN.

use crate::error::{Result, TrendError};
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

/// Serializable parameters for a fitted StandardScaler.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StandardScalerParams {
    /// Mean of each feature.
    pub mean: Vec<f64>,
    /// Standard deviation of each feature.
    pub std: Vec<f64>,
    pub n_features: usize,
}

/// StandardScaler transformer (unfitted).
#[derive(Clone, Debug, Default)]
pub struct StandardScaler;

impl StandardScaler {
    pub fn new() -> Self {
        Self
    }
}

impl Transformer for StandardScaler {
    type Params = StandardScalerParams;
    type Fitted = FittedStandardScaler;

    fn fit(&self, data: &Array2<f64>) -> Result<Self::Fitted> {
        let cols = data.ncols();

        if data.nrows() == 0 {
            return Err(TrendError::EmptyData(
                "Cannot fit StandardScaler on empty data".to_string(),
            ));
        }

        let mean = data
            .mean_axis(Axis(0))
            .unwrap_or_else(|| Array1::zeros(cols));
        let std = data
            .std_axis(Axis(0), 0.0)
            .mapv(|s| if s == 0.0 || !s.is_finite() { 1.0 } else { s });

        Ok(FittedStandardScaler { mean, std })
    }
}

/// Fitted StandardScaler ready for inference.
#[derive(Clone, Debug, PartialEq)]
pub struct FittedStandardScaler {
    mean: Array1<f64>,
    std: Array1<f64>,
}

impl FittedStandardScaler {
    /// Mean of each feature.
    pub fn mean(&self) -> &Array1<f64> {
        &self.mean
    }

    /// Standard deviation of each feature.
    pub fn std(&self) -> &Array1<f64> {
        &self.std
    }
}

impl FittedTransformer for FittedStandardScaler {
    type Params = StandardScalerParams;

    fn transform(&self, data: &Array2<f64>) -> Result<Array2<f64>> {
        if data.ncols() != self.mean.len() {
            return Err(TrendError::FeatureMismatch {
                expected: self.mean.len(),
                got: data.ncols(),
            });
        }

        let mut result = data.to_owned();
        result -= &self.mean;
        result /= &self.std;
        Ok(result)
    }

    fn extract_params(&self) -> Self::Params {
        StandardScalerParams {
            mean: self.mean.to_vec(),
            std: self.std.to_vec(),
            n_features: self.mean.len(),
        }
    }

    fn from_params(params: Self::Params) -> Result<Self> {
        if params.mean.len() != params.n_features || params.std.len() != params.n_features {
            return Err(TrendError::FeatureMismatch {
                expected: params.n_features,
                got: params.mean.len().min(params.std.len()),
            });
        }
        Ok(Self {
            mean: Array1::from(params.mean),
            std: Array1::from(params.std),
        })
    }

    fn n_features_in(&self) -> usize {
        self.mean.len()
    }
}
