//! Linear regression with compile-time state tracking.
//!
//! - [`LinearRegression`] = `LinearModel<Unfitted>`: trainable, exposes
//!   `forward`/`backward` for the [`Trainer`](crate::trainer::Trainer).
//! - `LinearModel<Fitted>`: inference-only, serializable predictor.
//!
//! A fitted model carries no training hyperparameters.

use crate::error::Result;
use crate::model::{Fitted, InferenceModel, ParamOps, TrainableModel, Unfitted};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

/// Trainable parameters of a linear model: weights and bias.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearParams {
    pub weights: Array1<f64>,
    pub bias: f64,
}

/// Plain-data form of [`LinearParams`] used for storage.
///
/// Kept at `f64` so a reloaded model predicts exactly what the original did.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SerializableLinearParams {
    pub weights: Vec<f64>,
    pub bias: f64,
}

impl From<&LinearParams> for SerializableLinearParams {
    fn from(params: &LinearParams) -> Self {
        Self {
            weights: params.weights.to_vec(),
            bias: params.bias,
        }
    }
}

impl From<SerializableLinearParams> for LinearParams {
    fn from(value: SerializableLinearParams) -> Self {
        Self {
            weights: Array1::from(value.weights),
            bias: value.bias,
        }
    }
}

impl ParamOps for LinearParams {
    fn add(&self, other: &Self) -> Self {
        Self {
            weights: &self.weights + &other.weights,
            bias: self.bias + other.bias,
        }
    }

    fn scale(&self, scalar: f64) -> Self {
        Self {
            weights: &self.weights * scalar,
            bias: self.bias * scalar,
        }
    }

    fn norm_sq(&self) -> f64 {
        self.weights.dot(&self.weights) + self.bias * self.bias
    }
}

/// A linear model `y = w^T x + b` with its state encoded at the type level.
#[derive(Clone, Debug)]
pub struct LinearModel<S> {
    params: LinearParams,
    _state: PhantomData<S>,
}

impl<S> LinearModel<S> {
    pub fn n_features(&self) -> usize {
        self.params.weights.len()
    }
}

impl LinearModel<Fitted> {
    /// Creates a fitted model from trained parameters.
    pub fn new(params: LinearParams) -> Self {
        Self {
            params,
            _state: PhantomData,
        }
    }

    pub fn weights(&self) -> &Array1<f64> {
        &self.params.weights
    }

    pub fn bias(&self) -> f64 {
        self.params.bias
    }
}

impl InferenceModel for LinearModel<Fitted> {
    type InputSingle = Array1<f64>;
    type OutputSingle = f64;
    type ParamsRepr = SerializableLinearParams;

    /// Predict on a single feature vector.
    fn predict(&self, input: &Self::InputSingle) -> Self::OutputSingle {
        self.params.weights.dot(input) + self.params.bias
    }

    fn extract_params(&self) -> Self::ParamsRepr {
        (&self.params).into()
    }

    fn from_params(params: Self::ParamsRepr) -> Result<Self> {
        Ok(Self::new(params.into()))
    }
}

/// Forward pass: `X @ w + b`.
/// Backward pass: `∇w = X^T · grad`, `∇b = sum(grad)`.
impl TrainableModel for LinearModel<Unfitted> {
    type Params = LinearParams;
    type Gradients = LinearParams;
    type Prediction = Array1<f64>;
    type Input = Array2<f64>;
    type Output = LinearModel<Fitted>;

    fn n_features(&self) -> usize {
        self.params.weights.len()
    }

    fn forward(&self, x: &Self::Input) -> Self::Prediction {
        x.dot(&self.params.weights) + self.params.bias
    }

    fn backward(&self, x: &Self::Input, grad_output: &Self::Prediction) -> Self::Gradients {
        LinearParams {
            weights: x.t().dot(grad_output),
            bias: grad_output.sum(),
        }
    }

    fn params(&self) -> &Self::Params {
        &self.params
    }

    fn update_params(&mut self, params: &Self::Params) {
        self.params = params.clone();
    }

    fn into_fitted(self) -> LinearModel<Fitted> {
        LinearModel::<Fitted>::new(self.params)
    }
}

/// An unfitted linear regression model.
pub type LinearRegression = LinearModel<Unfitted>;

impl LinearRegression {
    /// Start from explicit parameters (warm start).
    pub fn from_params(params: LinearParams) -> Self {
        Self {
            params,
            _state: PhantomData,
        }
    }
}
