//! Models with the training state tracked in the type system.

pub mod linear;
pub mod state;

pub use state::{Fitted, Unfitted};

/// Interface a trainer drives during fitting.
pub trait TrainableModel {
    type Input;
    type Prediction;
    type Params;
    type Gradients;
    type Output;

    /// Width of the input rows the model accepts.
    fn n_features(&self) -> usize;

    fn forward(&self, input: &Self::Input) -> Self::Prediction;
    fn backward(&self, input: &Self::Input, grad_output: &Self::Prediction) -> Self::Gradients;
    fn params(&self) -> &Self::Params;
    fn update_params(&mut self, new_params: &Self::Params);

    /// Convert into the inference-only representation.
    fn into_fitted(self) -> Self::Output;
}

/// Arithmetic needed by optimizers on parameter sets.
pub trait ParamOps: Clone {
    fn add(&self, other: &Self) -> Self;
    fn scale(&self, scalar: f64) -> Self;
    /// Squared L2 norm over every parameter.
    fn norm_sq(&self) -> f64;
}

/// Interface of a trained model.
pub trait InferenceModel {
    type InputSingle;
    type OutputSingle;
    /// Plain-data representation used for persistence.
    type ParamsRepr;

    fn predict(&self, input: &Self::InputSingle) -> Self::OutputSingle;

    fn extract_params(&self) -> Self::ParamsRepr;
    fn from_params(params: Self::ParamsRepr) -> crate::error::Result<Self>
    where
        Self: Sized;
}
