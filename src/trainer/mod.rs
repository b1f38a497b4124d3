//! Full-batch gradient-descent training loop.

use crate::dataset::InMemoryDataset;
use crate::error::{Result, TrendError};
use crate::loss::Loss;
use crate::model::{ParamOps, TrainableModel};
use crate::optimizer::Optimizer;
use ndarray::{Array1, Array2};
use tracing::debug;

/// Orchestrates fitting of a [`TrainableModel`].
///
/// Every epoch runs one forward/backward pass over the whole dataset and
/// applies one optimizer step. Fitting stops after `max_epochs` or as soon as
/// the gradient norm drops below `tolerance`.
///
/// Built via [`TrainerBuilder`]; immutable afterwards and reusable.
pub struct Trainer<L, O> {
    pub(crate) max_epochs: usize,
    pub(crate) tolerance: f64,
    pub(crate) loss_fn: L,
    pub(crate) optimizer: O,
}

/// Fluent builder for a [`Trainer`].
///
/// Defaults:
/// - `max_epochs`: 1000
/// - `tolerance`: 1e-10
pub struct TrainerBuilder<L, O> {
    max_epochs: usize,
    tolerance: f64,
    loss_fn: L,
    optimizer: O,
}

impl<L, O> TrainerBuilder<L, O> {
    pub fn new(loss_fn: L, optimizer: O) -> Self {
        Self {
            max_epochs: 1000,
            tolerance: 1e-10,
            loss_fn,
            optimizer,
        }
    }

    pub fn max_epochs(mut self, epochs: usize) -> Self {
        self.max_epochs = epochs;
        self
    }

    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn build(self) -> Trainer<L, O> {
        Trainer {
            max_epochs: self.max_epochs,
            tolerance: self.tolerance,
            loss_fn: self.loss_fn,
            optimizer: self.optimizer,
        }
    }
}

impl<L, O> Trainer<L, O> {
    /// Starts the builder pattern; equivalent to `TrainerBuilder::new(...)`.
    pub fn builder(loss_fn: L, optimizer: O) -> TrainerBuilder<L, O> {
        TrainerBuilder::new(loss_fn, optimizer)
    }

    /// Fit `model` on `dataset` and return the inference model.
    ///
    /// # Errors
    /// [`TrendError::FeatureMismatch`] if the model and dataset disagree on
    /// the number of features.
    pub fn fit<M, P>(&self, mut model: M, dataset: &InMemoryDataset) -> Result<M::Output>
    where
        L: Loss<Prediction = Array1<f64>, Target = Array1<f64>>,
        M: TrainableModel<
            Input = Array2<f64>,
            Prediction = Array1<f64>,
            Params = P,
            Gradients = P,
        >,
        O: Optimizer<P>,
        P: ParamOps,
    {
        if model.n_features() != dataset.n_features() {
            return Err(TrendError::FeatureMismatch {
                expected: model.n_features(),
                got: dataset.n_features(),
            });
        }

        let x = dataset.features().to_owned();
        let y = dataset.targets().to_owned();

        let mut epochs_run = 0;
        for epoch in 0..self.max_epochs {
            let preds = model.forward(&x);
            let grad_preds = self.loss_fn.grad_wrt_prediction(&preds, &y);
            let grads = model.backward(&x, &grad_preds);

            epochs_run = epoch + 1;
            if grads.norm_sq().sqrt() < self.tolerance {
                break;
            }

            let new_params = self.optimizer.step(model.params(), &grads);
            model.update_params(&new_params);
        }

        let loss = self.loss_fn.loss(&model.forward(&x), &y);
        debug!(epochs = epochs_run, loss, "fit finished");
        Ok(model.into_fitted())
    }
}
