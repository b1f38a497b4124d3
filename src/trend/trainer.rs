//! Fitting a [`TrainedState`] from survey records.

use crate::config::TrendConfig;
use crate::dataset::{InMemoryDataset, Record};
use crate::error::{Result, TrendError};
use crate::features::{FeatureBuilder, PreparedData};
use crate::loss::MSELoss;
use crate::model::linear::{LinearParams, LinearRegression};
use crate::optimizer::SGD;
use crate::preprocessing::{FittedTransformer, StandardScaler, Transformer};
use crate::trainer::Trainer;
use crate::trend::state::TrainedState;
use chrono::{Local, NaiveDateTime};
use ndarray::Array1;
use tracing::{info, warn};

/// Runs feature preparation, scaling and regression fitting.
///
/// The regression is fitted by full-batch gradient descent on the mean
/// squared error, warm-started at `weights = 0`, `bias = mean(target)`,
/// with a learning rate of `1 / n_features`. On standardized features this
/// converges to the least-squares solution closest to the start point, and
/// stops at once when the target is constant.
#[derive(Clone, Debug, Default)]
pub struct TrendTrainer {
    config: TrendConfig,
}

impl TrendTrainer {
    pub fn new(config: TrendConfig) -> Self {
        Self { config }
    }

    /// Fit on `records`, using the current local time as both the timestamp
    /// fallback and the training time.
    pub fn fit(&self, records: &[Record]) -> Result<TrainedState> {
        self.fit_at(records, Local::now().naive_local())
    }

    /// Fit with an explicit clock.
    ///
    /// # Errors
    /// - [`TrendError::NoData`] / [`TrendError::NoTimestamps`] from feature
    ///   preparation.
    /// - [`TrendError::InsufficientSamples`] if fewer than `min_samples`
    ///   distinct dates remain.
    pub fn fit_at(&self, records: &[Record], now: NaiveDateTime) -> Result<TrainedState> {
        let data = FeatureBuilder::new(&self.config).prepare_at(records, now)?;

        if data.n_samples() < self.config.min_samples {
            warn!(
                samples = data.n_samples(),
                required = self.config.min_samples,
                "Not enough data points for training"
            );
            return Err(TrendError::InsufficientSamples {
                got: data.n_samples(),
                required: self.config.min_samples,
            });
        }

        self.fit_prepared(data, now)
    }

    /// Scale and regress already prepared data. No sample-count guard.
    pub fn fit_prepared(&self, data: PreparedData, trained_at: NaiveDateTime) -> Result<TrainedState> {
        let scaler = StandardScaler::new().fit(&data.matrix)?;
        let scaled = scaler.transform(&data.matrix)?;

        let n_samples = data.n_samples();
        let n_features = data.n_features();
        let bias = data.target.mean().unwrap_or(0.0);
        let dataset = InMemoryDataset::new(scaled, data.target).map_err(TrendError::EmptyData)?;

        let warm_start = LinearRegression::from_params(LinearParams {
            weights: Array1::zeros(n_features),
            bias,
        });
        let trainer = Trainer::builder(MSELoss, SGD::new(1.0 / n_features.max(1) as f64))
            .max_epochs(self.config.max_epochs)
            .tolerance(self.config.tolerance)
            .build();
        let model = trainer.fit(warm_start, &dataset)?;

        info!("Model trained on {} data points", n_samples);
        info!("Tracking {} technologies", data.tracked_techs.len());

        TrainedState::new(model, scaler, data.tracked_techs, trained_at)
    }
}
