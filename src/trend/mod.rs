//! Technology trend forecasting.
//!
//! - [`TrendTrainer`] fits a [`TrainedState`] from survey records.
//! - [`TrainedState`] answers the two forecasts: mentions a horizon ahead
//!   and a compound-growth ranking of current counts.
//! - [`ModelStore`] persists a state as one bundle.
//! - [`TechTrendPredictor`] wraps all of the above behind status returns.

pub mod predictor;
pub mod state;
pub mod store;
pub mod trainer;

pub use predictor::TechTrendPredictor;
pub use state::{ForecastSettings, NextWeekPrediction, TrainedState, TrendDirection, TrendingTech};
pub use store::{ModelBundle, ModelStore};
pub use trainer::TrendTrainer;
