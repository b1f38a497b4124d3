//! Status-returning facade over training, forecasting and persistence.
//!
//! Failures are logged and reported as `false`, `None` or an empty list
//! instead of an error value, and never alter the current state.

use crate::config::TrendConfig;
use crate::dataset::Record;
use crate::error::TrendError;
use crate::trend::state::{ForecastSettings, NextWeekPrediction, TrainedState, TrendingTech};
use crate::trend::store::ModelStore;
use crate::trend::trainer::TrendTrainer;
use chrono::{Local, NaiveDateTime};
use std::path::Path;
use tracing::{error, warn};

/// Technology trend predictor.
///
/// # Example
/// ```
/// use tech_pulse_ml::trend::TechTrendPredictor;
///
/// let mut predictor = TechTrendPredictor::new();
/// assert!(!predictor.train(&[]));
/// assert!(predictor.predict_next().is_none());
/// assert!(predictor.predict_top_trending([("React", 10)], 30).is_empty());
/// ```
#[derive(Clone, Debug, Default)]
pub struct TechTrendPredictor {
    config: TrendConfig,
    state: Option<TrainedState>,
}

impl TechTrendPredictor {
    /// Untrained predictor with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: TrendConfig) -> Self {
        Self {
            config,
            state: None,
        }
    }

    pub fn is_trained(&self) -> bool {
        self.state.is_some()
    }

    pub fn state(&self) -> Option<&TrainedState> {
        self.state.as_ref()
    }

    /// Tracked technologies of the current state; empty when untrained.
    pub fn tracked_techs(&self) -> &[String] {
        self.state.as_ref().map(|s| s.tracked_techs()).unwrap_or(&[])
    }

    fn settings(&self) -> ForecastSettings {
        ForecastSettings::from(&self.config)
    }

    /// Train on `records`. On failure the previous state is kept.
    pub fn train(&mut self, records: &[Record]) -> bool {
        self.train_at(records, Local::now().naive_local())
    }

    /// Train with an explicit clock; see [`TrendTrainer::fit_at`].
    pub fn train_at(&mut self, records: &[Record], now: NaiveDateTime) -> bool {
        match TrendTrainer::new(self.config.clone()).fit_at(records, now) {
            Ok(state) => {
                self.state = Some(state);
                true
            }
            Err(e) => {
                warn!("Training failed: {}", e);
                false
            }
        }
    }

    /// Forecast from the current local time.
    pub fn predict_next(&self) -> Option<NextWeekPrediction> {
        self.predict_next_from(Local::now().naive_local())
    }

    /// Forecast the configured horizon after `reference`.
    pub fn predict_next_from(&self, reference: NaiveDateTime) -> Option<NextWeekPrediction> {
        let Some(state) = self.state.as_ref() else {
            warn!("Prediction skipped: {}", TrendError::NotTrained);
            return None;
        };
        match state.predict_next(reference, &self.settings()) {
            Ok(prediction) => Some(prediction),
            Err(e) => {
                error!("Prediction failed: {}", e);
                None
            }
        }
    }

    /// Growth projection for tracked technologies; empty when untrained.
    pub fn predict_top_trending<I, S>(&self, current_counts: I, days_ahead: u32) -> Vec<TrendingTech>
    where
        I: IntoIterator<Item = (S, u64)>,
        S: AsRef<str>,
    {
        match self.state.as_ref() {
            Some(state) => state.predict_top_trending(current_counts, days_ahead, &self.settings()),
            None => Vec::new(),
        }
    }

    pub fn save_model<P: AsRef<Path>>(&self, path: P) -> bool {
        let Some(state) = self.state.as_ref() else {
            warn!("Save skipped: {}", TrendError::NotTrained);
            return false;
        };
        match ModelStore::save(state, path) {
            Ok(()) => true,
            Err(e) => {
                error!("Could not save model: {}", e);
                false
            }
        }
    }

    /// Replace the current state with the one stored at `path`.
    ///
    /// Returns `false`, keeping the current state, if the file is missing
    /// or unreadable.
    pub fn load_model<P: AsRef<Path>>(&mut self, path: P) -> bool {
        let path = path.as_ref();
        match ModelStore::load(path) {
            Ok(Some(state)) => {
                self.state = Some(state);
                true
            }
            Ok(None) => {
                warn!("No saved model at {}", path.display());
                false
            }
            Err(e) => {
                error!("Could not load model from {}: {}", path.display(), e);
                false
            }
        }
    }
}
