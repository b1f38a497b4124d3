//! Trained state and the two forecasts it supports.

use crate::config::TrendConfig;
use crate::error::{Result, TrendError};
use crate::features::{calendar_features, CALENDAR_FEATURES};
use crate::model::linear::LinearModel;
use crate::model::{Fitted, InferenceModel};
use crate::preprocessing::{FittedStandardScaler, FittedTransformer};
use chrono::{Duration, NaiveDateTime};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Direction reported by the date-based forecast.
///
/// Negative and zero raw predictions are both `Stable`; the model never
/// reports a downward trend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Stable,
}

impl TrendDirection {
    fn from_raw(prediction: f64) -> Self {
        if prediction > 0.0 {
            TrendDirection::Up
        } else {
            TrendDirection::Stable
        }
    }
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrendDirection::Up => write!(f, "up"),
            TrendDirection::Stable => write!(f, "stable"),
        }
    }
}

/// Result of [`TrainedState::predict_next`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NextWeekPrediction {
    /// Model output truncated to an integer and clamped at zero.
    pub predicted_mentions: u64,
    /// Reference date plus the forecast horizon.
    pub prediction_date: NaiveDateTime,
    pub trend_direction: TrendDirection,
}

/// One entry of [`TrainedState::predict_top_trending`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendingTech {
    /// Name as supplied by the caller.
    pub tech: String,
    pub current_count: u64,
    pub predicted_count: u64,
    pub growth_percentage: i64,
}

/// Forecast tunables taken from [`TrendConfig`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ForecastSettings {
    pub horizon_days: i64,
    pub growth_rate: f64,
    pub growth_period_days: f64,
    pub top_n: usize,
}

impl Default for ForecastSettings {
    fn default() -> Self {
        Self::from(&TrendConfig::default())
    }
}

impl From<&TrendConfig> for ForecastSettings {
    fn from(config: &TrendConfig) -> Self {
        Self {
            horizon_days: config.horizon_days,
            growth_rate: config.growth_rate,
            growth_period_days: config.growth_period_days,
            top_n: config.top_n,
        }
    }
}

/// Fitted model, fitted scaler, tracked technologies and training time.
///
/// Immutable once built; produced by
/// [`TrendTrainer`](crate::trend::TrendTrainer) or restored by
/// [`ModelStore`](crate::trend::ModelStore).
#[derive(Clone, Debug)]
pub struct TrainedState {
    model: LinearModel<Fitted>,
    scaler: FittedStandardScaler,
    tracked_techs: Vec<String>,
    trained_at: NaiveDateTime,
}

impl TrainedState {
    /// Assemble a state, checking that model, scaler and tracked set agree
    /// on the feature width.
    pub fn new(
        model: LinearModel<Fitted>,
        scaler: FittedStandardScaler,
        tracked_techs: Vec<String>,
        trained_at: NaiveDateTime,
    ) -> Result<Self> {
        let expected = CALENDAR_FEATURES + tracked_techs.len();
        for got in [model.n_features(), scaler.n_features_in()] {
            if got != expected {
                return Err(TrendError::FeatureMismatch { expected, got });
            }
        }
        Ok(Self {
            model,
            scaler,
            tracked_techs,
            trained_at,
        })
    }

    pub fn model(&self) -> &LinearModel<Fitted> {
        &self.model
    }

    pub fn scaler(&self) -> &FittedStandardScaler {
        &self.scaler
    }

    pub fn tracked_techs(&self) -> &[String] {
        &self.tracked_techs
    }

    pub fn trained_at(&self) -> NaiveDateTime {
        self.trained_at
    }

    /// Unclamped model output for the calendar features of `date` with
    /// zero placeholder counts for every tracked technology.
    ///
    /// Recent counts are not available at inference time, so the count
    /// block is always zero.
    pub fn raw_prediction(&self, date: NaiveDateTime) -> Result<f64> {
        let mut features = Array2::<f64>::zeros((1, CALENDAR_FEATURES + self.tracked_techs.len()));
        for (j, v) in calendar_features(date.date()).into_iter().enumerate() {
            features[[0, j]] = v;
        }
        let scaled = self.scaler.transform(&features)?;
        Ok(self.model.predict(&scaled.row(0).to_owned()))
    }

    /// Forecast total mentions `settings.horizon_days` after `reference`.
    pub fn predict_next(
        &self,
        reference: NaiveDateTime,
        settings: &ForecastSettings,
    ) -> Result<NextWeekPrediction> {
        let prediction_date = reference + Duration::days(settings.horizon_days);
        let raw = self.raw_prediction(prediction_date)?;

        Ok(NextWeekPrediction {
            predicted_mentions: raw.trunc().max(0.0) as u64,
            prediction_date,
            trend_direction: TrendDirection::from_raw(raw),
        })
    }

    /// Project current counts forward by compound growth.
    ///
    /// Independent of the regression model. Only technologies in the
    /// tracked set (compared case-insensitively) are projected:
    ///
    /// ```text
    /// predicted = count * growth_rate ^ (days_ahead / growth_period_days)
    /// ```
    ///
    /// Entries are sorted by predicted count, descending, ties in input
    /// order, and cut to `settings.top_n`.
    pub fn predict_top_trending<I, S>(
        &self,
        current_counts: I,
        days_ahead: u32,
        settings: &ForecastSettings,
    ) -> Vec<TrendingTech>
    where
        I: IntoIterator<Item = (S, u64)>,
        S: AsRef<str>,
    {
        let tracked: HashSet<String> = self
            .tracked_techs
            .iter()
            .map(|t| t.to_lowercase())
            .collect();
        let factor = settings
            .growth_rate
            .powf(days_ahead as f64 / settings.growth_period_days);

        let mut trends: Vec<TrendingTech> = current_counts
            .into_iter()
            .filter(|(tech, _)| tracked.contains(&tech.as_ref().to_lowercase()))
            .map(|(tech, count)| {
                let predicted = count as f64 * factor;
                let growth_percentage = if count > 0 {
                    ((predicted - count as f64) / count as f64 * 100.0) as i64
                } else {
                    0
                };
                TrendingTech {
                    tech: tech.as_ref().to_string(),
                    current_count: count,
                    predicted_count: predicted as u64,
                    growth_percentage,
                }
            })
            .collect();

        trends.sort_by(|a, b| b.predicted_count.cmp(&a.predicted_count));
        trends.truncate(settings.top_n);
        trends
    }
}
