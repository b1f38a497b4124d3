//! Configuration for training, prediction and the pipeline entry point.
//!
//! [`TrendConfig`] holds the model tunables; [`PipelineConfig`] adds the file
//! locations used by [`crate::pipeline`]. Both follow the builder style of the
//! rest of the crate and can be deserialized from JSON.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable overriding [`PipelineConfig::data_path`].
pub const DATA_PATH_ENV: &str = "TECH_PULSE_DATA";
/// Environment variable overriding [`PipelineConfig::model_path`].
pub const MODEL_PATH_ENV: &str = "TECH_PULSE_MODEL";

/// Survey question listing the tools a respondent uses daily.
pub const TOOLS_FIELD: &str = "which tools or frameworks do you use in your daily work?";
/// Survey question listing the technology areas a respondent is interested in.
pub const INTERESTS_FIELD: &str = "which of the following technology areas are you interested in?";

/// Tunables for feature preparation, fitting and forecasting.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendConfig {
    /// Record field holding the response timestamp.
    pub timestamp_field: String,
    /// Free-text record fields listing comma-separated technologies.
    pub tech_fields: Vec<String>,
    /// Cap on the tracked technology set.
    pub max_tracked_techs: usize,
    /// Minimum number of distinct-date rows required to fit.
    pub min_samples: usize,
    /// Days between the reference date and the date-based prediction.
    pub horizon_days: i64,
    /// Growth factor applied per growth period in top-trending projection.
    pub growth_rate: f64,
    /// Length in days of one growth period.
    pub growth_period_days: f64,
    /// Maximum entries returned by top-trending projection.
    pub top_n: usize,
    /// Upper bound on gradient-descent epochs.
    pub max_epochs: usize,
    /// Gradient-norm threshold at which fitting stops early.
    pub tolerance: f64,
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            timestamp_field: "timestamp".to_string(),
            tech_fields: vec![TOOLS_FIELD.to_string(), INTERESTS_FIELD.to_string()],
            max_tracked_techs: 20,
            min_samples: 3,
            horizon_days: 7,
            growth_rate: 1.1,
            growth_period_days: 30.0,
            top_n: 5,
            max_epochs: 5000,
            tolerance: 1e-10,
        }
    }
}

impl TrendConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timestamp_field(mut self, field: impl Into<String>) -> Self {
        self.timestamp_field = field.into();
        self
    }

    pub fn with_tech_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tech_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_max_tracked_techs(mut self, max: usize) -> Self {
        self.max_tracked_techs = max;
        self
    }

    pub fn with_min_samples(mut self, min: usize) -> Self {
        self.min_samples = min;
        self
    }

    pub fn with_horizon_days(mut self, days: i64) -> Self {
        self.horizon_days = days;
        self
    }

    pub fn with_growth_rate(mut self, rate: f64) -> Self {
        self.growth_rate = rate;
        self
    }

    pub fn with_top_n(mut self, n: usize) -> Self {
        self.top_n = n;
        self
    }

    pub fn with_max_epochs(mut self, epochs: usize) -> Self {
        self.max_epochs = epochs;
        self
    }
}

/// File locations for the entry point plus the model configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// JSON export of survey records.
    pub data_path: PathBuf,
    /// Where the trained state is written.
    pub model_path: PathBuf,
    /// Model tunables.
    pub trend: TrendConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("../backend/data/export.json"),
            model_path: PathBuf::from("model.pkl"),
            trend: TrendConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Defaults, overridden by `TECH_PULSE_DATA` / `TECH_PULSE_MODEL` when set.
    pub fn from_env() -> Self {
        Self::default().apply_env()
    }

    /// Load from a JSON file; missing keys take their default values.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Apply environment variable overrides on top of `self`.
    pub fn apply_env(mut self) -> Self {
        if let Some(path) = std::env::var_os(DATA_PATH_ENV).filter(|v| !v.is_empty()) {
            self.data_path = PathBuf::from(path);
        }
        if let Some(path) = std::env::var_os(MODEL_PATH_ENV).filter(|v| !v.is_empty()) {
            self.model_path = PathBuf::from(path);
        }
        self
    }

    pub fn with_data_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_path = path.into();
        self
    }

    pub fn with_model_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.model_path = path.into();
        self
    }

    pub fn with_trend(mut self, trend: TrendConfig) -> Self {
        self.trend = trend;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trend_config_defaults() {
        let config = TrendConfig::default();
        assert_eq!(config.timestamp_field, "timestamp");
        assert_eq!(config.tech_fields.len(), 2);
        assert_eq!(config.max_tracked_techs, 20);
        assert_eq!(config.min_samples, 3);
        assert_eq!(config.horizon_days, 7);
        assert_eq!(config.growth_rate, 1.1);
        assert_eq!(config.top_n, 5);
    }

    #[test]
    fn test_trend_config_builder() {
        let config = TrendConfig::new()
            .with_timestamp_field("submitted")
            .with_tech_fields(["languages"])
            .with_max_tracked_techs(5)
            .with_min_samples(2)
            .with_top_n(3);
        assert_eq!(config.timestamp_field, "submitted");
        assert_eq!(config.tech_fields, vec!["languages".to_string()]);
        assert_eq!(config.max_tracked_techs, 5);
        assert_eq!(config.min_samples, 2);
        assert_eq!(config.top_n, 3);
    }

    #[test]
    fn test_pipeline_config_partial_json_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"model_path": "out/model.bin", "trend": {"top_n": 3}}"#,
        )
        .unwrap();

        let config = PipelineConfig::from_json_file(&path).unwrap();
        assert_eq!(config.model_path, PathBuf::from("out/model.bin"));
        assert_eq!(config.data_path, PathBuf::from("../backend/data/export.json"));
        assert_eq!(config.trend.top_n, 3);
        assert_eq!(config.trend.max_tracked_techs, 20);
    }

    #[test]
    fn test_pipeline_config_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = PipelineConfig::from_json_file(dir.path().join("absent.json"));
        assert!(result.is_err());
    }

    #[test]
    fn test_pipeline_config_env_overrides_paths() {
        std::env::set_var(DATA_PATH_ENV, "survey.json");
        std::env::set_var(MODEL_PATH_ENV, "");
        let config = PipelineConfig::from_env();
        std::env::remove_var(DATA_PATH_ENV);
        std::env::remove_var(MODEL_PATH_ENV);

        assert_eq!(config.data_path, PathBuf::from("survey.json"));
        // empty values are ignored
        assert_eq!(config.model_path, PathBuf::from("model.pkl"));
    }

    #[test]
    fn test_pipeline_config_builder() {
        let config = PipelineConfig::default()
            .with_data_path("data.json")
            .with_model_path("m.bin")
            .with_trend(TrendConfig::new().with_top_n(1));
        assert_eq!(config.data_path, PathBuf::from("data.json"));
        assert_eq!(config.model_path, PathBuf::from("m.bin"));
        assert_eq!(config.trend.top_n, 1);
    }
}
