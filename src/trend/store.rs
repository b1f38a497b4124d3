//! Persistence of a [`TrainedState`] as a single bincode bundle.

use crate::error::{Result, TrendError};
use crate::model::linear::{LinearModel, SerializableLinearParams};
use crate::model::{Fitted, InferenceModel};
use crate::preprocessing::{FittedStandardScaler, FittedTransformer, StandardScalerParams};
use crate::serialization::SerializableParams;
use crate::trend::state::TrainedState;
use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// On-disk layout of a trained state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModelBundle {
    pub model: SerializableLinearParams,
    pub scaler: StandardScalerParams,
    pub tech_list: Vec<String>,
    /// Time the bundle was written.
    pub trained_date: NaiveDateTime,
}

impl ModelBundle {
    pub fn from_state(state: &TrainedState, saved_at: NaiveDateTime) -> Self {
        Self {
            model: state.model().extract_params(),
            scaler: state.scaler().extract_params(),
            tech_list: state.tracked_techs().to_vec(),
            trained_date: saved_at,
        }
    }

    /// Rebuild the state; `trained_at` becomes the bundle's `trained_date`.
    pub fn into_state(self) -> Result<TrainedState> {
        let model = LinearModel::<Fitted>::from_params(self.model)?;
        let scaler = FittedStandardScaler::from_params(self.scaler)?;
        TrainedState::new(model, scaler, self.tech_list, self.trained_date)
    }
}

/// Reads and writes model bundles.
pub struct ModelStore;

impl ModelStore {
    /// Write `state` to `path`, replacing any existing file.
    pub fn save<P: AsRef<Path>>(state: &TrainedState, path: P) -> Result<()> {
        Self::save_at(state, path, Local::now().naive_local())
    }

    pub fn save_at<P: AsRef<Path>>(state: &TrainedState, path: P, saved_at: NaiveDateTime) -> Result<()> {
        let path = path.as_ref();
        let bytes = ModelBundle::from_state(state, saved_at).to_bytes()?;
        std::fs::write(path, bytes)?;
        info!("Model saved to {}", path.display());
        Ok(())
    }

    /// Read a state from `path`.
    ///
    /// Returns `Ok(None)` when no file exists at `path`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Option<TrainedState>> {
        let path = path.as_ref();
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(TrendError::Io(e)),
        };

        let state = ModelBundle::from_bytes(&bytes)?.into_state()?;
        info!("Model loaded from {}", path.display());
        Ok(Some(state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::linear::LinearParams;
    use crate::preprocessing::{StandardScaler, Transformer};
    use crate::trend::state::ForecastSettings;
    use chrono::NaiveDate;
    use ndarray::array;

    fn at(d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 2, d)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap()
    }

    fn state() -> TrainedState {
        let matrix = array![
            [1.0, 0.0, 1.0, 2.0],
            [2.0, 1.0, 1.0, 0.0],
            [3.0, 2.0, 1.0, 1.0]
        ];
        let scaler = StandardScaler::new().fit(&matrix).unwrap();
        let model = LinearModel::<Fitted>::new(LinearParams {
            weights: array![0.3, -0.1, 0.0, 0.7],
            bias: 12.5,
        });
        TrainedState::new(model, scaler, vec!["rust".to_string()], at(1)).unwrap()
    }

    #[test]
    fn test_save_load_round_trip() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let original = state();
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("model.pkl");

        ModelStore::save_at(&original, &path, at(5))?;
        let loaded = ModelStore::load(&path)?.expect("bundle present");

        assert_eq!(loaded.tracked_techs(), original.tracked_techs());
        assert_eq!(loaded.scaler(), original.scaler());
        assert_eq!(loaded.model().weights(), original.model().weights());
        assert_eq!(loaded.model().bias(), original.model().bias());
        assert_eq!(loaded.trained_at(), at(5));

        let settings = ForecastSettings::default();
        assert_eq!(
            loaded.predict_next(at(10), &settings)?,
            original.predict_next(at(10), &settings)?
        );
        Ok(())
    }

    #[test]
    fn test_save_overwrites() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("model.pkl");
        std::fs::write(&path, b"stale contents")?;

        ModelStore::save_at(&state(), &path, at(2))?;
        assert!(ModelStore::load(&path)?.is_some());
        Ok(())
    }

    #[test]
    fn test_load_missing_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = ModelStore::load(dir.path().join("absent.pkl")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_load_corrupt_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.pkl");
        std::fs::write(&path, [0xffu8; 3]).unwrap();
        assert!(ModelStore::load(&path).is_err());
    }

    #[test]
    fn test_bundle_with_inconsistent_widths_rejected() {
        let mut bundle = ModelBundle::from_state(&state(), at(1));
        bundle.tech_list.push("go".to_string());
        assert!(matches!(
            bundle.into_state(),
            Err(TrendError::FeatureMismatch { .. })
        ));
    }
}
