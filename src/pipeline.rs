//! End-to-end runs: load, train, persist, report.

use crate::config::{PipelineConfig, TrendConfig, INTERESTS_FIELD, TOOLS_FIELD};
use crate::dataset::{load_records, Record};
use crate::trend::TechTrendPredictor;
use std::fmt::Write as _;
use tracing::{info, warn};

/// Current counts used by the demo report.
pub const DEMO_COUNTS: [(&str, u64); 3] = [("React", 10), ("Node.js", 8), ("Python", 12)];

/// Small embedded survey export spanning five distinct dates.
pub fn sample_records() -> Vec<Record> {
    [
        ("2024-01-01", "React, Node.js", "Frontend Development"),
        ("2024-01-02", "Python, Flask", "Backend / APIs"),
        ("2024-01-03", "React, TypeScript", "Frontend Development"),
        ("2024-01-04", "Python, Django", "Data Science, Backend / APIs"),
        ("2024-01-05", "Node.js, React", "Cloud / DevOps"),
    ]
    .into_iter()
    .map(|(timestamp, tools, interests)| {
        Record::new()
            .with("timestamp", timestamp)
            .with(TOOLS_FIELD, tools)
            .with(INTERESTS_FIELD, interests)
    })
    .collect()
}

/// Train on the exported records at `config.data_path` and save the model
/// to `config.model_path`.
///
/// Returns `None` if the export is missing or unreadable, or if training
/// fails. A failed save is logged but still returns the trained predictor.
pub fn train_from_json(config: &PipelineConfig) -> Option<TechTrendPredictor> {
    if !config.data_path.exists() {
        warn!("Data file not found: {}", config.data_path.display());
        return None;
    }

    let records = match load_records(&config.data_path) {
        Ok(records) => records,
        Err(e) => {
            warn!("Could not read {}: {}", config.data_path.display(), e);
            return None;
        }
    };
    info!("Loaded {} records from {}", records.len(), config.data_path.display());

    let mut predictor = TechTrendPredictor::with_config(config.trend.clone());
    if !predictor.train(&records) {
        return None;
    }
    predictor.save_model(&config.model_path);
    Some(predictor)
}

/// Human-readable summary of a predictor and its forecasts.
pub fn render_report<I, S>(predictor: &TechTrendPredictor, current_counts: I) -> String
where
    I: IntoIterator<Item = (S, u64)>,
    S: AsRef<str>,
{
    let mut out = String::new();
    let Some(state) = predictor.state() else {
        out.push_str("Training failed - need more data\n");
        return out;
    };

    let _ = writeln!(out, "Trained at: {}", state.trained_at().format("%Y-%m-%d %H:%M:%S"));
    let _ = writeln!(
        out,
        "Tracked technologies ({}): {}",
        state.tracked_techs().len(),
        state.tracked_techs().join(", ")
    );

    if let Some(next) = predictor.predict_next() {
        let _ = writeln!(
            out,
            "Next week prediction: {} mentions on {} ({})",
            next.predicted_mentions,
            next.prediction_date.format("%Y-%m-%d"),
            next.trend_direction
        );
    }

    out.push_str("Top trending predictions:\n");
    for trend in predictor.predict_top_trending(current_counts, 30) {
        let _ = writeln!(
            out,
            "  {}: {} -> {} (+{}%)",
            trend.tech, trend.current_count, trend.predicted_count, trend.growth_percentage
        );
    }
    out
}

/// Train on [`sample_records`] and print the report to stdout.
pub fn run_demo(config: &TrendConfig) -> TechTrendPredictor {
    println!("Tech Pulse ML Model Trainer");
    println!("{}", "=".repeat(50));

    let mut predictor = TechTrendPredictor::with_config(config.clone());
    let records = sample_records();
    println!("Training on {} sample records", records.len());
    predictor.train(&records);

    print!("{}", render_report(&predictor, DEMO_COUNTS));
    predictor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_records_train() {
        let mut predictor = TechTrendPredictor::new();
        assert!(predictor.train(&sample_records()));
        let tracked = predictor.tracked_techs();
        assert!(tracked.contains(&"react".to_string()));
        assert!(tracked.contains(&"frontend development".to_string()));
    }

    #[test]
    fn test_render_report_trained() {
        let mut predictor = TechTrendPredictor::new();
        assert!(predictor.train(&sample_records()));
        let report = render_report(&predictor, DEMO_COUNTS);

        assert!(report.contains("Next week prediction:"));
        assert!(report.contains("  React: 10 -> 11 (+10%)"));
        assert!(report.contains("  Python: 12 -> 13 (+10%)"));
        assert!(report.contains("  Node.js: 8 -> 8 (+10%)"));
    }

    #[test]
    fn test_run_demo_default_config() {
        let predictor = run_demo(&TrendConfig::default());
        assert!(predictor.is_trained());
        assert_eq!(predictor.predict_top_trending(DEMO_COUNTS, 30).len(), 3);
    }

    #[test]
    fn test_render_report_untrained() {
        let report = render_report(&TechTrendPredictor::new(), DEMO_COUNTS);
        assert_eq!(report, "Training failed - need more data\n");
    }

    #[test]
    fn test_train_from_json_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = PipelineConfig::default()
            .with_data_path(dir.path().join("export.json"))
            .with_model_path(dir.path().join("model.pkl"));
        assert!(train_from_json(&config).is_none());
        assert!(!config.model_path.exists());
    }

    #[test]
    fn test_train_from_json_trains_and_saves() {
        let dir = tempfile::tempdir().unwrap();
        let data_path = dir.path().join("export.json");
        let json = serde_json::to_string(&sample_records()).unwrap();
        std::fs::write(&data_path, json).unwrap();

        let config = PipelineConfig::default()
            .with_data_path(&data_path)
            .with_model_path(dir.path().join("model.pkl"))
            .with_trend(TrendConfig::default());
        let predictor = train_from_json(&config).expect("trained");

        assert!(predictor.is_trained());
        assert!(config.model_path.exists());

        let mut reloaded = TechTrendPredictor::new();
        assert!(reloaded.load_model(&config.model_path));
        assert_eq!(reloaded.tracked_techs(), predictor.tracked_techs());
    }

    #[test]
    fn test_train_from_json_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let data_path = dir.path().join("export.json");
        std::fs::write(&data_path, "{not json").unwrap();
        let config = PipelineConfig::default()
            .with_data_path(&data_path)
            .with_model_path(dir.path().join("model.pkl"));
        assert!(train_from_json(&config).is_none());
    }
}
