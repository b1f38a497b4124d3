//! Feature construction: survey records to a design matrix and target vector.
//!
//! Each distinct calendar date among the records becomes one row:
//!
//! ```text
//! [day_of_month, weekday (0 = Monday), month, count(tech_0), .., count(tech_k)]
//! ```
//!
//! where `count(tech_i)` is the number of mentions of the i-th tracked
//! technology on that date. The tracked set is the first
//! `max_tracked_techs` distinct (lowercased) names in first-seen order.
//!
//! The target is the total number of mentions of all tracked technologies
//! over the whole dataset, repeated for every row, so the regression target
//! is constant.

use crate::config::TrendConfig;
use crate::dataset::{read_timestamp, Record};
use crate::error::{Result, TrendError};
use chrono::{Datelike, Local, NaiveDate, NaiveDateTime};
use ndarray::{Array1, Array2};
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, warn};

/// Number of leading calendar columns in every feature row.
pub const CALENDAR_FEATURES: usize = 3;

/// Calendar part of a feature row: day of month, weekday index, month.
pub fn calendar_features(date: NaiveDate) -> [f64; CALENDAR_FEATURES] {
    [
        date.day() as f64,
        date.weekday().num_days_from_monday() as f64,
        date.month() as f64,
    ]
}

/// Output of [`FeatureBuilder::prepare`].
#[derive(Clone, Debug)]
pub struct PreparedData {
    /// One row per distinct date, `CALENDAR_FEATURES + tracked_techs.len()` columns.
    pub matrix: Array2<f64>,
    /// One (identical) target per row.
    pub target: Array1<f64>,
    /// Tracked technologies, column order of the count block.
    pub tracked_techs: Vec<String>,
    /// Row dates, ascending.
    pub dates: Vec<NaiveDate>,
}

impl PreparedData {
    pub fn n_samples(&self) -> usize {
        self.matrix.nrows()
    }

    pub fn n_features(&self) -> usize {
        self.matrix.ncols()
    }
}

/// Technology name to the dates it was mentioned on, in insertion order.
#[derive(Default)]
struct MentionLog {
    index: HashMap<String, usize>,
    entries: Vec<(String, Vec<NaiveDate>)>,
}

impl MentionLog {
    fn record(&mut self, tech: String, date: NaiveDate) {
        match self.index.get(&tech) {
            Some(&i) => self.entries[i].1.push(date),
            None => {
                self.index.insert(tech.clone(), self.entries.len());
                self.entries.push((tech, vec![date]));
            }
        }
    }
}

/// Turns raw records into numeric training data.
///
/// The tracked technology set computed by the last successful
/// [`prepare`](Self::prepare) is retained and available through
/// [`tracked_techs`](Self::tracked_techs).
#[derive(Clone, Debug)]
pub struct FeatureBuilder {
    timestamp_field: String,
    tech_fields: Vec<String>,
    max_tracked: usize,
    tracked_techs: Vec<String>,
}

impl Default for FeatureBuilder {
    fn default() -> Self {
        Self::new(&TrendConfig::default())
    }
}

impl FeatureBuilder {
    pub fn new(config: &TrendConfig) -> Self {
        Self {
            timestamp_field: config.timestamp_field.clone(),
            tech_fields: config.tech_fields.clone(),
            max_tracked: config.max_tracked_techs,
            tracked_techs: Vec::new(),
        }
    }

    /// Tracked set from the last successful preparation.
    pub fn tracked_techs(&self) -> &[String] {
        &self.tracked_techs
    }

    /// Prepare records, substituting the current local time for missing or
    /// unparseable timestamps.
    pub fn prepare(&mut self, records: &[Record]) -> Result<PreparedData> {
        self.prepare_at(records, Local::now().naive_local())
    }

    /// Prepare records with an explicit fallback time.
    ///
    /// # Errors
    /// - [`TrendError::NoData`] if `records` is empty.
    /// - [`TrendError::NoTimestamps`] if no record has a timestamp field.
    pub fn prepare_at(&mut self, records: &[Record], now: NaiveDateTime) -> Result<PreparedData> {
        if records.is_empty() {
            warn!("No data available for training");
            return Err(TrendError::NoData);
        }

        let mut any_timestamp = false;
        let mut dates: Vec<NaiveDate> = Vec::with_capacity(records.len());
        let mut mentions = MentionLog::default();

        for record in records {
            let raw = read_timestamp(record.field(&self.timestamp_field));
            any_timestamp |= raw.was_present();
            let date = raw.or(now).date();
            dates.push(date);

            for tech in record.technologies(&self.tech_fields) {
                mentions.record(tech.to_lowercase(), date);
            }
        }

        if !any_timestamp {
            warn!("No valid timestamps found");
            return Err(TrendError::NoTimestamps);
        }

        let tracked: Vec<&(String, Vec<NaiveDate>)> =
            mentions.entries.iter().take(self.max_tracked).collect();

        let per_date: Vec<HashMap<NaiveDate, usize>> = tracked
            .iter()
            .map(|(_, seen)| {
                let mut by_date = HashMap::new();
                for d in seen {
                    *by_date.entry(*d).or_insert(0) += 1;
                }
                by_date
            })
            .collect();

        let row_dates: Vec<NaiveDate> = dates.into_iter().collect::<BTreeSet<_>>().into_iter().collect();
        let n_cols = CALENDAR_FEATURES + tracked.len();
        let mut matrix = Array2::<f64>::zeros((row_dates.len(), n_cols));

        for (i, date) in row_dates.iter().enumerate() {
            let mut row = matrix.row_mut(i);
            for (j, v) in calendar_features(*date).into_iter().enumerate() {
                row[j] = v;
            }
            for (k, by_date) in per_date.iter().enumerate() {
                row[CALENDAR_FEATURES + k] = by_date.get(date).copied().unwrap_or(0) as f64;
            }
        }

        let total_mentions: usize = tracked.iter().map(|(_, seen)| seen.len()).sum();
        let target = Array1::from_elem(row_dates.len(), total_mentions as f64);

        self.tracked_techs = tracked.iter().map(|(name, _)| name.clone()).collect();
        debug!(
            rows = row_dates.len(),
            tracked = self.tracked_techs.len(),
            total_mentions,
            "prepared feature matrix"
        );

        Ok(PreparedData {
            matrix,
            target,
            tracked_techs: self.tracked_techs.clone(),
            dates: row_dates,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{INTERESTS_FIELD, TOOLS_FIELD};

    fn record(ts: &str, tools: &str, interests: &str) -> Record {
        Record::new()
            .with("timestamp", ts)
            .with(TOOLS_FIELD, tools)
            .with(INTERESTS_FIELD, interests)
    }

    fn fixed_now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 2, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_calendar_features() {
        // 2024-01-01 is a Monday
        let d = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(calendar_features(d), [1.0, 0.0, 1.0]);
        let sunday = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        assert_eq!(calendar_features(sunday), [10.0, 6.0, 3.0]);
    }

    #[test]
    fn test_prepare_empty_is_no_data() {
        let mut builder = FeatureBuilder::default();
        assert!(matches!(builder.prepare(&[]), Err(TrendError::NoData)));
    }

    #[test]
    fn test_prepare_without_any_timestamp_field() {
        let mut builder = FeatureBuilder::default();
        let records = vec![Record::new().with(TOOLS_FIELD, "React")];
        assert!(matches!(
            builder.prepare(&records),
            Err(TrendError::NoTimestamps)
        ));
        assert!(builder.tracked_techs().is_empty());
    }

    #[test]
    fn test_prepare_builds_rows_and_constant_target() {
        let records = vec![
            record("2024-01-01", "React, Node.js", "Frontend Development"),
            record("2024-01-02", "Python, react", ""),
            record("2024-01-01 15:00:00", "Python", "Backend / APIs"),
        ];
        let mut builder = FeatureBuilder::default();
        let data = builder.prepare_at(&records, fixed_now()).unwrap();

        assert_eq!(
            data.tracked_techs,
            vec!["react", "node.js", "frontend development", "python", "backend / apis"]
        );
        assert_eq!(builder.tracked_techs(), data.tracked_techs.as_slice());

        // two distinct dates, ascending
        assert_eq!(data.n_samples(), 2);
        assert_eq!(data.n_features(), CALENDAR_FEATURES + 5);

        let day1 = data.matrix.row(0).to_vec();
        assert_eq!(day1, vec![1.0, 0.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0]);
        let day2 = data.matrix.row(1).to_vec();
        assert_eq!(day2, vec![2.0, 1.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0]);

        // react 2 + node 1 + frontend 1 + python 2 + backend 1
        assert_eq!(data.target.to_vec(), vec![7.0, 7.0]);
    }

    #[test]
    fn test_prepare_caps_tracked_set_and_deduplicates() {
        let techs: Vec<String> = (0..30).map(|i| format!("Tech{}", i)).collect();
        let records = vec![
            record("2024-01-01", &techs.join(", "), "tech0, TECH1"),
            record("2024-01-02", &techs.join(", "), ""),
        ];
        let mut builder = FeatureBuilder::default();
        let data = builder.prepare_at(&records, fixed_now()).unwrap();

        assert_eq!(data.tracked_techs.len(), 20);
        assert_eq!(data.tracked_techs[0], "tech0");
        assert_eq!(data.tracked_techs[19], "tech19");
        let unique: BTreeSet<&String> = data.tracked_techs.iter().collect();
        assert_eq!(unique.len(), 20);
        // tech0 and tech1 mentioned twice on day one
        assert_eq!(data.matrix[[0, CALENDAR_FEATURES]], 2.0);
        assert_eq!(data.matrix[[0, CALENDAR_FEATURES + 1]], 2.0);
        // target counts only tracked technologies: 20 * 2 + 2
        assert_eq!(data.target[0], 42.0);
    }

    #[test]
    fn test_unparseable_timestamp_falls_back_to_now() {
        let records = vec![
            record("2024-01-01", "Rust", ""),
            record("not a date", "Go", ""),
        ];
        let mut builder = FeatureBuilder::default();
        let data = builder.prepare_at(&records, fixed_now()).unwrap();

        assert_eq!(
            data.dates,
            vec![
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                fixed_now().date()
            ]
        );
        // go is counted on the fallback date
        assert_eq!(data.matrix[[1, CALENDAR_FEATURES + 1]], 1.0);
    }

    #[test]
    fn test_missing_timestamp_in_some_records_uses_fallback() {
        let records = vec![
            record("2024-01-05", "Rust", ""),
            Record::new().with(TOOLS_FIELD, "Rust"),
        ];
        let mut builder = FeatureBuilder::default();
        let data = builder.prepare_at(&records, fixed_now()).unwrap();
        assert_eq!(data.n_samples(), 2);
        assert_eq!(data.target.to_vec(), vec![2.0, 2.0]);
    }

    #[test]
    fn test_offset_timestamp_uses_date_as_written() {
        let records = vec![
            record("2024-06-01T01:00:00+02:00", "Rust", ""),
            record("2024-05-31T12:00:00Z", "Go", ""),
        ];
        let mut builder = FeatureBuilder::default();
        let data = builder.prepare_at(&records, fixed_now()).unwrap();

        assert_eq!(
            data.dates,
            vec![
                NaiveDate::from_ymd_opt(2024, 5, 31).unwrap(),
                NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
            ]
        );
        // 2024-06-01 is a Saturday; rust counted on that row only
        assert_eq!(data.matrix.row(1).to_vec(), vec![1.0, 5.0, 6.0, 1.0, 0.0]);
        assert_eq!(data.matrix.row(0).to_vec(), vec![31.0, 4.0, 5.0, 0.0, 1.0]);
    }

    #[test]
    fn test_prepare_without_technologies() {
        let records = vec![
            Record::new().with("timestamp", "2024-01-01"),
            Record::new().with("timestamp", "2024-01-03"),
        ];
        let mut builder = FeatureBuilder::default();
        let data = builder.prepare_at(&records, fixed_now()).unwrap();
        assert!(data.tracked_techs.is_empty());
        assert_eq!(data.n_features(), CALENDAR_FEATURES);
        assert_eq!(data.target.to_vec(), vec![0.0, 0.0]);
    }

    #[test]
    fn test_custom_fields_and_cap() {
        let config = TrendConfig::new()
            .with_timestamp_field("submitted")
            .with_tech_fields(["langs"])
            .with_max_tracked_techs(1);
        let records = vec![
            Record::new().with("submitted", "2024-05-01").with("langs", "Rust, Go"),
            Record::new().with("submitted", "2024-05-02").with("langs", "Go"),
        ];
        let mut builder = FeatureBuilder::new(&config);
        let data = builder.prepare_at(&records, fixed_now()).unwrap();
        assert_eq!(data.tracked_techs, vec!["rust"]);
        assert_eq!(data.target.to_vec(), vec![1.0, 1.0]);
    }
}
