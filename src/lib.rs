//! Technology trend forecasting from developer survey records.
//!
//! Survey responses are turned into one feature row per distinct response
//! date (calendar features plus per-technology mention counts), scaled, and
//! fitted with a linear regression trained by gradient descent. The fitted
//! state answers two questions: how many mentions to expect a week ahead,
//! and which of a given set of technologies will lead under compound growth.
//!
//! # Example
//! ```
//! use tech_pulse_ml::pipeline::sample_records;
//! use tech_pulse_ml::trend::TechTrendPredictor;
//!
//! let mut predictor = TechTrendPredictor::new();
//! assert!(predictor.train(&sample_records()));
//!
//! let top = predictor.predict_top_trending([("React", 100)], 30);
//! assert_eq!(top[0].predicted_count, 110);
//! ```

pub mod config;
pub mod dataset;
pub mod error;
pub mod features;
pub mod loss;
pub mod model;
pub mod optimizer;
pub mod pipeline;
pub mod preprocessing;
pub mod serialization;
pub mod trainer;
pub mod trend;

pub use error::{Result, TrendError};
pub use trend::TechTrendPredictor;
