//! Demo trainer: fits the trend model on embedded sample data and prints a
//! short report. Always exits successfully.

use tech_pulse_ml::config::TrendConfig;
use tech_pulse_ml::pipeline::run_demo;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tech_pulse_ml=info")))
        .init();

    let predictor = run_demo(&TrendConfig::default());
    info!(trained = predictor.is_trained(), "demo finished");
}
