//! Data preprocessing transformers.
//!
//! Transformers follow an unfitted/fitted split: a [`Transformer`] learns
//! from data and produces a [`FittedTransformer`] holding the learned
//! parameters, which can be extracted and restored.
//!
//! # Available Transformers
//!
//! - [`StandardScaler`]: Z-score normalization

pub mod scaling;
pub mod traits;

pub use scaling::{FittedStandardScaler, StandardScaler, StandardScalerParams};
pub use traits::{FittedTransformer, Transformer};
