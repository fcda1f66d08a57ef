#![deny(missing_docs)]
#![doc = "Monte Carlo estimation of robust continuation values (EMAX) for the \
occupational choice model, with the Keane-Wolpin choice evaluator and period \
interpolation."]

/// YAML configuration of the estimator.
pub mod config;
/// Monte Carlo EMAX estimation.
pub mod estimator;
/// Keane-Wolpin total value evaluator.
pub mod evaluator;
/// Regression-based interpolation of period EMAX values.
pub mod interpolation;
/// JSON and YAML helpers.
#[path = "serde.rs"]
pub mod serde_io;

pub use config::{load_config, EmaxConfig, ExecutionConfig, ExecutionMode, InterpolationConfig};
pub use estimator::{estimate_emax, EmaxEstimate, EmaxEstimator};
pub use evaluator::{KeaneWolpinEvaluator, ShockComposition, MAX_LOG_FLOAT};
pub use interpolation::{interpolate_period_emax, ols, InterpolationReport};
