use std::path::Path;

use robemax_core::RobustError;
use serde::{Deserialize, Serialize};

use crate::evaluator::ShockComposition;
use crate::serde_io::load_file;

/// YAML-configurable settings for EMAX estimation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmaxConfig {
    /// How draws are evaluated.
    #[serde(default)]
    pub execution: ExecutionConfig,
    /// How occupation shocks enter the wage.
    #[serde(default)]
    pub shock_composition: ShockComposition,
    /// Optional interpolation of period EMAX values.
    #[serde(default)]
    pub interpolation: Option<InterpolationConfig>,
}

/// Sequential or data-parallel draw evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExecutionMode {
    /// Evaluate draws in order on the calling thread.
    #[default]
    Sequential,
    /// Evaluate draws on a rayon pool.
    Parallel,
}

/// Execution settings for the estimator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExecutionConfig {
    /// Execution mode.
    #[serde(default)]
    pub mode: ExecutionMode,
    /// Size of a dedicated pool for parallel mode (0 uses the global rayon pool).
    #[serde(default)]
    pub threads: usize,
}

/// Keane-Wolpin interpolation settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterpolationConfig {
    /// Number of states per period solved by full simulation.
    pub points: usize,
    /// Master seed for selecting the simulated states.
    #[serde(default = "default_interpolation_seed")]
    pub seed: u64,
}

fn default_interpolation_seed() -> u64 {
    0x0E3A_5EED
}

impl InterpolationConfig {
    /// Creates settings with the default seed.
    pub fn with_points(points: usize) -> Self {
        Self {
            points,
            seed: default_interpolation_seed(),
        }
    }
}

/// Loads an [`EmaxConfig`] from a YAML (or `.json`) file.
pub fn load_config(path: &Path) -> Result<EmaxConfig, RobustError> {
    load_file(path)
}
