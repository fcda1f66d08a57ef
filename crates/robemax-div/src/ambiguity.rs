use robemax_core::{ErrorInfo, GaussianDistribution, RobustError};
use serde::{Deserialize, Serialize};

use crate::divergence::divergence;

/// Divergence ball of radius `level` around a reference distribution.
///
/// A worst-case search may only pick candidates this set admits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawAmbiguitySet")]
pub struct AmbiguitySet {
    reference: GaussianDistribution,
    level: f64,
}

#[derive(Deserialize)]
struct RawAmbiguitySet {
    reference: GaussianDistribution,
    level: f64,
}

impl TryFrom<RawAmbiguitySet> for AmbiguitySet {
    type Error = RobustError;

    fn try_from(raw: RawAmbiguitySet) -> Result<Self, Self::Error> {
        Self::new(raw.reference, raw.level)
    }
}

impl AmbiguitySet {
    /// Creates the set; `level` must be finite and non-negative.
    pub fn new(reference: GaussianDistribution, level: f64) -> Result<Self, RobustError> {
        if !level.is_finite() || level < 0.0 {
            return Err(RobustError::InvalidInput(
                ErrorInfo::new("ambiguity_level", "ambiguity level must be finite and >= 0")
                    .with_context("level", level),
            ));
        }
        Ok(Self { reference, level })
    }

    /// Reference distribution at the centre of the set.
    pub fn reference(&self) -> &GaussianDistribution {
        &self.reference
    }

    /// Divergence budget.
    pub fn level(&self) -> f64 {
        self.level
    }

    /// Remaining budget for `candidate`; negative once the candidate is outside.
    pub fn slack(&self, candidate: &GaussianDistribution) -> Result<f64, RobustError> {
        Ok(self.level - divergence(&self.reference, candidate)?)
    }

    /// Whether `candidate` lies within the divergence budget.
    pub fn admits(&self, candidate: &GaussianDistribution) -> Result<bool, RobustError> {
        Ok(self.slack(candidate)? >= 0.0)
    }
}
