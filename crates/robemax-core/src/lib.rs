#![deny(missing_docs)]
#![doc = "Core types, lookup tables and collaborator traits shared by the robust EMAX crates."]

pub mod errors;
pub mod params;
pub mod rng;
pub mod tables;
mod types;

pub use errors::{ErrorInfo, RobustError};
pub use params::{ModelParameters, NUM_PARAMETERS};
pub use rng::{derive_substream_seed, RngHandle};
pub use tables::{ContinuationValueTable, ContinuationValues, StateCharacteristics, StateSpaceIndex};
pub use types::{
    Alternative, DrawSet, EducationBounds, GaussianDistribution, ShockDraw, SystematicRewards,
    NUM_ALTERNATIVES,
};

/// Large finite stand-in for minus infinity on infeasible alternatives.
pub const HUGE_FLOAT: f64 = 1.0e10;

/// Everything the choice-value evaluator needs to know about the state being solved.
#[derive(Clone, Copy)]
pub struct StateContext<'a> {
    /// Period of the state.
    pub period: usize,
    /// Dense index of the state within its period.
    pub state_index: usize,
    /// Solved EMAX values of later periods.
    pub continuation_values: &'a dyn ContinuationValues,
    /// Discount factor in `[0, 1)`.
    pub discount_factor: f64,
    /// Schooling bounds constraining the education transition.
    pub education_bounds: EducationBounds,
}

impl<'a> StateContext<'a> {
    /// Checks the scalar parameters of the context.
    pub fn validate(&self) -> Result<(), RobustError> {
        if !(0.0..1.0).contains(&self.discount_factor) {
            return Err(RobustError::InvalidInput(
                ErrorInfo::new("discount_factor", "discount factor must lie in [0, 1)")
                    .with_context("discount_factor", self.discount_factor),
            ));
        }
        Ok(())
    }

    /// Whether the agent ignores the future.
    pub fn is_myopic(&self) -> bool {
        self.discount_factor == 0.0
    }

    /// Returns a copy of the context pointing at another state of the same period.
    pub fn with_state_index(&self, state_index: usize) -> Self {
        Self {
            state_index,
            ..*self
        }
    }
}

impl std::fmt::Debug for StateContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateContext")
            .field("period", &self.period)
            .field("state_index", &self.state_index)
            .field("discount_factor", &self.discount_factor)
            .field("education_bounds", &self.education_bounds)
            .finish_non_exhaustive()
    }
}

/// Computes the total value (immediate plus discounted future) of alternatives.
pub trait ChoiceValueEvaluator: Send + Sync {
    /// Total value of a single alternative under one shock draw.
    fn total_value(
        &self,
        alternative: Alternative,
        rewards: &SystematicRewards,
        shocks: &ShockDraw,
        context: &StateContext<'_>,
    ) -> Result<f64, RobustError>;

    /// Total values of every alternative under one shock draw.
    fn total_values(
        &self,
        rewards: &SystematicRewards,
        shocks: &ShockDraw,
        context: &StateContext<'_>,
    ) -> Result<[f64; NUM_ALTERNATIVES], RobustError> {
        let mut values = [0.0; NUM_ALTERNATIVES];
        for alternative in Alternative::ALL {
            values[alternative.index()] = self.total_value(alternative, rewards, shocks, context)?;
        }
        Ok(values)
    }
}
