use robemax_core::{
    Alternative, ChoiceValueEvaluator, ErrorInfo, RobustError, ShockDraw, StateCharacteristics,
    StateContext, StateSpaceIndex, SystematicRewards, HUGE_FLOAT, NUM_ALTERNATIVES,
};
use serde::{Deserialize, Serialize};

/// Largest argument accepted by `exp` without overflowing an `f64`.
pub const MAX_LOG_FLOAT: f64 = 709.782712893384;

/// How occupation shocks combine with systematic wages.
///
/// Education and home shocks are always additive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShockComposition {
    /// `systematic + shock` for every alternative.
    #[default]
    Additive,
    /// `systematic * shock` for occupations, with log-normal shocks already exponentiated.
    MultiplicativeWages,
}

impl ShockComposition {
    /// Immediate reward of `alternative` once the shock is realised.
    pub fn ex_post_reward(self, alternative: Alternative, systematic: f64, shock: f64) -> f64 {
        match self {
            ShockComposition::MultiplicativeWages if alternative.is_occupation() => {
                systematic * shock
            }
            _ => systematic + shock,
        }
    }

    /// Mean shock per alternative given the variances of the underlying normals.
    pub fn expected_shocks(self, variances: &[f64]) -> Result<ShockDraw, RobustError> {
        if variances.len() != NUM_ALTERNATIVES {
            return Err(RobustError::InvalidInput(
                ErrorInfo::new("variance_dimension", "expected one variance per alternative")
                    .with_context("expected", NUM_ALTERNATIVES)
                    .with_context("actual", variances.len()),
            ));
        }
        let mut expected = [0.0; NUM_ALTERNATIVES];
        if self == ShockComposition::MultiplicativeWages {
            for alternative in Alternative::ALL.into_iter().filter(|alt| alt.is_occupation()) {
                let variance = variances[alternative.index()].clamp(0.0, MAX_LOG_FLOAT);
                expected[alternative.index()] = (variance / 2.0).exp();
            }
        }
        Ok(ShockDraw(expected))
    }
}

/// Keane-Wolpin occupational choice evaluator.
///
/// Resolves successor states through the state-space index and reads their
/// EMAX from the continuation table of the context.
#[derive(Debug, Clone, Copy)]
pub struct KeaneWolpinEvaluator<'a> {
    state_space: &'a StateSpaceIndex,
    composition: ShockComposition,
}

impl<'a> KeaneWolpinEvaluator<'a> {
    /// Creates an evaluator over `state_space`.
    pub fn new(state_space: &'a StateSpaceIndex, composition: ShockComposition) -> Self {
        Self {
            state_space,
            composition,
        }
    }

    /// Shock composition in use.
    pub fn composition(&self) -> ShockComposition {
        self.composition
    }

    /// Continuation values reachable from the state of `context`, one per alternative.
    ///
    /// Zero in the final period. Education beyond the bound is `-HUGE_FLOAT`.
    pub fn future_payoffs(
        &self,
        context: &StateContext<'_>,
    ) -> Result<[f64; NUM_ALTERNATIVES], RobustError> {
        let next = context.period + 1;
        if next >= self.state_space.num_periods() {
            return Ok([0.0; NUM_ALTERNATIVES]);
        }

        let current = self
            .state_space
            .characteristics(context.period, context.state_index)?;
        let emax_of = |chars: StateCharacteristics| -> Result<f64, RobustError> {
            let index = self.state_space.lookup(next, &chars)?;
            context.continuation_values.emax(next, index)
        };

        let StateCharacteristics {
            exp_a, exp_b, edu, ..
        } = current;
        let mut future = [0.0; NUM_ALTERNATIVES];
        future[Alternative::OccupationA.index()] =
            emax_of(StateCharacteristics::new(exp_a + 1, exp_b, edu, false))?;
        future[Alternative::OccupationB.index()] =
            emax_of(StateCharacteristics::new(exp_a, exp_b + 1, edu, false))?;
        future[Alternative::Education.index()] = if context.education_bounds.allows_increase(edu) {
            emax_of(StateCharacteristics::new(exp_a, exp_b, edu + 1, true))?
        } else {
            -HUGE_FLOAT
        };
        future[Alternative::Home.index()] =
            emax_of(StateCharacteristics::new(exp_a, exp_b, edu, false))?;
        Ok(future)
    }
}

impl ChoiceValueEvaluator for KeaneWolpinEvaluator<'_> {
    fn total_value(
        &self,
        alternative: Alternative,
        rewards: &SystematicRewards,
        shocks: &ShockDraw,
        context: &StateContext<'_>,
    ) -> Result<f64, RobustError> {
        Ok(self.total_values(rewards, shocks, context)?[alternative.index()])
    }

    fn total_values(
        &self,
        rewards: &SystematicRewards,
        shocks: &ShockDraw,
        context: &StateContext<'_>,
    ) -> Result<[f64; NUM_ALTERNATIVES], RobustError> {
        let future = self.future_payoffs(context)?;
        let mut total = [0.0; NUM_ALTERNATIVES];
        for alternative in Alternative::ALL {
            let ex_post =
                self.composition
                    .ex_post_reward(alternative, rewards[alternative], shocks[alternative]);
            total[alternative.index()] =
                ex_post + context.discount_factor * future[alternative.index()];
        }

        // A zero discount factor would otherwise hide the infeasible schooling.
        let education = Alternative::Education.index();
        if context.is_myopic() && future[education] == -HUGE_FLOAT {
            total[education] = -HUGE_FLOAT;
        }
        Ok(total)
    }
}
