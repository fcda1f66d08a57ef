use nalgebra::{DMatrix, DVector};
use robemax_core::{
    ChoiceValueEvaluator, DrawSet, ErrorInfo, RngHandle, RobustError, ShockDraw, StateContext,
    SystematicRewards, NUM_ALTERNATIVES,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::InterpolationConfig;
use crate::estimator::EmaxEstimator;

/// Regressors per state: differences, their square roots and a constant.
pub const NUM_REGRESSORS: usize = 2 * NUM_ALTERNATIVES + 1;

const PINV_EPSILON: f64 = 1e-12;

/// EMAX values for every state of one period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterpolationReport {
    /// EMAX per state index, simulated or predicted.
    pub emax: Vec<f64>,
    /// Whether the state's value was simulated rather than predicted.
    pub simulated: Vec<bool>,
    /// OLS coefficients, absent when every state was simulated.
    pub coefficients: Option<Vec<f64>>,
}

/// Approximates the EMAX of every state in a period by simulating a random
/// subset and predicting the rest with the Keane-Wolpin (1994) regression.
///
/// `rewards[k]` holds the systematic rewards of state `k`; `context` supplies
/// the period, the continuation table and the model constants, its
/// `state_index` is ignored. `expected_shocks` is the mean shock vector used
/// for the regressors.
pub fn interpolate_period_emax<E>(
    estimator: &EmaxEstimator,
    evaluator: &E,
    rewards: &[SystematicRewards],
    draws: &DrawSet,
    expected_shocks: &ShockDraw,
    context: &StateContext<'_>,
    config: &InterpolationConfig,
) -> Result<InterpolationReport, RobustError>
where
    E: ChoiceValueEvaluator + ?Sized,
{
    let num_states = rewards.len();
    if config.points < 2 {
        return Err(RobustError::InvalidInput(
            ErrorInfo::new("interpolation_points", "at least two states must be simulated")
                .with_context("points", config.points)
                .with_context("period", context.period),
        ));
    }

    if config.points >= num_states {
        let emax = rewards
            .iter()
            .enumerate()
            .map(|(index, state_rewards)| {
                let state = context.with_state_index(index);
                estimator
                    .estimate(evaluator, state_rewards, draws, &state)
                    .map(|estimate| estimate.emax)
            })
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(InterpolationReport {
            emax,
            simulated: vec![true; num_states],
            coefficients: None,
        });
    }

    let mut rng = RngHandle::for_substream(config.seed, context.period as u64);
    let mut simulated = vec![false; num_states];
    for index in rng.sample_indices(num_states, config.points) {
        simulated[index] = true;
    }
    let share = config.points as f64 / num_states as f64;
    if share < 0.01 {
        warn!(
            period = context.period,
            points = config.points,
            num_states,
            "fewer than 1% of the period's states are simulated"
        );
    }

    let mut exogenous = DMatrix::<f64>::zeros(num_states, NUM_REGRESSORS);
    let mut max_expected = Vec::with_capacity(num_states);
    for (index, state_rewards) in rewards.iter().enumerate() {
        let state = context.with_state_index(index);
        let values = evaluator.total_values(state_rewards, expected_shocks, &state)?;
        let maximum = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        for (column, value) in values.iter().enumerate() {
            let gap = maximum - value;
            exogenous[(index, column)] = gap;
            exogenous[(index, NUM_ALTERNATIVES + column)] = gap.sqrt();
        }
        exogenous[(index, NUM_REGRESSORS - 1)] = 1.0;
        max_expected.push(maximum);
    }

    let simulated_rows: Vec<usize> = (0..num_states).filter(|&k| simulated[k]).collect();
    let mut simulated_emax = Vec::with_capacity(simulated_rows.len());
    for &index in &simulated_rows {
        let state = context.with_state_index(index);
        let estimate = estimator.estimate(evaluator, &rewards[index], draws, &state)?;
        simulated_emax.push(estimate.emax);
    }

    let x = exogenous.select_rows(simulated_rows.iter());
    let y = DVector::from_iterator(
        simulated_rows.len(),
        simulated_rows
            .iter()
            .zip(&simulated_emax)
            .map(|(&index, emax)| emax - max_expected[index]),
    );
    let beta = ols(&y, &x)?;
    if beta.iter().any(|value| !value.is_finite()) {
        warn!(period = context.period, "interpolation coefficients are not finite");
    }

    let predicted = &exogenous * &beta;
    let mut emax: Vec<f64> = predicted
        .iter()
        .zip(&max_expected)
        .map(|(prediction, maximum)| prediction.max(0.0) + maximum)
        .collect();
    for (&index, value) in simulated_rows.iter().zip(simulated_emax) {
        emax[index] = value;
    }

    debug!(
        period = context.period,
        num_states,
        points = config.points,
        "interpolated period emax"
    );
    Ok(InterpolationReport {
        emax,
        simulated,
        coefficients: Some(beta.iter().copied().collect()),
    })
}

/// Least-squares coefficients `pinv(XᵀX) Xᵀy`.
pub fn ols(y: &DVector<f64>, x: &DMatrix<f64>) -> Result<DVector<f64>, RobustError> {
    if x.nrows() != y.len() {
        return Err(RobustError::InvalidInput(
            ErrorInfo::new("ols_shape", "regressor rows and observations disagree")
                .with_context("rows", x.nrows())
                .with_context("observations", y.len()),
        ));
    }
    let gram = x.transpose() * x;
    let pinv = gram.pseudo_inverse(PINV_EPSILON).map_err(|message| {
        RobustError::Numerical(
            ErrorInfo::new("ols_pseudo_inverse", message)
                .with_context("rows", x.nrows())
                .with_context("cols", x.ncols()),
        )
    })?;
    Ok(pinv * (x.transpose() * y))
}
