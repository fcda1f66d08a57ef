use std::sync::Arc;

use rayon::prelude::*;
use rayon::ThreadPool;
use robemax_core::{
    ChoiceValueEvaluator, DrawSet, ErrorInfo, RobustError, ShockDraw, StateContext,
    SystematicRewards,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::{ExecutionConfig, ExecutionMode};

/// Monte Carlo estimate of the expected maximum value at one state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmaxEstimate {
    /// Average over draws of the best alternative's total value.
    pub emax: f64,
    /// Number of draws averaged.
    pub num_draws: usize,
    /// Sample standard deviation of the per-draw maxima over `sqrt(num_draws)`.
    pub standard_error: f64,
}

/// Evaluates EMAX integrals, sequentially or over a rayon pool.
///
/// Per-draw maxima are collected in draw order and summed on the calling
/// thread, so both execution modes return identical estimates.
#[derive(Clone)]
pub struct EmaxEstimator {
    execution: ExecutionConfig,
    pool: Option<Arc<ThreadPool>>,
}

impl std::fmt::Debug for EmaxEstimator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmaxEstimator")
            .field("execution", &self.execution)
            .field("dedicated_pool", &self.pool.is_some())
            .finish()
    }
}

impl Default for EmaxEstimator {
    fn default() -> Self {
        Self::sequential()
    }
}

impl EmaxEstimator {
    /// Creates an estimator that evaluates draws in order on the calling thread.
    pub fn sequential() -> Self {
        Self {
            execution: ExecutionConfig::default(),
            pool: None,
        }
    }

    /// Creates an estimator for the given execution settings.
    ///
    /// A dedicated pool is built once when parallel mode asks for a fixed
    /// number of threads.
    pub fn new(execution: &ExecutionConfig) -> Result<Self, RobustError> {
        let pool = match execution.mode {
            ExecutionMode::Parallel if execution.threads > 0 => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(execution.threads)
                    .build()
                    .map_err(|err| {
                        RobustError::InvalidInput(
                            ErrorInfo::new("thread_pool", err.to_string())
                                .with_context("threads", execution.threads),
                        )
                    })?;
                Some(Arc::new(pool))
            }
            _ => None,
        };
        Ok(Self {
            execution: *execution,
            pool,
        })
    }

    /// Execution settings in use.
    pub fn execution(&self) -> &ExecutionConfig {
        &self.execution
    }

    /// Estimates the EMAX of the state described by `context`.
    ///
    /// Fails on an empty draw set and on the first evaluator failure; no
    /// partial average is ever returned.
    pub fn estimate<E>(
        &self,
        evaluator: &E,
        rewards: &SystematicRewards,
        draws: &DrawSet,
        context: &StateContext<'_>,
    ) -> Result<EmaxEstimate, RobustError>
    where
        E: ChoiceValueEvaluator + ?Sized,
    {
        context.validate()?;
        if draws.is_empty() {
            return Err(RobustError::InvalidInput(
                ErrorInfo::new("empty_draws", "cannot average over an empty draw set")
                    .with_context("period", context.period)
                    .with_context("state_index", context.state_index)
                    .with_context("num_draws", 0),
            ));
        }

        let maxima = self.draw_maxima(evaluator, rewards, draws, context)?;
        let estimate = summarize(&maxima);
        debug!(
            period = context.period,
            state_index = context.state_index,
            num_draws = estimate.num_draws,
            emax = estimate.emax,
            standard_error = estimate.standard_error,
            "estimated emax"
        );
        Ok(estimate)
    }

    fn draw_maxima<E>(
        &self,
        evaluator: &E,
        rewards: &SystematicRewards,
        draws: &DrawSet,
        context: &StateContext<'_>,
    ) -> Result<Vec<f64>, RobustError>
    where
        E: ChoiceValueEvaluator + ?Sized,
    {
        let evaluate = |(index, shocks): (usize, &ShockDraw)| {
            best_total_value(evaluator, rewards, shocks, context, index)
        };
        match (self.execution.mode, &self.pool) {
            (ExecutionMode::Sequential, _) => draws.iter().enumerate().map(evaluate).collect(),
            (ExecutionMode::Parallel, Some(pool)) => pool.install(|| {
                draws
                    .as_slice()
                    .par_iter()
                    .enumerate()
                    .map(evaluate)
                    .collect()
            }),
            (ExecutionMode::Parallel, None) => draws
                .as_slice()
                .par_iter()
                .enumerate()
                .map(evaluate)
                .collect(),
        }
    }
}

fn best_total_value<E>(
    evaluator: &E,
    rewards: &SystematicRewards,
    shocks: &ShockDraw,
    context: &StateContext<'_>,
    draw_index: usize,
) -> Result<f64, RobustError>
where
    E: ChoiceValueEvaluator + ?Sized,
{
    let values = evaluator.total_values(rewards, shocks, context)?;
    if values.iter().any(|value| value.is_nan()) {
        return Err(RobustError::Numerical(
            ErrorInfo::new("total_value_nan", "choice evaluator produced NaN")
                .with_context("period", context.period)
                .with_context("state_index", context.state_index)
                .with_context("draw", draw_index),
        ));
    }
    let maximum = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    trace!(draw = draw_index, maximum, "draw evaluated");
    Ok(maximum)
}

fn summarize(maxima: &[f64]) -> EmaxEstimate {
    let num_draws = maxima.len();
    let emax = maxima.iter().sum::<f64>() / num_draws as f64;
    let standard_error = if num_draws > 1 {
        let variance = maxima
            .iter()
            .map(|value| (value - emax).powi(2))
            .sum::<f64>()
            / (num_draws - 1) as f64;
        (variance / num_draws as f64).sqrt()
    } else {
        0.0
    };
    EmaxEstimate {
        emax,
        num_draws,
        standard_error,
    }
}

/// Plain sequential EMAX estimate, the average of per-draw maxima.
pub fn estimate_emax<E>(
    evaluator: &E,
    rewards: &SystematicRewards,
    draws: &DrawSet,
    context: &StateContext<'_>,
) -> Result<f64, RobustError>
where
    E: ChoiceValueEvaluator + ?Sized,
{
    EmaxEstimator::sequential()
        .estimate(evaluator, rewards, draws, context)
        .map(|estimate| estimate.emax)
}
