use robemax_core::{ErrorInfo, GaussianDistribution, RobustError};
use tracing::trace;

use crate::linalg::{determinant, inverse, trace as matrix_trace};

/// Round-off allowance below zero that is still reported as a zero divergence.
pub const NEGATIVE_TOLERANCE: f64 = 1e-10;

/// Kullback-Leibler divergence of `candidate` from `reference`.
///
/// Both arguments are multivariate normal; the closed form is
/// `0.5 * (tr(Σ_r⁻¹ Σ_c) + Δμᵀ Σ_r⁻¹ Δμ − n + ln(det Σ_r / det Σ_c))`.
/// The measure is not symmetric, so the reference distribution always comes
/// first.
pub fn divergence(
    reference: &GaussianDistribution,
    candidate: &GaussianDistribution,
) -> Result<f64, RobustError> {
    let n = reference.dimension();
    if candidate.dimension() != n {
        return Err(RobustError::InvalidInput(
            ErrorInfo::new("dimension_mismatch", "distributions have different dimensions")
                .with_context("reference_dim", n)
                .with_context("candidate_dim", candidate.dimension()),
        ));
    }

    let reference_det = determinant(reference.covariance())?;
    let candidate_det = determinant(candidate.covariance())?;
    if reference_det <= 0.0 || candidate_det <= 0.0 {
        return Err(RobustError::Numerical(
            ErrorInfo::new("determinant_non_positive", "covariance determinant is not positive")
                .with_context("reference_det", reference_det)
                .with_context("candidate_det", candidate_det)
                .with_context("dimension", n)
                .with_hint("covariances must be positive definite"),
        ));
    }

    let reference_inv = inverse(reference.covariance())?;
    let mean_diff = reference.mean() - candidate.mean();

    let trace_term = matrix_trace(&(&reference_inv * candidate.covariance()))?;
    let quadratic_term = mean_diff.dot(&(&reference_inv * &mean_diff));
    let log_term = (reference_det / candidate_det).ln();
    let value = 0.5 * (trace_term + quadratic_term - n as f64 + log_term);

    trace!(
        dimension = n,
        trace_term,
        quadratic_term,
        log_term,
        value,
        "gaussian divergence"
    );

    if value < 0.0 {
        if value > -NEGATIVE_TOLERANCE {
            return Ok(0.0);
        }
        return Err(RobustError::Numerical(
            ErrorInfo::new("divergence_negative", "divergence evaluated below zero")
                .with_context("value", value)
                .with_context("dimension", n)
                .with_hint("covariances must be positive definite"),
        ));
    }
    Ok(value)
}
