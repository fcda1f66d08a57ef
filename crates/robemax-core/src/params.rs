//! Packing of model parameters into the flat optimisation vector.

use nalgebra::{DMatrix, DVector, Matrix4};
use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, RobustError};
use crate::types::GaussianDistribution;

/// Length of the flat parameter vector.
pub const NUM_PARAMETERS: usize = 26;

/// Reward coefficients and shock Cholesky factor of the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelParameters {
    /// Wage equation coefficients of occupation A.
    pub coeffs_a: [f64; 6],
    /// Wage equation coefficients of occupation B.
    pub coeffs_b: [f64; 6],
    /// Reward coefficients of schooling.
    pub coeffs_edu: [f64; 3],
    /// Reward coefficient of staying at home.
    pub coeffs_home: [f64; 1],
    /// Lower triangular Cholesky factor of the shock covariance.
    pub shocks_cholesky: Matrix4<f64>,
}

impl ModelParameters {
    /// Flattens the parameters; only the lower triangle of the factor is stored.
    pub fn to_vector(&self) -> Vec<f64> {
        let mut x = Vec::with_capacity(NUM_PARAMETERS);
        x.extend_from_slice(&self.coeffs_a);
        x.extend_from_slice(&self.coeffs_b);
        x.extend_from_slice(&self.coeffs_edu);
        x.extend_from_slice(&self.coeffs_home);
        for col in 0..4 {
            for row in col..4 {
                x.push(self.shocks_cholesky[(row, col)]);
            }
        }
        x
    }

    /// Rebuilds parameters from the flat vector produced by [`Self::to_vector`].
    pub fn from_vector(x: &[f64]) -> Result<Self, RobustError> {
        if x.len() != NUM_PARAMETERS {
            return Err(RobustError::InvalidInput(
                ErrorInfo::new("parameter_length", "parameter vector has the wrong length")
                    .with_context("expected", NUM_PARAMETERS)
                    .with_context("actual", x.len()),
            ));
        }
        if let Some(position) = x.iter().position(|value| !value.is_finite()) {
            return Err(RobustError::InvalidInput(
                ErrorInfo::new("parameter_non_finite", "parameter vector has a non-finite entry")
                    .with_context("position", position),
            ));
        }

        let mut shocks_cholesky = Matrix4::zeros();
        let mut cursor = 16;
        for col in 0..4 {
            for row in col..4 {
                shocks_cholesky[(row, col)] = x[cursor];
                cursor += 1;
            }
        }

        Ok(Self {
            coeffs_a: copy_array(&x[0..6]),
            coeffs_b: copy_array(&x[6..12]),
            coeffs_edu: copy_array(&x[12..15]),
            coeffs_home: copy_array(&x[15..16]),
            shocks_cholesky,
        })
    }

    /// Shock covariance `L Lᵀ`.
    pub fn shocks_covariance(&self) -> Matrix4<f64> {
        self.shocks_cholesky * self.shocks_cholesky.transpose()
    }

    /// Zero-mean shock distribution implied by the Cholesky factor.
    pub fn shock_distribution(&self) -> Result<GaussianDistribution, RobustError> {
        let covariance = self.shocks_covariance();
        GaussianDistribution::new(
            DVector::zeros(4),
            DMatrix::from_iterator(4, 4, covariance.iter().copied()),
        )
    }
}

fn copy_array<const N: usize>(values: &[f64]) -> [f64; N] {
    let mut out = [0.0; N];
    out.copy_from_slice(values);
    out
}
