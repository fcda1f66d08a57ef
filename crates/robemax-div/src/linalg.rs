//! Dense linear-algebra primitives with structured failures.

use nalgebra::DMatrix;
use robemax_core::{ErrorInfo, RobustError};

fn ensure_square(matrix: &DMatrix<f64>, operation: &str) -> Result<usize, RobustError> {
    let (rows, cols) = matrix.shape();
    if rows != cols {
        return Err(RobustError::InvalidInput(
            ErrorInfo::new("matrix_not_square", format!("{operation} requires a square matrix"))
                .with_context("rows", rows)
                .with_context("cols", cols),
        ));
    }
    Ok(rows)
}

/// Inverts a square matrix.
pub fn inverse(matrix: &DMatrix<f64>) -> Result<DMatrix<f64>, RobustError> {
    let n = ensure_square(matrix, "inverse")?;
    matrix.clone().try_inverse().ok_or_else(|| {
        RobustError::Numerical(
            ErrorInfo::new("matrix_singular", "matrix is not invertible")
                .with_context("rows", n)
                .with_context("cols", n),
        )
    })
}

/// Determinant of a square matrix, computed through an LU decomposition.
pub fn determinant(matrix: &DMatrix<f64>) -> Result<f64, RobustError> {
    ensure_square(matrix, "determinant")?;
    let det = matrix.clone().lu().determinant();
    if !det.is_finite() {
        return Err(RobustError::Numerical(
            ErrorInfo::new("determinant_non_finite", "determinant overflowed")
                .with_context("rows", matrix.nrows()),
        ));
    }
    Ok(det)
}

/// Sum of the diagonal of a square matrix.
pub fn trace(matrix: &DMatrix<f64>) -> Result<f64, RobustError> {
    ensure_square(matrix, "trace")?;
    Ok(matrix.trace())
}
