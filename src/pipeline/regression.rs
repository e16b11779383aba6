//! Least-squares primitive behind the Variance Inflation Factor
//!
//! Column 0 of every design matrix is the intercept. The VIF of column `j`
//! is `1 / (1 - R²)`, with R² taken from regressing column `j` on every
//! other design column. The regressors are scaled to unit norm and
//! factored with a column-pivoted QR. Pivoting pushes dependent regressors
//! to the end of R, so they are cut off by the rank tolerance and a
//! dependent pair elsewhere in the design does not corrupt the fit for an
//! unrelated target.

use faer::{Col, Mat};
use polars::prelude::*;
use thiserror::Error;

/// Diagonal of R (unit-norm regressors) at or below which a regressor is dependent
const RANK_TOLERANCE: f64 = 1e-10;

/// R² this close to 1 is reported as exact collinearity (infinite VIF)
const PERFECT_FIT_TOLERANCE: f64 = 1e-14;

/// Ways a single VIF computation can fail
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegressionError {
    #[error("design matrix has no rows")]
    EmptyDesign,

    #[error(
        "column {index} is not a valid regression target \
         (design has {columns} columns and column 0 is the intercept)"
    )]
    InvalidTarget { index: usize, columns: usize },

    #[error("design matrix contains NaN or infinite values")]
    NonFinite,

    #[error("target column has zero variance")]
    ZeroVariance,

    #[error("regression is saturated: {rank} independent regressors for {rows} rows")]
    Singular { rank: usize, rows: usize },
}

impl RegressionError {
    /// True when the failure leaves the VIF undefined rather than unbounded.
    ///
    /// Undefined scores are skipped when picking a column to remove; every
    /// other failure is scored as an infinite VIF.
    pub fn is_indeterminate(&self) -> bool {
        matches!(
            self,
            Self::EmptyDesign | Self::NonFinite | Self::ZeroVariance
        )
    }
}

/// Build the design matrix for a frame of numeric columns.
///
/// Column 0 is the intercept (all ones), column `j + 1` holds the frame's
/// column `j` cast to Float64. Null values are read as NaN.
pub fn build_design_matrix(df: &DataFrame) -> PolarsResult<Mat<f64>> {
    let n_rows = df.height();
    let columns = df.get_columns();

    let mut design = Mat::<f64>::zeros(n_rows, columns.len() + 1);
    for row_idx in 0..n_rows {
        design[(row_idx, 0)] = 1.0;
    }

    for (col_idx, column) in columns.iter().enumerate() {
        let float_col = column.cast(&DataType::Float64)?;
        let ca = float_col.f64()?;
        for (row_idx, val) in ca.iter().enumerate() {
            design[(row_idx, col_idx + 1)] = val.unwrap_or(f64::NAN);
        }
    }

    Ok(design)
}

/// Variance Inflation Factor of design column `target` against all other
/// design columns (intercept included).
///
/// Returns `f64::INFINITY` when the target is an exact linear combination of
/// the regressors. The result is never below 1.
pub fn variance_inflation_factor(design: &Mat<f64>, target: usize) -> Result<f64, RegressionError> {
    let n_rows = design.nrows();
    let n_cols = design.ncols();

    if target == 0 || target >= n_cols {
        return Err(RegressionError::InvalidTarget {
            index: target,
            columns: n_cols,
        });
    }
    if n_rows == 0 {
        return Err(RegressionError::EmptyDesign);
    }
    if !design.is_all_finite() {
        return Err(RegressionError::NonFinite);
    }

    let first = design[(0, target)];
    if (1..n_rows).all(|i| design[(i, target)] == first) {
        return Err(RegressionError::ZeroVariance);
    }

    // The intercept is always a regressor, so centering the target leaves
    // the residual unchanged and keeps large offsets out of the rounding.
    let mean = (0..n_rows).map(|i| design[(i, target)]).sum::<f64>() / n_rows as f64;
    let centered = Col::from_fn(n_rows, |i| design[(i, target)] - mean);
    let total_ss = centered.norm_l2().powi(2);

    let basis = regressor_basis(design, target);
    let rank = basis.ncols();
    if rank >= n_rows {
        return Err(RegressionError::Singular {
            rank,
            rows: n_rows,
        });
    }

    let coefficients = basis.transpose() * &centered;
    let fitted = &basis * &coefficients;
    let residual = &centered - &fitted;
    let residual_ss = residual.norm_l2().powi(2);

    let r_squared = 1.0 - residual_ss / total_ss;
    if r_squared >= 1.0 - PERFECT_FIT_TOLERANCE {
        return Ok(f64::INFINITY);
    }

    Ok((1.0 / (1.0 - r_squared)).max(1.0))
}

/// Orthonormal basis (one column per independent regressor) spanning every
/// design column except `target`
fn regressor_basis(design: &Mat<f64>, target: usize) -> Mat<f64> {
    let norms: Vec<(usize, f64)> = (0..design.ncols())
        .filter(|&k| k != target)
        .map(|k| (k, design.col(k).norm_l2()))
        .filter(|&(_, norm)| norm > 0.0)
        .collect();

    let regressors = Mat::from_fn(design.nrows(), norms.len(), |i, j| {
        let (k, norm) = norms[j];
        design[(i, k)] / norm
    });

    let qr = regressors.col_piv_qr();
    let r = qr.R();
    let rank = (0..r.nrows().min(r.ncols()))
        .take_while(|&k| r[(k, k)].abs() > RANK_TOLERANCE)
        .count();

    qr.compute_thin_Q().subcols(0, rank).to_owned()
}
