//! Error types for VIF reduction.
//!
//! Only input validation surfaces as an error. Numerical trouble inside an
//! iteration is absorbed into the scores (see [`crate::pipeline::vif`]).

use polars::prelude::{DataType, PolarsError};
use thiserror::Error;

/// Errors returned by the VIF reducer and scorer.
#[derive(Debug, Error)]
pub enum VifError {
    /// The input is not a flat table of scalar columns.
    ///
    /// Raised for nested (List, Array, Struct) or Object columns, which
    /// cannot be laid out as a numeric design matrix.
    #[error("input is not a flat numeric table: column '{column}' has nested type {dtype}")]
    NotTabular { column: String, dtype: DataType },

    /// A scalar column that is not numeric (text, categorical, boolean, temporal, ...).
    #[error("column '{column}' is not numeric (type {dtype}); VIF requires numeric features")]
    NonNumericColumn { column: String, dtype: DataType },

    /// Threshold is NaN, so no comparison against it is meaningful.
    #[error("VIF threshold must be a number, got {0}")]
    InvalidThreshold(f64),

    /// A DataFrame operation failed on a column that already passed validation.
    #[error(transparent)]
    Polars(#[from] PolarsError),
}
