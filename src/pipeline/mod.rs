//! Pipeline module - loading data and VIF-based reduction

pub mod error;
pub mod loader;
pub mod regression;
pub mod vif;

pub use error::VifError;
pub use loader::*;
pub use regression::{build_design_matrix, variance_inflation_factor, RegressionError};
pub use vif::*;
