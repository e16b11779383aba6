//! vifr: Multicollinearity Reduction Library
//!
//! A library for removing numeric features whose Variance Inflation Factor
//! exceeds a threshold, one feature at a time, re-scoring after each removal.

pub mod cli;
pub mod pipeline;
pub mod report;
pub mod utils;
