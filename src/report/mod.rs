//! Report module - summarizing and exporting reduction results

pub mod summary;
pub mod vif_export;

pub use summary::*;
pub use vif_export::*;
