//! Iterative multicollinearity reduction using Variance Inflation Factors
//!
//! Each iteration scores every retained feature against the others and
//! removes the single worst one while its VIF exceeds the threshold.
//! Scores come in three flavours:
//! - a finite VIF (>= 1),
//! - `+inf` for exact collinearity or a failed regression, which always
//!   loses against any finite score,
//! - NaN when the VIF is undefined (constant column, NaN/null values);
//!   such features are never picked for removal.

use std::fmt;

use faer::Mat;
use polars::prelude::*;
use rayon::prelude::*;
use serde::{Serialize, Serializer};

use super::error::VifError;
use super::regression::{build_design_matrix, variance_inflation_factor};

/// Common rule-of-thumb cutoff for problematic multicollinearity
pub const DEFAULT_VIF_THRESHOLD: f64 = 5.0;

/// A feature removed by the reducer together with its VIF at removal time
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VifRemoval {
    pub feature: String,
    /// Written as `null` in JSON when infinite
    #[serde(serialize_with = "serialize_vif")]
    pub vif: f64,
}

/// VIF of one feature from a single scoring pass
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VifScore {
    pub feature: String,
    /// NaN when undefined, `+inf` for exact collinearity or a failed fit
    #[serde(serialize_with = "serialize_vif")]
    pub vif: f64,
}

impl VifScore {
    /// Whether a VIF could be computed for this feature
    pub fn is_defined(&self) -> bool {
        !self.vif.is_nan()
    }
}

/// Why a reduction run stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// No columns left (empty input, or everything removed)
    EmptyTable,
    /// Every retained feature has VIF <= threshold
    Converged,
    /// Reached a single column and resolved it (kept or removed)
    SingleColumn,
    /// No feature produced a usable VIF in the last iteration
    ComputationFailed,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            StopReason::EmptyTable => "no features left",
            StopReason::Converged => "converged",
            StopReason::SingleColumn => "single feature resolved",
            StopReason::ComputationFailed => "no VIF could be computed",
        };
        write!(f, "{}", text)
    }
}

/// Result of a reduction run
#[derive(Debug, Clone)]
pub struct VifReduction {
    /// Remaining features, in their original order
    pub table: DataFrame,
    /// Removed features, in removal order
    pub removed: Vec<VifRemoval>,
    pub stop: StopReason,
}

impl VifReduction {
    pub fn removed_features(&self) -> Vec<String> {
        self.removed.iter().map(|r| r.feature.clone()).collect()
    }

    pub fn remaining_features(&self) -> Vec<String> {
        self.table
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    /// Outcome when the removals are not applied: `features` (the frame the
    /// run started from) is kept whole and nothing is logged as removed.
    pub fn discard_removals(self, features: DataFrame) -> Self {
        Self {
            table: features,
            removed: Vec::new(),
            stop: self.stop,
        }
    }
}

/// Progress narration emitted while reducing.
///
/// Every removal produces one `Removed`; each run ends with exactly one
/// `Stopped`.
#[derive(Debug, Clone, PartialEq)]
pub enum VifEvent {
    Removed {
        iteration: usize,
        feature: String,
        vif: f64,
        remaining: usize,
    },
    Stopped {
        iteration: usize,
        reason: StopReason,
        /// Highest defined VIF of the final iteration, if any was scored
        max: Option<VifScore>,
        remaining: usize,
    },
}

/// Remove features until every remaining VIF is at or below `threshold`.
///
/// The input frame is never modified; the reduced frame in the result is a
/// separate value.
pub fn reduce_vif(df: &DataFrame, threshold: f64) -> Result<VifReduction, VifError> {
    reduce_vif_with_progress(df, threshold, |_| {})
}

/// Same as [`reduce_vif`], reporting each removal and the final stop to `on_event`.
pub fn reduce_vif_with_progress<F>(
    df: &DataFrame,
    threshold: f64,
    mut on_event: F,
) -> Result<VifReduction, VifError>
where
    F: FnMut(&VifEvent),
{
    if threshold.is_nan() {
        return Err(VifError::InvalidThreshold(threshold));
    }
    validate_feature_table(df)?;

    let mut working = df.clone();
    let mut removed: Vec<VifRemoval> = Vec::new();
    let mut iteration = 0usize;

    let (stop, max) = loop {
        iteration += 1;

        let width = working.width();
        if width == 0 {
            break (StopReason::EmptyTable, None);
        }

        let scores = score_features(&working)?;
        let Some(worst) = select_highest_vif(&scores).cloned() else {
            break (StopReason::ComputationFailed, None);
        };

        if worst.vif <= threshold {
            let reason = if width == 1 {
                StopReason::SingleColumn
            } else {
                StopReason::Converged
            };
            break (reason, Some(worst));
        }

        working = working.drop(&worst.feature)?;
        removed.push(VifRemoval {
            feature: worst.feature.clone(),
            vif: worst.vif,
        });
        on_event(&VifEvent::Removed {
            iteration,
            feature: worst.feature.clone(),
            vif: worst.vif,
            remaining: working.width(),
        });

        if width == 1 {
            break (StopReason::SingleColumn, None);
        }
    };

    on_event(&VifEvent::Stopped {
        iteration,
        reason: stop,
        max,
        remaining: working.width(),
    });

    Ok(VifReduction {
        table: working,
        removed,
        stop,
    })
}

/// Score every feature once, without removing anything.
pub fn compute_vif_scores(df: &DataFrame) -> Result<Vec<VifScore>, VifError> {
    validate_feature_table(df)?;
    if df.width() == 0 {
        return Ok(Vec::new());
    }
    score_features(df)
}

/// Pick the feature with the highest defined VIF.
///
/// Uses a strict greater-than, so among equal maxima the first in column
/// order wins. NaN scores are skipped; `None` means nothing was scored.
pub fn select_highest_vif(scores: &[VifScore]) -> Option<&VifScore> {
    let mut best: Option<&VifScore> = None;

    for score in scores.iter().filter(|s| s.is_defined()) {
        let replace = match best {
            None => true,
            Some(current) => score.vif > current.vif,
        };
        if replace {
            best = Some(score);
        }
    }

    best
}

/// Names of scored features whose VIF is strictly above `threshold`
pub fn high_vif_features(scores: &[VifScore], threshold: f64) -> Vec<String> {
    scores
        .iter()
        .filter(|s| s.vif > threshold)
        .map(|s| s.feature.clone())
        .collect()
}

/// Check that every column is a flat, primitive numeric column.
pub fn validate_feature_table(df: &DataFrame) -> Result<(), VifError> {
    for column in df.get_columns() {
        let dtype = column.dtype();
        if dtype.is_nested() || dtype.is_object() {
            return Err(VifError::NotTabular {
                column: column.name().to_string(),
                dtype: dtype.clone(),
            });
        }
        if !dtype.is_primitive_numeric() {
            return Err(VifError::NonNumericColumn {
                column: column.name().to_string(),
                dtype: dtype.clone(),
            });
        }
    }
    Ok(())
}

/// One scoring pass over a validated, non-empty frame.
///
/// Features are scored in parallel; the output keeps column order.
fn score_features(df: &DataFrame) -> Result<Vec<VifScore>, VifError> {
    let design = build_design_matrix(df)?;
    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();

    let scores = names
        .into_par_iter()
        .enumerate()
        .map(|(idx, feature)| VifScore {
            vif: score_column(&design, idx + 1),
            feature,
        })
        .collect();

    Ok(scores)
}

fn score_column(design: &Mat<f64>, target: usize) -> f64 {
    match variance_inflation_factor(design, target) {
        Ok(vif) => vif,
        Err(err) if err.is_indeterminate() => f64::NAN,
        Err(_) => f64::INFINITY,
    }
}

fn serialize_vif<S: Serializer>(vif: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if vif.is_finite() {
        serializer.serialize_f64(*vif)
    } else {
        serializer.serialize_none()
    }
}
