//! VIF reduction export functionality

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use crate::pipeline::{StopReason, VifReduction, VifRemoval, VifScore};

/// Metadata about the reduction run
#[derive(Serialize)]
pub struct VifExportMetadata {
    /// Timestamp of the run (RFC 3339)
    pub timestamp: String,
    /// vifr version
    pub version: String,
    /// Input file path
    pub input_file: String,
    /// VIF threshold used for removal
    pub threshold: f64,
    /// Columns left out of the analysis
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub excluded_columns: Vec<String>,
    /// Why the reduction stopped
    pub stop_reason: StopReason,
    /// False when the removals were declined and the output keeps every feature
    pub removals_applied: bool,
}

/// Feature counts before and after reduction
#[derive(Serialize)]
pub struct VifExportSummary {
    pub initial_features: usize,
    pub final_features: usize,
    pub removed: usize,
}

/// Complete VIF reduction export
#[derive(Serialize)]
pub struct VifAnalysisExport {
    pub metadata: VifExportMetadata,
    pub summary: VifExportSummary,
    /// Removed features in removal order; infinite VIF is written as null
    pub removed: Vec<VifRemoval>,
    /// VIF of every remaining feature, recomputed after the last removal
    pub final_scores: Vec<VifScore>,
}

/// Parameters for the export metadata
pub struct ExportParams<'a> {
    pub input_file: &'a str,
    pub threshold: f64,
    pub excluded_columns: &'a [String],
    pub removals_applied: bool,
}

/// Assemble the export document for a finished reduction
pub fn build_vif_export(
    reduction: &VifReduction,
    final_scores: &[VifScore],
    params: &ExportParams,
) -> VifAnalysisExport {
    let final_features = reduction.table.width();
    let removed = reduction.removed.len();

    VifAnalysisExport {
        metadata: VifExportMetadata {
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            input_file: params.input_file.to_string(),
            threshold: params.threshold,
            excluded_columns: params.excluded_columns.to_vec(),
            stop_reason: reduction.stop,
            removals_applied: params.removals_applied,
        },
        summary: VifExportSummary {
            initial_features: final_features + removed,
            final_features,
            removed,
        },
        removed: reduction.removed.clone(),
        final_scores: final_scores.to_vec(),
    }
}

/// Export a VIF reduction to a pretty-printed JSON file
///
/// # Arguments
/// * `reduction` - Result of the reduction run
/// * `final_scores` - VIF of the remaining features
/// * `output_path` - Path to write the JSON file
/// * `params` - Export parameters for metadata
pub fn export_vif_analysis(
    reduction: &VifReduction,
    final_scores: &[VifScore],
    output_path: &Path,
    params: &ExportParams,
) -> Result<()> {
    let export = build_vif_export(reduction, final_scores, params);

    let json = serde_json::to_string_pretty(&export)
        .context("Failed to serialize VIF analysis to JSON")?;

    std::fs::write(output_path, json)
        .with_context(|| format!("Failed to write VIF analysis to {}", output_path.display()))?;

    Ok(())
}
