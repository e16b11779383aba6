//! `score` subcommand: one VIF pass without removing anything

use std::path::Path;

use anyhow::{Context, Result};
use console::style;

use crate::pipeline::{
    compute_vif_scores, ensure_columns_exist, high_vif_features, load_dataset_with_progress,
};
use crate::report::display_vif_scores;
use crate::utils::{create_spinner, finish_with_success, finish_with_warning, print_info};

/// Score every feature column of `input` and print the VIF table
///
/// # Arguments
/// * `input` - Path to the input CSV or Parquet file
/// * `exclude` - Columns left out of the analysis
/// * `threshold` - VIF above which a feature is flagged
/// * `infer_schema_length` - Number of rows to use for CSV schema inference
pub fn run_score(
    input: &Path,
    exclude: &[String],
    threshold: f64,
    infer_schema_length: usize,
) -> Result<()> {
    println!("\n {} Scoring features", style("◆").cyan().bold());
    println!("   Input: {}", style(input.display()).dim());
    println!();

    let (df, _rows, _cols, _memory_mb) = load_dataset_with_progress(input, infer_schema_length)?;
    ensure_columns_exist(&df, exclude, "Excluded")?;
    let features = df.drop_many(exclude);

    if features.width() == 0 {
        print_info("No feature columns to score");
        return Ok(());
    }

    let spinner = create_spinner(&format!("Computing VIF for {} features...", features.width()));
    let scores = compute_vif_scores(&features).context("Failed to compute VIF scores")?;
    let flagged = high_vif_features(&scores, threshold);
    if flagged.is_empty() {
        finish_with_success(&spinner, "All features are within the VIF threshold");
    } else {
        finish_with_warning(
            &spinner,
            &format!("{} feature(s) above VIF {:.2}", flagged.len(), threshold),
        );
    }

    display_vif_scores(&scores, threshold);
    println!();

    Ok(())
}
