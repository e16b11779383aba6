//! Command-line argument definitions using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::pipeline::DEFAULT_VIF_THRESHOLD;

/// vifr - Remove multicollinear features using iterative VIF elimination
#[derive(Parser, Debug)]
#[command(name = "vifr")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Input file path (CSV or Parquet)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output file path (CSV or Parquet, determined by extension).
    /// Defaults to input directory with '_reduced' suffix (e.g., data.csv → data_reduced.csv).
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// VIF threshold - features with VIF above this value are removed one at a time
    #[arg(long, default_value_t = DEFAULT_VIF_THRESHOLD, value_parser = validate_threshold)]
    pub threshold: f64,

    /// Columns kept in the output but left out of the VIF analysis (comma-separated).
    /// Use for the target, identifiers, or non-numeric columns.
    #[arg(short = 'x', long, value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// Columns to drop before processing (comma-separated).
    /// These columns are removed from the dataset and do not appear in the output.
    #[arg(long, value_delimiter = ',')]
    pub drop_columns: Vec<String>,

    /// Write the removal log and final VIF scores to this JSON file
    #[arg(long)]
    pub export_json: Option<PathBuf>,

    /// Skip interactive confirmation prompts
    #[arg(long, default_value = "false")]
    pub no_confirm: bool,

    /// Number of rows to use for schema inference (CSV only).
    /// Use 0 for full table scan (very slow for large files).
    #[arg(long, default_value = "10000")]
    pub infer_schema_length: usize,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the VIF of every feature without removing anything
    Score {
        /// Input file path (CSV or Parquet)
        input: PathBuf,

        /// Columns left out of the VIF analysis (comma-separated)
        #[arg(short = 'x', long, value_delimiter = ',')]
        exclude: Vec<String>,

        /// Highlight features with VIF above this value
        #[arg(long, default_value_t = DEFAULT_VIF_THRESHOLD, value_parser = validate_threshold)]
        threshold: f64,

        /// Number of rows to use for schema inference (CSV only).
        #[arg(long, default_value = "10000")]
        infer_schema_length: usize,
    },
}

impl Cli {
    pub fn input(&self) -> Option<&PathBuf> {
        self.input.as_ref()
    }

    /// Get the output path, deriving from input if not explicitly provided.
    /// The derived path will be in the same directory as the input with a '_reduced' suffix.
    pub fn output_path(&self) -> Option<PathBuf> {
        let input = self.input.as_ref()?;
        Some(self.output.clone().unwrap_or_else(|| {
            let parent = input.parent().unwrap_or_else(|| std::path::Path::new("."));
            let stem = input
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("output");
            let extension = input
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("parquet");
            parent.join(format!("{}_reduced.{}", stem, extension))
        }))
    }
}

/// Validator for the VIF threshold
fn validate_threshold(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if !value.is_finite() || value <= 0.0 {
        Err(format!(
            "threshold must be a finite number greater than 0, got {}",
            value
        ))
    } else {
        Ok(value)
    }
}
