//! Shared test utilities and fixture generators
#![allow(dead_code)]

use polars::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

/// Three features with known VIFs (computed independently):
/// - `x`: 46.41, `y`: 39.53, `z`: 5.50
///
/// After removing `x`, both `y` and `z` sit at 1.0083.
pub fn create_collinear_dataframe() -> DataFrame {
    df! {
        "x" => [1.0f64, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0],
        "y" => [2.0f64, 1.0, 4.0, 3.0, 6.0, 5.0, 8.0, 7.0, 10.0, 9.0],
        "z" => [3.0f64, 7.0, 1.0, 9.0, 2.0, 8.0, 4.0, 6.0, 5.0, 10.0],
    }
    .unwrap()
}

/// Same features as [`create_collinear_dataframe`] plus a binary target and an id
pub fn create_dataset_with_target() -> DataFrame {
    df! {
        "id" => ["r0", "r1", "r2", "r3", "r4", "r5", "r6", "r7", "r8", "r9"],
        "target" => [0i32, 1, 0, 1, 0, 1, 0, 1, 0, 1],
        "x" => [1.0f64, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0],
        "y" => [2.0f64, 1.0, 4.0, 3.0, 6.0, 5.0, 8.0, 7.0, 10.0, 9.0],
        "z" => [3.0f64, 7.0, 1.0, 9.0, 2.0, 8.0, 4.0, 6.0, 5.0, 10.0],
    }
    .unwrap()
}

/// Exactly collinear columns:
/// - `b = 2 * a`, `c = 11 - a` (both exact linear functions of `a`)
/// - `d`: unrelated noise
pub fn create_exact_collinear_dataframe() -> DataFrame {
    df! {
        "a" => [1.0f64, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0],
        "b" => [2.0f64, 4.0, 6.0, 8.0, 10.0, 12.0, 14.0, 16.0, 18.0, 20.0],
        "c" => [10.0f64, 9.0, 8.0, 7.0, 6.0, 5.0, 4.0, 3.0, 2.0, 1.0],
        "d" => [5.0f64, 1.0, 8.0, 2.0, 9.0, 3.0, 7.0, 4.0, 6.0, 0.0],
    }
    .unwrap()
}

/// Random, mostly independent features with a few injected near-duplicates
pub fn create_random_dataframe(rows: usize, cols: usize, seed: u64) -> DataFrame {
    use rand::{Rng, SeedableRng};
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);

    let mut data: Vec<Vec<f64>> = Vec::with_capacity(cols);
    for i in 0..cols {
        let values: Vec<f64> = if i % 4 == 3 {
            // Noisy copy of an earlier column
            data[i - 3]
                .iter()
                .map(|v| v + rng.gen::<f64>() * 0.1)
                .collect()
        } else {
            (0..rows).map(|_| rng.gen::<f64>() * 100.0).collect()
        };
        data.push(values);
    }

    let columns: Vec<Column> = data
        .into_iter()
        .enumerate()
        .map(|(i, values)| Column::new(format!("feature_{}", i).into(), values))
        .collect();

    DataFrame::new(columns).unwrap()
}

/// Create a temporary directory with a test CSV file
pub fn create_temp_csv(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("test_data.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    CsvWriter::new(&mut file).finish(df).unwrap();

    (temp_dir, csv_path)
}

/// Create a temporary directory with a test Parquet file
pub fn create_temp_parquet(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let parquet_path = temp_dir.path().join("test_data.parquet");

    let file = std::fs::File::create(&parquet_path).unwrap();
    ParquetWriter::new(file).finish(df).unwrap();

    (temp_dir, parquet_path)
}

/// Column names of a DataFrame as owned strings
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names().iter().map(|s| s.to_string()).collect()
}

/// Assert that a DataFrame has expected shape
pub fn assert_shape(df: &DataFrame, expected_rows: usize, expected_cols: usize) {
    let (rows, cols) = df.shape();
    assert_eq!(rows, expected_rows, "Row count mismatch: expected {}, got {}", expected_rows, rows);
    assert_eq!(cols, expected_cols, "Column count mismatch: expected {}, got {}", expected_cols, cols);
}

/// Assert that a DataFrame contains specific columns
pub fn assert_has_columns(df: &DataFrame, expected_cols: &[&str]) {
    let actual_cols = column_names(df);
    for col in expected_cols {
        assert!(
            actual_cols.contains(&col.to_string()),
            "Missing expected column: '{}'. Actual columns: {:?}",
            col,
            actual_cols
        );
    }
}

/// Assert that a DataFrame does NOT contain specific columns
pub fn assert_missing_columns(df: &DataFrame, unexpected_cols: &[&str]) {
    let actual_cols = column_names(df);
    for col in unexpected_cols {
        assert!(
            !actual_cols.contains(&col.to_string()),
            "Unexpected column still present: '{}'",
            col
        );
    }
}
