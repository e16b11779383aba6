//! Tests for dataset loading and saving

use polars::prelude::*;
use std::io::Write;
use tempfile::TempDir;
use vif_reducer::pipeline::{
    ensure_columns_exist, load_dataset_with_progress, save_dataset, FileFormat,
};

#[path = "common/mod.rs"]
mod common;

#[test]
fn test_load_csv_file() {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("test.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    writeln!(file, "a,b,c").unwrap();
    writeln!(file, "1,2,3").unwrap();
    writeln!(file, "4,5,6").unwrap();
    drop(file);

    let (df, rows, cols, mem_mb) = load_dataset_with_progress(&csv_path, 100).unwrap();

    assert_eq!(rows, 2, "Should have 2 data rows");
    assert_eq!(cols, 3, "Should have 3 columns");
    assert_eq!(common::column_names(&df), vec!["a", "b", "c"]);
    assert!(mem_mb >= 0.0, "Memory estimate should be non-negative");
}

#[test]
fn test_load_parquet_file() {
    let mut df = common::create_collinear_dataframe();
    let (_temp_dir, parquet_path) = common::create_temp_parquet(&mut df);

    let (loaded_df, rows, cols, _mem) = load_dataset_with_progress(&parquet_path, 100).unwrap();

    assert_eq!(rows, 10);
    assert_eq!(cols, 3);
    assert!(loaded_df.equals(&df));
}

#[test]
fn test_unsupported_format() {
    let temp_dir = TempDir::new().unwrap();
    let bad_path = temp_dir.path().join("test.xlsx");
    std::fs::File::create(&bad_path).unwrap();

    let result = load_dataset_with_progress(&bad_path, 100);

    assert!(result.is_err(), "Unsupported format should return error");
    let err_msg = result.unwrap_err().to_string();
    assert!(
        err_msg.contains("Unsupported"),
        "Error message should mention unsupported format: {}",
        err_msg
    );
}

#[test]
fn test_file_format_from_extension_is_case_insensitive() {
    assert_eq!(
        FileFormat::from_path(std::path::Path::new("DATA.CSV")).unwrap(),
        FileFormat::Csv
    );
    assert_eq!(
        FileFormat::from_path(std::path::Path::new("x/y.Parquet")).unwrap(),
        FileFormat::Parquet
    );
    assert!(FileFormat::from_path(std::path::Path::new("no_extension")).is_err());
}

#[test]
fn test_nonexistent_file() {
    let path = std::path::Path::new("/nonexistent/path/to/file.csv");

    let result = load_dataset_with_progress(path, 100);

    assert!(result.is_err(), "Nonexistent file should return error");
}

#[test]
fn test_csv_with_missing_values_loads_as_nulls() {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("missing.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    writeln!(file, "a,b,c").unwrap();
    writeln!(file, "1,,3").unwrap();
    writeln!(file, ",2,").unwrap();
    writeln!(file, "4,5,6").unwrap();
    drop(file);

    let (df, rows, cols, _) = load_dataset_with_progress(&csv_path, 100).unwrap();

    assert_eq!(rows, 3);
    assert_eq!(cols, 3);

    let null_counts: Vec<usize> = df.get_columns().iter().map(|c| c.null_count()).collect();
    assert_eq!(null_counts, vec![1, 1, 1]);
}

#[test]
fn test_save_csv_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let out_path = temp_dir.path().join("reduced.csv");
    let mut df = common::create_collinear_dataframe();

    save_dataset(&mut df, &out_path).unwrap();
    let (loaded, rows, cols, _) = load_dataset_with_progress(&out_path, 100).unwrap();

    assert_eq!((rows, cols), (10, 3));
    assert_eq!(common::column_names(&loaded), vec!["x", "y", "z"]);
}

#[test]
fn test_save_parquet_preserves_types() {
    let temp_dir = TempDir::new().unwrap();
    let out_path = temp_dir.path().join("reduced.parquet");
    let mut df = common::create_dataset_with_target();

    save_dataset(&mut df, &out_path).unwrap();
    let (loaded, _, _, _) = load_dataset_with_progress(&out_path, 100).unwrap();

    assert!(loaded.equals(&df));
    assert_eq!(loaded.column("target").unwrap().dtype(), &DataType::Int32);
}

#[test]
fn test_save_unsupported_format() {
    let temp_dir = TempDir::new().unwrap();
    let out_path = temp_dir.path().join("reduced.json");
    let mut df = common::create_collinear_dataframe();

    assert!(save_dataset(&mut df, &out_path).is_err());
    assert!(!out_path.exists(), "Nothing should be written for unsupported formats");
}

#[test]
fn test_ensure_columns_exist() {
    let df = common::create_dataset_with_target();

    assert!(ensure_columns_exist(&df, &["id".to_string(), "target".to_string()], "Excluded").is_ok());
    assert!(ensure_columns_exist(&df, &[], "Drop").is_ok());

    let err = ensure_columns_exist(&df, &["missing".to_string()], "Excluded").unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("Excluded"), "{}", msg);
    assert!(msg.contains("missing"), "{}", msg);
}

#[test]
fn test_schema_inference_length() {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("inference.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    writeln!(file, "tricky_col").unwrap();
    for i in 0..100 {
        writeln!(file, "{}", i).unwrap();
    }
    drop(file);

    let (df_short, _, _, _) = load_dataset_with_progress(&csv_path, 10).unwrap();
    let (df_full, _, _, _) = load_dataset_with_progress(&csv_path, 0).unwrap();

    assert_eq!(df_short.height(), 100);
    assert_eq!(df_full.height(), 100);
}
