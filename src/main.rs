//! vifr: Multicollinearity Reduction CLI Tool
//!
//! A command-line tool for removing features whose Variance Inflation
//! Factor exceeds a threshold, one feature per iteration.

use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;

use vif_reducer::cli::{confirm_overwrite, confirm_vif_removals, score::run_score, Cli, Commands};
use vif_reducer::pipeline::{
    compute_vif_scores, ensure_columns_exist, load_dataset_with_progress,
    reduce_vif_with_progress, save_dataset, StopReason, VifEvent,
};
use vif_reducer::report::{export_vif_analysis, ExportParams, ReductionSummary};
use vif_reducer::utils::{
    create_spinner, finish_with_success, format_vif, print_banner, print_completion, print_config,
    print_count, print_info, print_step_header, print_step_time, print_success, print_warning,
};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Handle subcommands
    if let Some(command) = &cli.command {
        return match command {
            Commands::Score {
                input,
                exclude,
                threshold,
                infer_schema_length,
            } => run_score(input, exclude, *threshold, *infer_schema_length),
        };
    }

    // Main reduce pipeline - require input
    let input = cli.input().ok_or_else(|| {
        anyhow::anyhow!("Input file is required. Use -i/--input to specify a file.")
    })?;
    let output_path = cli
        .output_path()
        .ok_or_else(|| anyhow::anyhow!("Could not derive an output path from the input"))?;
    let threshold = cli.threshold;

    if output_path.exists() && !cli.no_confirm && !confirm_overwrite(&output_path)? {
        println!("Cancelled by user.");
        return Ok(());
    }

    print_banner(env!("CARGO_PKG_VERSION"));
    print_config(input, &output_path, threshold, &cli.exclude);

    // Step 1: Load dataset
    print_step_header(1, "Load Dataset");
    let step_start = Instant::now();
    let (mut df, rows, cols, memory_mb) = load_dataset_with_progress(input, cli.infer_schema_length)?;

    println!("\n    {} Dataset Statistics:", style("✧").cyan());
    println!("      Rows: {}", rows);
    println!("      Columns: {}", cols);
    println!("      Estimated memory: {:.2} MB", memory_mb);

    let mut summary = ReductionSummary::new(cols);

    ensure_columns_exist(&df, &cli.drop_columns, "Drop")?;
    ensure_columns_exist(&df, &cli.exclude, "Excluded")?;

    if !cli.drop_columns.is_empty() {
        df = df.drop_many(&cli.drop_columns);
        print_success(&format!(
            "Dropped {} column(s) on request",
            cli.drop_columns.len()
        ));
        summary.add_manual_drops(cli.drop_columns.clone());
    }
    summary.set_excluded(cli.exclude.clone());

    let load_elapsed = step_start.elapsed();
    summary.set_load_time(load_elapsed);
    print_step_time(load_elapsed);

    // Step 2: Iterative VIF reduction over the non-excluded columns
    print_step_header(2, "VIF Reduction");
    let step_start = Instant::now();

    let features = df.drop_many(&cli.exclude);
    print_info(&format!(
        "Analyzing {} feature(s) at VIF threshold {:.2}",
        features.width(),
        threshold
    ));

    let mut reduction = reduce_vif_with_progress(&features, threshold, |event| match event {
        VifEvent::Removed {
            iteration,
            feature,
            vif,
            remaining,
        } => println!(
            "      {} Removed {} {} {}",
            style(format!("[{:>3}]", iteration)).dim(),
            style(feature).yellow(),
            style(format!("(VIF {})", format_vif(*vif))).red(),
            style(format!("{} left", remaining)).dim()
        ),
        VifEvent::Stopped { max, .. } => {
            if let Some(max) = max {
                println!(
                    "      {} Highest remaining VIF: {} {}",
                    style("→").dim(),
                    max.feature,
                    style(format!("({})", format_vif(max.vif))).green()
                );
            }
        }
    })
    .with_context(|| format!("VIF reduction failed for {}", input.display()))?;

    match reduction.stop {
        StopReason::ComputationFailed => print_warning(
            "No VIF could be computed (constant or missing values?); stopped early",
        ),
        reason => print_success(&format!("Reduction finished: {}", reason)),
    }

    let mut removals_applied = true;
    if reduction.removed.is_empty() {
        print_info("No features exceed the VIF threshold");
    } else {
        print_count(
            "feature(s) with high VIF",
            reduction.removed.len(),
            Some(&format!("(>{:.2})", threshold)),
        );

        if !cli.no_confirm && !confirm_vif_removals(reduction.removed.len(), threshold)? {
            print_info("Keeping all features");
            reduction = reduction.discard_removals(features);
            removals_applied = false;
        } else {
            df = df.drop_many(&reduction.removed_features());
            print_success("Dropped features with high VIF");
        }
    }
    summary.set_stop_reason(reduction.stop);
    summary.add_vif_drops(reduction.removed.clone());

    let vif_elapsed = step_start.elapsed();
    summary.set_vif_time(vif_elapsed);
    print_step_time(vif_elapsed);

    // Step 3: Save output
    print_step_header(3, "Save Results");
    let step_start = Instant::now();

    let spinner = create_spinner("Writing output file...");
    save_dataset(&mut df, &output_path)?;
    finish_with_success(&spinner, &format!("Saved to {}", output_path.display()));

    if let Some(json_path) = &cli.export_json {
        let final_scores = compute_vif_scores(&reduction.table)
            .context("Failed to recompute VIF for the remaining features")?;
        let input_file = input.display().to_string();
        let params = ExportParams {
            input_file: &input_file,
            threshold,
            excluded_columns: &cli.exclude,
            removals_applied,
        };
        export_vif_analysis(&reduction, &final_scores, json_path, &params)?;
        print_success(&format!("VIF analysis written to {}", json_path.display()));
    }

    let save_elapsed = step_start.elapsed();
    summary.set_save_time(save_elapsed);
    print_step_time(save_elapsed);

    summary.display();
    print_completion();

    Ok(())
}
