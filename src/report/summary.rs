//! Reduction summary report generation

use std::time::Duration;

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;

use crate::pipeline::{StopReason, VifRemoval, VifScore};
use crate::utils::{format_duration, format_vif};

/// Summary of the feature reduction process
#[derive(Debug, Default)]
pub struct ReductionSummary {
    pub initial_features: usize,
    pub final_features: usize,
    pub dropped_manual: Vec<String>,
    pub dropped_vif: Vec<VifRemoval>,
    pub excluded: Vec<String>,
    pub stop_reason: Option<StopReason>,
    pub load_time: Option<Duration>,
    pub vif_time: Option<Duration>,
    pub save_time: Option<Duration>,
}

impl ReductionSummary {
    pub fn new(initial_features: usize) -> Self {
        Self {
            initial_features,
            final_features: initial_features,
            ..Default::default()
        }
    }

    pub fn add_manual_drops(&mut self, features: Vec<String>) {
        self.final_features -= features.len();
        self.dropped_manual = features;
    }

    pub fn add_vif_drops(&mut self, removals: Vec<VifRemoval>) {
        self.final_features -= removals.len();
        self.dropped_vif = removals;
    }

    pub fn set_excluded(&mut self, excluded: Vec<String>) {
        self.excluded = excluded;
    }

    pub fn set_stop_reason(&mut self, reason: StopReason) {
        self.stop_reason = Some(reason);
    }

    pub fn set_load_time(&mut self, elapsed: Duration) {
        self.load_time = Some(elapsed);
    }

    pub fn set_vif_time(&mut self, elapsed: Duration) {
        self.vif_time = Some(elapsed);
    }

    pub fn set_save_time(&mut self, elapsed: Duration) {
        self.save_time = Some(elapsed);
    }

    /// Percentage of the initial columns that were removed
    pub fn reduction_pct(&self) -> f64 {
        if self.initial_features > 0 {
            ((self.initial_features - self.final_features) as f64 / self.initial_features as f64)
                * 100.0
        } else {
            0.0
        }
    }

    pub fn display(&self) {
        println!();
        println!(
            "    {} {}",
            style("📋").cyan(),
            style("REDUCTION SUMMARY").white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());
        println!();

        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Metric").add_attribute(Attribute::Bold),
            Cell::new("Value").add_attribute(Attribute::Bold),
        ]);

        table.add_row(vec![
            Cell::new("📁 Initial Features"),
            Cell::new(self.initial_features),
        ]);

        if !self.excluded.is_empty() {
            table.add_row(vec![
                Cell::new("🛡️  Excluded (kept as-is)"),
                Cell::new(self.excluded.len()).fg(Color::Cyan),
            ]);
        }

        table.add_row(vec![
            Cell::new("✂️  Dropped (Manual)"),
            Cell::new(self.dropped_manual.len()).fg(count_color(self.dropped_manual.len())),
        ]);

        table.add_row(vec![
            Cell::new("🔗 Dropped (VIF)"),
            Cell::new(self.dropped_vif.len()).fg(count_color(self.dropped_vif.len())),
        ]);

        table.add_row(vec![
            Cell::new("✅ Final Features"),
            Cell::new(self.final_features)
                .fg(Color::Green)
                .add_attribute(Attribute::Bold),
        ]);

        let reduction_pct = self.reduction_pct();
        let color = if reduction_pct > 30.0 {
            Color::Green
        } else if reduction_pct > 10.0 {
            Color::Yellow
        } else {
            Color::Cyan
        };

        table.add_row(vec![
            Cell::new("📉 Reduction"),
            Cell::new(format!("{:.1}%", reduction_pct))
                .fg(color)
                .add_attribute(Attribute::Bold),
        ]);

        if let Some(reason) = self.stop_reason {
            table.add_row(vec![Cell::new("🏁 Stopped"), Cell::new(reason.to_string())]);
        }

        let total_time: Duration = [self.load_time, self.vif_time, self.save_time]
            .iter()
            .flatten()
            .sum();
        if total_time > Duration::ZERO {
            table.add_row(vec![
                Cell::new("⏱  Total Time"),
                Cell::new(format_duration(total_time)),
            ]);
        }

        // Indent the table
        for line in table.to_string().lines() {
            println!("    {}", line);
        }

        if !self.dropped_manual.is_empty() || !self.dropped_vif.is_empty() {
            println!();
            println!(
                "    {} {}",
                style("📝").cyan(),
                style("DROPPED FEATURES").white().bold()
            );
            println!("    {}", style("─".repeat(50)).dim());

            if !self.dropped_manual.is_empty() {
                println!();
                println!(
                    "      {} {}:",
                    style("Dropped on Request").yellow(),
                    style(format!("({})", self.dropped_manual.len())).dim()
                );
                for feature in &self.dropped_manual {
                    println!("        {} {}", style("•").dim(), feature);
                }
            }

            if !self.dropped_vif.is_empty() {
                println!();
                println!(
                    "      {} {}:",
                    style("High VIF (in removal order)").yellow(),
                    style(format!("({})", self.dropped_vif.len())).dim()
                );
                for (idx, removal) in self.dropped_vif.iter().enumerate() {
                    println!(
                        "        {} {} {}",
                        style(format!("{:>2}.", idx + 1)).dim(),
                        removal.feature,
                        style(format!("(VIF {})", format_vif(removal.vif))).dim()
                    );
                }
            }
        }
    }
}

/// Render a VIF score table, highlighting scores above the threshold
pub fn display_vif_scores(scores: &[VifScore], threshold: f64) {
    println!();
    println!(
        "    {} {}",
        style("📊").cyan(),
        style("VARIANCE INFLATION FACTORS").white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
    println!();

    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec![
        Cell::new("Feature").add_attribute(Attribute::Bold),
        Cell::new("VIF").add_attribute(Attribute::Bold),
        Cell::new("Status").add_attribute(Attribute::Bold),
    ]);

    for score in scores {
        let (status, color) = if !score.is_defined() {
            ("undefined", Color::DarkGrey)
        } else if score.vif > threshold {
            ("high", Color::Red)
        } else {
            ("ok", Color::Green)
        };
        table.add_row(vec![
            Cell::new(&score.feature),
            Cell::new(format_vif(score.vif)).fg(color),
            Cell::new(status).fg(color),
        ]);
    }

    for line in table.to_string().lines() {
        println!("    {}", line);
    }
}

fn count_color(count: usize) -> Color {
    if count == 0 {
        Color::White
    } else {
        Color::Red
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_tracks_final_feature_count() {
        let mut summary = ReductionSummary::new(10);
        summary.add_manual_drops(vec!["id".to_string()]);
        summary.add_vif_drops(vec![
            VifRemoval {
                feature: "a".to_string(),
                vif: f64::INFINITY,
            },
            VifRemoval {
                feature: "b".to_string(),
                vif: 12.5,
            },
        ]);

        assert_eq!(summary.final_features, 7);
        assert!((summary.reduction_pct() - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_summary_has_no_reduction() {
        let summary = ReductionSummary::new(0);
        assert_eq!(summary.reduction_pct(), 0.0);
    }
}
