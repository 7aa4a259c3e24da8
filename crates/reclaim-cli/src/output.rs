//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use reclaim_janitor::{JanitorMetrics, SweepOutcome, SweepReport};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format the result of `reclaim run`.
    pub fn format_outcome(&self, outcome: &SweepOutcome) -> Result<String> {
        match (outcome, self.format) {
            (SweepOutcome::Completed(report), _) => self.format_report(report),
            (SweepOutcome::Skipped, OutputFormat::Json) => {
                Ok(serde_json::to_string_pretty(&serde_json::json!({ "skipped": true }))?)
            }
            (SweepOutcome::Skipped, OutputFormat::Table) => Ok(self.info(
                "Sweep skipped by the probability check (use --force to sweep now)",
            )),
        }
    }

    /// Format a sweep or preview report.
    pub fn format_report(&self, report: &SweepReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.format_report_json(report),
            OutputFormat::Table => Ok(self.format_report_table(report)),
        }
    }

    fn format_report_json(&self, report: &SweepReport) -> Result<String> {
        let tasks: Vec<serde_json::Value> = report
            .tasks
            .iter()
            .map(|t| {
                serde_json::json!({
                    "task": t.task.name(),
                    "candidates": t.candidates,
                    "affected": t.affected,
                })
            })
            .collect();

        let value = serde_json::json!({
            "skipped": false,
            "started_at": report.started_at.to_rfc3339(),
            "dry_run": report.dry_run,
            "tasks": tasks,
            "total_candidates": report.total_candidates(),
            "total_affected": report.total_affected(),
        });

        Ok(serde_json::to_string_pretty(&value)?)
    }

    fn format_report_table(&self, report: &SweepReport) -> String {
        let mut builder = Builder::default();
        builder.push_record(["Task", "Candidates", "Affected"]);

        for task in &report.tasks {
            builder.push_record([
                task.task.name().to_string(),
                task.candidates.to_string(),
                task.affected.to_string(),
            ]);
        }
        builder.push_record([
            "total".to_string(),
            report.total_candidates().to_string(),
            report.total_affected().to_string(),
        ]);

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        let started = report.started_at.format("%Y-%m-%d %H:%M:%S UTC");
        let heading = if report.dry_run {
            self.warning(&format!("Dry run at {}: nothing was deleted", started))
        } else if report.total_affected() == 0 {
            self.info(&format!("Sweep at {}: nothing to reclaim", started))
        } else {
            self.success(&format!(
                "Sweep at {}: {} row(s) affected",
                started,
                report.total_affected()
            ))
        };

        format!("{}\n{}", heading, table)
    }

    /// Format accumulated worker metrics.
    pub fn format_metrics(&self, metrics: &JanitorMetrics) -> Result<String> {
        match self.format {
            OutputFormat::Table => Ok(metrics.summary()),
            OutputFormat::Json => {
                let mut affected = serde_json::Map::new();
                for task in reclaim_janitor::CleanupTask::sequence() {
                    if let Some(count) = metrics.affected.get(&task) {
                        affected.insert(task.name().to_string(), (*count).into());
                    }
                }
                let value = serde_json::json!({
                    "sweeps": metrics.sweep_count,
                    "skipped": metrics.skipped_count,
                    "failed": metrics.failed_count,
                    "total_runtime_ms": metrics.total_runtime_ms,
                    "affected": affected,
                    "total_affected": metrics.total_affected(),
                });
                Ok(serde_json::to_string_pretty(&value)?)
            }
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}
