//! Report output
//!
//! Renders a [`LicenseReport`] in one of three forms: a coloured summary line
//! for people, JSON for scripts, or just the number of copies.

use crate::models::LicenseReport;
use anyhow::{Context, Result};
use colored::Colorize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Count,
}

#[derive(Debug, Default)]
pub struct ReportDisplayManager {
    json_pretty: bool,
}

impl ReportDisplayManager {
    pub fn new(json_pretty: bool) -> Self {
        Self { json_pretty }
    }

    pub fn render(&self, report: &LicenseReport, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Count => Ok(report.copies_required.to_string()),
            OutputFormat::Json => {
                let json = if self.json_pretty {
                    serde_json::to_string_pretty(report)
                } else {
                    serde_json::to_string(report)
                };
                json.context("Failed to serialize license report")
            }
            OutputFormat::Text => Ok(self.render_text(report)),
        }
    }

    pub fn display(&self, report: &LicenseReport, format: OutputFormat) -> Result<()> {
        println!("{}", self.render(report, format)?);
        Ok(())
    }

    fn render_text(&self, report: &LicenseReport) -> String {
        let mut out = format!(
            "{} {} required for application {} ({})",
            report.copies_required.to_string().bold().green(),
            if report.copies_required == 1 { "copy" } else { "copies" },
            report.application_id.bold(),
            report.input
        );

        out.push_str(&format!(
            "\n  {} rows read, {} absorbed, {} duplicates dropped, {} skipped, {} users",
            report.rows_read,
            report.records_absorbed,
            report.duplicates_dropped,
            report.records_skipped,
            report.demand_keys
        ));
        out.push_str(&format!(
            "\n  {} workers over {} partitions, {} identity, {} ms",
            report.workers, report.partitions, report.identity, report.elapsed_ms
        ));

        out
    }
}
