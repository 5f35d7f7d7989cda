//! License Analysis Engine
//!
//! [`LicenseAnalyzer`] is the entry point used by the binary. It ties the
//! record source, the ingestion pipeline and the report output together:
//!
//! 1. **Read**: load every row from the [`RecordSource`]. Failure here is fatal
//!    and happens before any worker starts.
//! 2. **Aggregate**: run the [`LicensePipeline`] on a blocking task so the
//!    worker threads never stall the async runtime.
//! 3. **Report**: build a [`LicenseReport`] and hand it to the
//!    [`ReportDisplayManager`].
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use license_calc::analyzer::LicenseAnalyzer;
//! use license_calc::config::Config;
//! use license_calc::parser::CsvFileSource;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let analyzer = LicenseAnalyzer::new(Config::default());
//! let source = CsvFileSource::new("sample-large.csv");
//! let report = analyzer.analyze(source).await?;
//! println!("{}", report.copies_required);
//! # Ok(())
//! # }
//! ```

use crate::config::Config;
use crate::logging::run_span;
use crate::models::LicenseReport;
use crate::parser::RecordSource;
use crate::pipeline::LicensePipeline;
use crate::reports::{OutputFormat, ReportDisplayManager};
use anyhow::{Context, Result};
use chrono::Utc;
use std::time::Instant;
use tracing::{info, Instrument, Span};

pub struct LicenseAnalyzer {
    config: Config,
    display_manager: ReportDisplayManager,
}

impl Default for LicenseAnalyzer {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl LicenseAnalyzer {
    pub fn new(config: Config) -> Self {
        let display_manager = ReportDisplayManager::new(config.output.json_pretty);
        Self {
            config,
            display_manager,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub async fn analyze<S>(&self, source: S) -> Result<LicenseReport>
    where
        S: RecordSource + Send + 'static,
    {
        let pipeline_options = self.config.pipeline_options();
        let input = source.describe();
        let span = run_span(&pipeline_options.application_id, &input);

        async move {
            let pipeline = LicensePipeline::new(pipeline_options)?;
            let started = Instant::now();

            let current = Span::current();
            let (rows_read, outcome, pipeline) = tokio::task::spawn_blocking(move || {
                let _entered = current.enter();
                let rows = source.read_rows()?;
                let outcome = pipeline.run(&rows)?;
                Ok::<_, anyhow::Error>((rows.len(), outcome, pipeline))
            })
            .await
            .context("License pipeline task failed")??;

            let options = pipeline.options();
            let elapsed_ms = started.elapsed().as_millis() as u64;
            info!(
                copies_required = outcome.total,
                elapsed_ms,
                "Calculated required license copies"
            );

            Ok::<_, anyhow::Error>(LicenseReport {
                application_id: options.application_id.clone(),
                copies_required: outcome.total,
                input,
                rows_read,
                records_absorbed: outcome.summary.absorbed,
                duplicates_dropped: outcome.summary.duplicates,
                records_skipped: outcome.skipped(),
                demand_keys: outcome.summary.demand_keys,
                workers: options.worker_count,
                partitions: options.partition_count,
                identity: options.identity,
                elapsed_ms,
                generated_at: Utc::now(),
            })
        }
        .instrument(span)
        .await
    }

    /// Analyze and print the report in the requested format.
    pub async fn run_command<S>(&self, source: S, format: OutputFormat) -> Result<LicenseReport>
    where
        S: RecordSource + Send + 'static,
    {
        let report = self.analyze(source).await?;
        self.display_manager.display(&report, format)?;
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawRow;

    fn rows(data: &[[&str; 5]]) -> Vec<RawRow> {
        data.iter()
            .map(|r| r.iter().map(|f| f.to_string()).collect())
            .collect()
    }

    #[tokio::test]
    async fn test_analyze_in_memory_rows() -> Result<()> {
        let source = rows(&[
            ["1", "U1", "374", "DESKTOP", ""],
            ["2", "U1", "374", "LAPTOP", ""],
            ["3", "U1", "555", "LAPTOP", ""],
        ]);

        let report = LicenseAnalyzer::default()
            .analyze(source)
            .await?;

        assert_eq!(report.copies_required, 1);
        assert_eq!(report.rows_read, 3);
        assert_eq!(report.records_skipped, 1);
        assert_eq!(report.input, "<memory>");
        Ok(())
    }
}
