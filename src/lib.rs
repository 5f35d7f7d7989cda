//! License Calculator Library
//!
//! Computes the minimum number of copies of an application a company has to
//! purchase, given a ledger of installations exported by inventory tools. One
//! copy covers a desktop and a laptop used by the same person; every other
//! device needs a copy of its own.
//!
//! ## Core Features
//!
//! - **Parallel ingestion**: rows are split into partitions, parsed on a rayon
//!   pool and fed through a bounded queue to a fixed pool of workers
//! - **Deduplication**: repeated rows from overlapping exports are counted once
//! - **Online matching**: each record updates the result in constant time and
//!   the final count does not depend on arrival order
//! - **Flexible output**: a human summary, JSON, or just the number
//!
//! ## Architecture Overview
//!
//! - [`models`] - Records, keys and the final report
//! - [`dedup`] - Set of identity keys already accepted
//! - [`demand`] - Per-user desktop/laptop matching
//! - [`aggregator`] - Lock-protected owner of the shared state
//! - [`pipeline`] - Partitioner, worker pool and coordinator
//! - [`parser`] - CSV and in-memory record sources
//! - [`analyzer`] - End-to-end entry point used by the binary
//! - [`reports`] - Output formatting
//! - [`config`] - Layered configuration
//! - [`logging`] - Structured logging setup
//!
//! ## Main Entry Point
//!
//! ```rust
//! use license_calc::pipeline::{LicensePipeline, PipelineOptions};
//!
//! # fn example() -> anyhow::Result<()> {
//! let rows: Vec<Vec<String>> = vec![
//!     vec!["1".into(), "1".into(), "374".into(), "DESKTOP".into(), "".into()],
//!     vec!["2".into(), "1".into(), "374".into(), "LAPTOP".into(), "".into()],
//! ];
//!
//! let pipeline = LicensePipeline::new(PipelineOptions::new("374").with_workers(2))?;
//! assert_eq!(pipeline.run(&rows)?.total, 1);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod aggregator;
pub mod analyzer;
pub mod config;
pub mod dedup;
pub mod demand;
pub mod logging;
pub mod models;
pub mod parser;
pub mod pipeline;
pub mod reports;

pub use aggregator::Aggregator;
pub use analyzer::LicenseAnalyzer;
pub use models::*;
pub use pipeline::{LicensePipeline, PipelineOptions};
