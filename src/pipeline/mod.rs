//! Ingestion Pipeline
//!
//! Wires the partitioner, the bounded chunk queue, the worker pool and the
//! shared [`Aggregator`] together and blocks until every row has been
//! absorbed.
//!
//! ## Flow
//!
//! ```text
//! rows ─► partition(n) ─► parse (rayon) ─► bounded queue ─► workers (m) ─► Aggregator
//! ```
//!
//! 1. Workers are started first as scoped threads, each holding a clone of the
//!    queue receiver.
//! 2. Every partition is parsed into `Vec<Record>` on the rayon pool and sent
//!    to the queue; senders block while the queue is full.
//! 3. Once every partition is submitted all senders are dropped, which closes
//!    the queue.
//! 4. Workers drain what is left and exit; the coordinator joins them and
//!    reads the total.
//!
//! The total does not depend on how rows are split or interleaved, see
//! [`crate::demand`].

pub mod partition;
pub mod worker;

pub use partition::partition;
pub use worker::{Worker, WorkerStats};

use crate::aggregator::Aggregator;
use crate::models::{AggregateSummary, IdentityStrategy, RawRow, Record};
use anyhow::{anyhow, bail, Result};
use crossbeam_channel::bounded;
use rayon::prelude::*;
use std::thread::{self, ScopedJoinHandle};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOptions {
    pub application_id: String,
    pub worker_count: usize,
    pub partition_count: usize,
    pub queue_capacity: usize,
    pub identity: IdentityStrategy,
}

impl PipelineOptions {
    pub fn new(application_id: impl Into<String>) -> Self {
        Self {
            application_id: application_id.into(),
            ..Self::default()
        }
    }

    pub fn with_workers(mut self, worker_count: usize) -> Self {
        self.worker_count = worker_count;
        self
    }

    pub fn with_partitions(mut self, partition_count: usize) -> Self {
        self.partition_count = partition_count;
        self
    }

    pub fn with_queue_capacity(mut self, queue_capacity: usize) -> Self {
        self.queue_capacity = queue_capacity;
        self
    }

    pub fn with_identity(mut self, identity: IdentityStrategy) -> Self {
        self.identity = identity;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.application_id.is_empty() {
            bail!("Application id must not be empty");
        }
        if self.worker_count == 0 {
            bail!("Worker count must be greater than 0");
        }
        if self.partition_count == 0 {
            bail!("Partition count must be greater than 0");
        }
        if self.queue_capacity == 0 {
            bail!("Queue capacity must be greater than 0");
        }
        Ok(())
    }
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            application_id: "374".to_string(),
            worker_count: 4,
            partition_count: 4,
            queue_capacity: 4,
            identity: IdentityStrategy::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub total: u64,
    pub rows: usize,
    pub summary: AggregateSummary,
    pub workers: Vec<WorkerStats>,
}

impl PipelineOutcome {
    /// Rows that never reached the aggregator: other applications and
    /// devices that are neither desktop nor laptop.
    pub fn skipped(&self) -> u64 {
        self.workers.iter().map(|w| w.skipped).sum()
    }
}

pub struct LicensePipeline {
    options: PipelineOptions,
}

impl LicensePipeline {
    pub fn new(options: PipelineOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self { options })
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Run every row through the pipeline and return the number of copies
    /// required for the configured application.
    pub fn run(&self, rows: &[RawRow]) -> Result<PipelineOutcome> {
        let options = &self.options;
        let aggregator = Aggregator::new(options.identity);
        let (sender, receiver) = bounded::<Vec<Record>>(options.queue_capacity);
        let partitions = partition(rows, options.partition_count);

        info!(
            rows = rows.len(),
            workers = options.worker_count,
            partitions = partitions.len(),
            application_id = %options.application_id,
            identity = %options.identity,
            "Starting license pipeline"
        );

        let workers = thread::scope(|scope| -> Result<Vec<WorkerStats>> {
            let handles: Vec<_> = (0..options.worker_count)
                .map(|id| {
                    let queue = receiver.clone();
                    let worker = Worker::new(id, &options.application_id, &aggregator);
                    scope.spawn(move || worker.drain(queue))
                })
                .collect();
            drop(receiver);

            partitions
                .par_iter()
                .enumerate()
                .for_each_with(sender, |sender, (idx, chunk_rows)| {
                    let chunk: Vec<Record> = chunk_rows
                        .iter()
                        .map(|row| Record::from_fields(row.as_slice()))
                        .collect();
                    debug!(partition = idx, records = chunk.len(), "Submitting partition");
                    if sender.send(chunk).is_err() {
                        warn!(partition = idx, "Queue closed before partition was submitted");
                    }
                });

            join_workers(handles)
        })?;

        let summary = aggregator.summary();
        let total = aggregator.result();

        info!(
            total,
            absorbed = summary.absorbed,
            duplicates = summary.duplicates,
            demand_keys = summary.demand_keys,
            "License pipeline finished"
        );

        Ok(PipelineOutcome {
            total,
            rows: rows.len(),
            summary,
            workers,
        })
    }
}

/// Join every worker before reporting, so a second panicking worker is not
/// left for the scope to re-raise.
fn join_workers<T>(handles: Vec<ScopedJoinHandle<'_, T>>) -> Result<Vec<T>> {
    let joined: Vec<_> = handles.into_iter().map(|handle| handle.join()).collect();
    joined
        .into_iter()
        .enumerate()
        .map(|(id, joined)| {
            joined.map_err(|_| anyhow!("Worker {} panicked while draining the queue", id))
        })
        .collect()
}
