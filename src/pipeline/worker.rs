//! Queue consumers.
//!
//! A [`Worker`] drains parsed chunks from the bounded queue until every
//! producer has dropped its sender, absorbing records of the target
//! application into the shared [`Aggregator`].

use crate::aggregator::{AbsorbOutcome, Aggregator};
use crate::models::Record;
use crossbeam_channel::Receiver;
use tracing::{debug, trace};

/// Per-worker counters, reported once the queue is closed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerStats {
    pub chunks: usize,
    pub records: u64,
    pub absorbed: u64,
    pub skipped: u64,
}

pub struct Worker<'a> {
    id: usize,
    application_id: &'a str,
    aggregator: &'a Aggregator,
}

impl<'a> Worker<'a> {
    pub fn new(id: usize, application_id: &'a str, aggregator: &'a Aggregator) -> Self {
        Self {
            id,
            application_id,
            aggregator,
        }
    }

    /// Consume chunks until the queue is closed and empty.
    pub fn drain(&self, queue: Receiver<Vec<Record>>) -> WorkerStats {
        let mut stats = WorkerStats::default();

        for chunk in queue.iter() {
            stats.chunks += 1;
            for record in &chunk {
                stats.records += 1;
                if self.process(record) {
                    stats.absorbed += 1;
                } else {
                    stats.skipped += 1;
                }
            }
        }

        debug!(
            worker = self.id,
            chunks = stats.chunks,
            records = stats.records,
            absorbed = stats.absorbed,
            "Worker finished"
        );
        stats
    }

    /// Returns `true` when the record was handed to the aggregator.
    fn process(&self, record: &Record) -> bool {
        if record.app_id != self.application_id || !record.device_type.is_countable() {
            return false;
        }

        let outcome = self.aggregator.absorb(record);
        trace!(
            worker = self.id,
            device_id = %record.device_id,
            device_type = %record.device_type,
            outcome = ?outcome,
            "Absorbed record"
        );
        outcome != AbsorbOutcome::Ignored
    }
}
