//! Shared aggregation state
//!
//! [`Aggregator`] is the single owner of everything workers mutate: the
//! [`Deduplicator`], the [`DemandCounter`] and the running total. All of it
//! sits behind one mutex so the duplicate check, the surplus check and the
//! total increment happen as one step. Workers borrow the aggregator; nothing
//! here is global, so tests build as many isolated instances as they need.

use crate::dedup::Deduplicator;
use crate::demand::{Demand, DemandCounter};
use crate::models::{AggregateSummary, IdentityStrategy, Record};
use parking_lot::Mutex;
use tracing::trace;

/// Result of folding one record into the aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbsorbOutcome {
    Opened,
    Matched,
    Duplicate,
    Ignored,
}

#[derive(Debug, Default)]
struct AggregateState {
    dedup: Deduplicator,
    demand: DemandCounter,
    absorbed: u64,
    duplicates: u64,
}

#[derive(Debug)]
pub struct Aggregator {
    identity: IdentityStrategy,
    state: Mutex<AggregateState>,
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new(IdentityStrategy::default())
    }
}

impl Aggregator {
    pub fn new(identity: IdentityStrategy) -> Self {
        Self {
            identity,
            state: Mutex::new(AggregateState::default()),
        }
    }

    pub fn identity(&self) -> IdentityStrategy {
        self.identity
    }

    /// Fold a record into the shared state.
    ///
    /// Callers filter by application id beforehand. Records that are neither
    /// desktop nor laptop are ignored without being remembered, so they can
    /// never shadow a later countable record with the same identity.
    pub fn absorb(&self, record: &Record) -> AbsorbOutcome {
        if !record.device_type.is_countable() {
            return AbsorbOutcome::Ignored;
        }

        let key = self.identity.key_for(record);
        let mut state = self.state.lock();

        if state.dedup.seen(&key) {
            state.duplicates += 1;
            trace!(device_id = %record.device_id, user_id = %record.user_id, "Dropping duplicate record");
            return AbsorbOutcome::Duplicate;
        }
        state.dedup.mark_seen(key);
        state.absorbed += 1;

        match state
            .demand
            .absorb(&record.user_id, &record.app_id, record.device_type)
        {
            Demand::Opened => AbsorbOutcome::Opened,
            Demand::Matched => AbsorbOutcome::Matched,
            Demand::Ignored => AbsorbOutcome::Ignored,
        }
    }

    /// Copies required so far. Final once every producer has finished.
    pub fn result(&self) -> u64 {
        self.state.lock().demand.total()
    }

    pub fn summary(&self) -> AggregateSummary {
        let state = self.state.lock();
        AggregateSummary {
            total: state.demand.total(),
            absorbed: state.absorbed,
            duplicates: state.duplicates,
            demand_keys: state.demand.demand_keys(),
        }
    }
}
