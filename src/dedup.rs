//! Deduplication
//!
//! Remembers which identity keys have already been accepted so that a ledger
//! row exported twice, or by two inventory systems, is only counted once.
//!
//! The set is not synchronized on its own. It lives inside
//! [`crate::aggregator::Aggregator`] and is only touched while the aggregator
//! lock is held, which keeps the "seen?" check and the counter update a single
//! atomic step.
//!
//! Which columns make up the key is chosen with
//! [`crate::models::IdentityStrategy`].

use crate::models::IdentityKey;
use std::collections::HashSet;

#[derive(Debug, Default)]
pub struct Deduplicator {
    seen: HashSet<IdentityKey>,
}

impl Deduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seen(&self, key: &IdentityKey) -> bool {
        self.seen.contains(key)
    }

    pub fn mark_seen(&mut self, key: IdentityKey) {
        self.seen.insert(key);
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
