//! Per-operation modulo counters for periodic sampling.
//!
//! Layout:
//! - `operation -> Arc<CounterRecord>` in a `DashMap` (sharded, no global lock)
//! - each record guards its own count behind its own `Mutex`
//!
//! Records are created lazily on first arrival and never removed. Memory grows
//! with the number of distinct operations seen, not with request volume.

use std::sync::{Arc, Mutex, PoisonError};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

/// One operation's counter.
#[derive(Debug, Default)]
pub struct CounterRecord {
    count: Mutex<u64>,
}

impl CounterRecord {
    /// Step the counter modulo `period` (0 counts as 1) and return the new value.
    pub fn advance(&self, period: u32) -> u64 {
        let modulus = u64::from(period.max(1));
        // The count is a plain integer, so a poisoned lock still holds a valid value.
        let mut count = self.count.lock().unwrap_or_else(PoisonError::into_inner);
        *count = (*count + 1) % modulus;
        *count
    }

    /// Current count without stepping.
    pub fn current(&self) -> u64 {
        *self.count.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Concurrent store of counter records, keyed by operation identifier.
///
/// Owned explicitly by the sampler that uses it. Two samplers only share
/// counts when they are handed the same `Arc<PeriodicCounterStore>`.
#[derive(Debug, Default)]
pub struct PeriodicCounterStore {
    records: DashMap<String, Arc<CounterRecord>>,
}

impl PeriodicCounterStore {
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
        }
    }

    /// Fetch the record for `operation`, creating it on first arrival.
    ///
    /// The flag is true for exactly one caller per operation: the one whose
    /// insert won. Concurrent first arrivals all observe the same record.
    pub fn load_or_create(&self, operation: &str) -> (Arc<CounterRecord>, bool) {
        // Hot path: no key allocation once the record exists.
        if let Some(r) = self.records.get(operation) {
            return (Arc::clone(r.value()), false);
        }

        match self.records.entry(operation.to_owned()) {
            Entry::Occupied(e) => (Arc::clone(e.get()), false),
            Entry::Vacant(e) => {
                let record = Arc::new(CounterRecord::default());
                e.insert(Arc::clone(&record));
                (record, true)
            }
        }
    }

    /// Current count for `operation`, `None` if it was never seen.
    pub fn count(&self, operation: &str) -> Option<u64> {
        self.records.get(operation).map(|r| r.value().current())
    }

    pub fn contains(&self, operation: &str) -> bool {
        self.records.contains_key(operation)
    }

    /// Number of distinct operations tracked.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
