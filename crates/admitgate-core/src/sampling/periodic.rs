//! Deterministic "every Nth call" sampling, counted per operation.
//!
//! With `match_first` the first call of an operation matches for free (the
//! counter stays at 0), giving matches on calls 1, N+1, 2N+1, ...
//! Without it, matches land on calls N, 2N, 3N, ...

use std::sync::Arc;

use super::counter_store::PeriodicCounterStore;

/// Why a periodic decision came out the way it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodicOutcome {
    /// First arrival with `match_first`; no counter step.
    First,
    /// Counter wrapped to zero.
    Matched,
    /// Counter stepped to the contained non-zero value.
    Skipped(u64),
}

impl PeriodicOutcome {
    pub fn is_match(self) -> bool {
        !matches!(self, PeriodicOutcome::Skipped(_))
    }
}

#[derive(Debug, Clone)]
pub struct PeriodicSampler {
    period: u32,
    match_first: bool,
    store: Arc<PeriodicCounterStore>,
}

impl PeriodicSampler {
    /// Period `n` with `match_first` on and a fresh counter store.
    pub fn new(period: u32) -> Self {
        Self {
            period,
            match_first: true,
            store: Arc::new(PeriodicCounterStore::new()),
        }
    }

    pub fn with_match_first(mut self, match_first: bool) -> Self {
        self.match_first = match_first;
        self
    }

    /// Count against an existing store instead of a private one.
    pub fn with_store(mut self, store: Arc<PeriodicCounterStore>) -> Self {
        self.store = store;
        self
    }

    /// Configured period (may be 0).
    pub fn period(&self) -> u32 {
        self.period
    }

    /// Period actually applied: never below 1.
    pub fn effective_period(&self) -> u32 {
        self.period.max(1)
    }

    pub fn match_first(&self) -> bool {
        self.match_first
    }

    pub fn store(&self) -> &Arc<PeriodicCounterStore> {
        &self.store
    }

    pub fn evaluate(&self, operation: &str) -> PeriodicOutcome {
        let (record, first_arrival) = self.store.load_or_create(operation);
        if first_arrival && self.match_first {
            return PeriodicOutcome::First;
        }
        match record.advance(self.period) {
            0 => PeriodicOutcome::Matched,
            count => PeriodicOutcome::Skipped(count),
        }
    }

    pub fn decide(&self, operation: &str) -> bool {
        self.evaluate(operation).is_match()
    }
}
