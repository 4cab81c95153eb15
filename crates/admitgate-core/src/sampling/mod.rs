//! Sampling strategies (random draw, periodic counter).
//!
//! Applied only to operations already inside a behavior's scope.

pub mod counter_store;
pub mod periodic;
pub mod random;

pub use counter_store::{CounterRecord, PeriodicCounterStore};
pub use periodic::{PeriodicOutcome, PeriodicSampler};
pub use random::{RandomSampler, RandomSource, SeededSource, ThreadRngSource};
