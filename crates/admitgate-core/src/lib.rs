//! admitgate core: per-request admission decisions for remote operations.
//!
//! For each operation identifier a behavior asks two questions:
//! 1. is the operation in scope (include/exclude set)?
//! 2. if so, does the sampling strategy select this call (random, periodic)?
//!
//! Everything here is in-memory and synchronous. There is no transport or
//! runtime dependency, so the host layer decides what "activate" means.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here. Decision functions
//! are total: they return a boolean for every input and never fail.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod decision;
pub mod error;
pub mod sampling;
pub mod scope;

pub use decision::{AdmissionConfig, AdmissionDecision, Strategy};
/// Shared result type.
pub use error::{AdmitError, ClientCode, Result};
pub use sampling::{
    PeriodicCounterStore, PeriodicSampler, RandomSampler, RandomSource, SeededSource,
    ThreadRngSource,
};
pub use scope::{OperationScope, Polarity};
