//! Lightweight in-process metrics.
//!
//! Counters are stored as atomics in a `DashMap` and rendered in Prometheus
//! text format on demand.

pub mod metrics;

pub use metrics::{CounterVec, HostMetrics};
