//! admitgate host library.
//!
//! Wires config, guard pipeline, handler dispatch, and metrics around the
//! core admission decisions. Consumed by the binary (`main.rs`) and by
//! integration tests.

pub mod app_state;
pub mod config;
pub mod dispatch;
pub mod guard;
pub mod obs;
pub mod pipeline;
