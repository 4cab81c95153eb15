//! Dispatcher module exports.

pub mod dispatcher;

pub use dispatcher::{Dispatcher, OperationHandler};
