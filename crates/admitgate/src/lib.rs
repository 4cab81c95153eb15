//! Top-level facade crate for admitgate.
//!
//! Re-exports the decision core and the host library so users can depend on a single crate.

pub mod core {
    pub use admitgate_core::*;
}

pub mod host {
    pub use admitgate_host::*;
}
