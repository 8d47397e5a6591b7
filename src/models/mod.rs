//! Models Module
//!
//! Serializable views of cache state for diagnostics.

pub mod snapshot;

pub use snapshot::*;
