//! Configuration types
//!
//! Link parameters chosen at build time, one set per transport variant.

pub mod types;

pub use types::*;
