//! Link supervision
//!
//! Detects a silent vision link and restarts the transport.

pub mod stats;
pub mod supervisor;

pub use stats::{LinkCounters, LinkStats};
pub use supervisor::{LinkState, LinkSupervisor};
