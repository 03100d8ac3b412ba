//! Power monitoring drivers

pub mod ina226;

pub use ina226::{Ina226, Ina226Error};
