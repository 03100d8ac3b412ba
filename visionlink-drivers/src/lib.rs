//! Peripheral driver implementations
//!
//! Concrete drivers for the auxiliary hardware on the controller board,
//! written against the traits in `visionlink-hal`:
//!
//! - Power monitor (INA226 over I2C)
//! - Bus adapter from `embedded-hal` I2C to [`visionlink_hal::I2cBus`]

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod bus;
pub mod power;
