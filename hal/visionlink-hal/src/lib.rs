//! VisionLink Hardware Abstraction Layer
//!
//! This crate defines the hardware-facing traits the vision link is written
//! against. Chip-specific crates implement them for real peripherals, host
//! tests implement them with fakes.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  visionlink-core (session, supervisor)  │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  visionlink-hal (this crate - traits)   │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!           ┌──────────────────┐
//!           │ visionlink-hal-  │
//!           │     stm32f4      │
//!           └──────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`crc::Crc32Unit`] - CRC32 peripheral (STM32 word-oriented algorithm)
//! - [`uart::DmaSerial`] - DMA-driven UART receive service
//! - [`usb::VcpPort`] - USB virtual COM port
//! - [`uart::RxSink`] - Receive callback invoked from interrupt context
//! - [`i2c::I2cBus`] - I2C bus operations

#![no_std]
#![deny(unsafe_code)]

pub mod crc;
pub mod i2c;
pub mod uart;
pub mod usb;

// Re-export key traits at crate root for convenience
pub use crc::Crc32Unit;
pub use i2c::I2cBus;
pub use uart::{DmaSerial, RxSink};
pub use usb::VcpPort;
