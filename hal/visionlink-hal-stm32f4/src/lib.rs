//! STM32F4-specific HAL for VisionLink
//!
//! Implements the `visionlink-hal` traits on top of embassy-stm32 for the
//! STM32F407/F427 controller boards:
//!
//! - [`crc::HwCrc`] - the on-chip CRC calculation unit
//! - [`uart::SerialService`] - DMA UART receive service with restart
//! - [`usb::VcpService`] - USB CDC-ACM virtual COM port
//!
//! # Features
//!
//! - `stm32f407ig` / `stm32f427ii` - chip selection
//! - `defmt` - Enable debug formatting support
//!
//! The embassy peripherals are asynchronous while the link's transport
//! contract is the callback model of the board support layer. The services
//! here bridge the two: the port handles given to the transport only post
//! requests, and a pair of runner futures (spawned as tasks by the
//! firmware) own the peripheral and invoke the receive callback.

#![no_std]

pub mod crc;
pub mod uart;
pub mod usb;

// Re-export shared traits from visionlink-hal
pub use visionlink_hal::{Crc32Unit, DmaSerial, RxSink, VcpPort};
