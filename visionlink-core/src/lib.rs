//! Board-agnostic core logic for the vision link
//!
//! This crate wires the frame codec to a byte-stream transport and keeps
//! the link alive:
//!
//! - Transport adapters (DMA UART, USB virtual COM port)
//! - Link supervisor (reload-counted watchdog with transport restart)
//! - Protocol session (single-slot receive state, persistent transmit buffer)
//! - Configuration type definitions
//!
//! # Execution contexts
//!
//! Frames are decoded in interrupt context (or an executor task standing
//! in for it) through [`session::VisionLink`], which is shared and `Sync`.
//! Sending and supervisor ticks run in task context through
//! [`session::VisionSession`], which owns the transport.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod link;
pub mod session;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{LinkConfig, TransportKind};
pub use link::{LinkState, LinkStats, LinkSupervisor};
pub use session::{Receiver, VisionLink, VisionSession};
pub use transport::{Transport, TransportError, UartDmaTransport, UsbVcpTransport};
