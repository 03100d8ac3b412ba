//! Transport adapters
//!
//! The session talks to the vision computer through the [`Transport`]
//! trait only. Two variants exist and the firmware compiles in exactly one:
//!
//! - [`UartDmaTransport`] - DMA receive service on a UART
//! - [`UsbVcpTransport`] - USB CDC-ACM virtual COM port

pub mod uart_dma;
pub mod usb_vcp;

pub use uart_dma::UartDmaTransport;
pub use usb_vcp::UsbVcpTransport;

use visionlink_hal::RxSink;

use crate::config::TransportKind;

/// Errors reported by a transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportError<E> {
    /// No receive callback has been registered yet
    NotRegistered,
    /// The underlying port failed
    Port(E),
}

/// Byte-stream transport carrying vision frames
pub trait Transport {
    /// Error type of the underlying port
    type Error;

    /// Which variant this is
    fn kind(&self) -> TransportKind;

    /// Register the decode callback and start receiving
    ///
    /// The callback runs in interrupt context for every completed receive.
    fn register_callback(&mut self, sink: &'static dyn RxSink) -> Result<(), TransportError<Self::Error>>;

    /// Transmit one frame
    ///
    /// May return before the bytes are on the wire; the caller keeps `data`
    /// alive and does not reuse it for another send until the transport has
    /// finished with it.
    fn send(&mut self, data: &[u8]) -> Result<(), TransportError<Self::Error>>;

    /// Fully restart the receive path
    ///
    /// Safe to call from task context while a receive is in flight.
    fn reinit(&mut self) -> Result<(), TransportError<Self::Error>>;
}
