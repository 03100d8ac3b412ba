//! USB virtual COM port abstraction

use crate::uart::RxSink;

/// USB CDC-ACM virtual serial port
///
/// The USB stack owns the receive buffer. Each OUT transfer is passed to
/// the registered sink together with its length.
pub trait VcpPort {
    /// Error type for port operations
    type Error;

    /// Open (or reopen) the port and route received packets to `sink`
    fn open(&mut self, sink: &'static dyn RxSink) -> Result<(), Self::Error>;

    /// Transmit a fixed-length buffer
    fn transmit(&mut self, data: &[u8]) -> Result<(), Self::Error>;
}
