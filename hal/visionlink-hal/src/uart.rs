//! UART serial communication abstractions
//!
//! The vision link runs its UART as a DMA receive service: the driver owns
//! the receive buffer, fills it in the background and hands each completed
//! buffer to a registered [`RxSink`] from interrupt context.

/// Receive callback
///
/// Invoked by the transport's interrupt path with the bytes that landed in
/// the driver-owned buffer. Implementations must not block.
pub trait RxSink: Sync {
    /// Handle one completed receive buffer
    fn on_receive(&self, data: &[u8]);
}

/// DMA-driven UART service
///
/// Mirrors the register/service-init model of the board support layer:
/// one call (re)starts the whole receive service, transmits are
/// interrupt-driven and never wait for completion.
pub trait DmaSerial {
    /// Error type for serial operations
    type Error;

    /// Start (or fully restart) the receive service
    ///
    /// Aborts any in-flight transfer, re-arms DMA reception of `recv_size`
    /// bytes and routes every completed buffer to `sink`. Calling this again
    /// is the recovery path for a receive side that has stopped delivering.
    fn service_init(&mut self, recv_size: usize, sink: &'static dyn RxSink)
        -> Result<(), Self::Error>;

    /// Queue an interrupt-driven transmit
    ///
    /// Returns as soon as the transfer is queued. `data` is copied or must
    /// otherwise stay valid until the transfer completes.
    fn transmit_it(&mut self, data: &[u8]) -> Result<(), Self::Error>;
}

/// UART configuration
#[derive(Debug, Clone, Copy)]
pub struct UartConfig {
    /// Baud rate in bits per second
    pub baudrate: u32,
    /// Number of data bits (typically 8)
    pub data_bits: DataBits,
    /// Parity mode
    pub parity: Parity,
    /// Number of stop bits
    pub stop_bits: StopBits,
}

impl Default for UartConfig {
    fn default() -> Self {
        Self {
            baudrate: 115200,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
        }
    }
}

/// Number of data bits per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataBits {
    Eight,
    Nine,
}

/// Parity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parity {
    None,
    Even,
    Odd,
}

/// Number of stop bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopBits {
    One,
    Two,
}
