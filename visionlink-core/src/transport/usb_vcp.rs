//! USB virtual COM port transport

use visionlink_hal::{RxSink, VcpPort};

use super::{Transport, TransportError};
use crate::config::TransportKind;

/// Transport over a [`VcpPort`]
///
/// Every send is a fixed-length transmit of one frame. Reinitializing
/// reopens the port with the registered callback.
pub struct UsbVcpTransport<P> {
    port: P,
    sink: Option<&'static dyn RxSink>,
}

impl<P: VcpPort> UsbVcpTransport<P> {
    /// Wrap a port; nothing is opened until a callback is registered
    pub fn new(port: P) -> Self {
        Self { port, sink: None }
    }

    /// Borrow the underlying port
    pub fn port(&self) -> &P {
        &self.port
    }

    /// Mutably borrow the underlying port
    pub fn port_mut(&mut self) -> &mut P {
        &mut self.port
    }
}

impl<P: VcpPort> Transport for UsbVcpTransport<P> {
    type Error = P::Error;

    fn kind(&self) -> TransportKind {
        TransportKind::UsbVcp
    }

    fn register_callback(&mut self, sink: &'static dyn RxSink) -> Result<(), TransportError<P::Error>> {
        self.sink = Some(sink);
        self.port.open(sink).map_err(TransportError::Port)
    }

    fn send(&mut self, data: &[u8]) -> Result<(), TransportError<P::Error>> {
        if self.sink.is_none() {
            return Err(TransportError::NotRegistered);
        }
        self.port.transmit(data).map_err(TransportError::Port)
    }

    fn reinit(&mut self) -> Result<(), TransportError<P::Error>> {
        let sink = self.sink.ok_or(TransportError::NotRegistered)?;
        self.port.open(sink).map_err(TransportError::Port)
    }
}
