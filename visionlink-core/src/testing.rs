//! Host-side fakes for transports and ports

use std::sync::Mutex;

use visionlink_hal::{DmaSerial, RxSink, VcpPort};

use crate::config::TransportKind;
use crate::transport::{Transport, TransportError};

/// Sink that records every buffer it is handed
#[derive(Default)]
pub struct RecordingSink {
    frames: Mutex<Vec<Vec<u8>>>,
}

impl RecordingSink {
    pub fn received(&self) -> Vec<Vec<u8>> {
        self.frames.lock().unwrap().clone()
    }
}

impl RxSink for RecordingSink {
    fn on_receive(&self, data: &[u8]) {
        self.frames.lock().unwrap().push(data.to_vec());
    }
}

pub fn leak_sink() -> &'static RecordingSink {
    Box::leak(Box::new(RecordingSink::default()))
}

/// DMA serial port that records calls
#[derive(Default)]
pub struct MockSerial {
    pub service_inits: usize,
    pub recv_size: usize,
    pub sent: Vec<Vec<u8>>,
    pub fail_transmit: bool,
    pub fail_init: bool,
    pub(crate) sink: Option<&'static dyn RxSink>,
}

impl MockSerial {
    /// Simulate a completed DMA receive
    pub fn deliver(&self, data: &[u8]) {
        if let Some(sink) = self.sink {
            sink.on_receive(data);
        }
    }
}

impl DmaSerial for MockSerial {
    type Error = ();

    fn service_init(&mut self, recv_size: usize, sink: &'static dyn RxSink) -> Result<(), ()> {
        self.service_inits += 1;
        if self.fail_init {
            return Err(());
        }
        self.recv_size = recv_size;
        self.sink = Some(sink);
        Ok(())
    }

    fn transmit_it(&mut self, data: &[u8]) -> Result<(), ()> {
        if self.fail_transmit {
            return Err(());
        }
        self.sent.push(data.to_vec());
        Ok(())
    }
}

/// USB virtual COM port that records calls
#[derive(Default)]
pub struct MockVcp {
    pub opens: usize,
    pub sent: Vec<Vec<u8>>,
    sink: Option<&'static dyn RxSink>,
}

impl MockVcp {
    /// Simulate an OUT transfer of `data.len()` bytes
    pub fn deliver(&self, data: &[u8]) {
        if let Some(sink) = self.sink {
            sink.on_receive(data);
        }
    }
}

impl VcpPort for MockVcp {
    type Error = ();

    fn open(&mut self, sink: &'static dyn RxSink) -> Result<(), ()> {
        self.opens += 1;
        self.sink = Some(sink);
        Ok(())
    }

    fn transmit(&mut self, data: &[u8]) -> Result<(), ()> {
        self.sent.push(data.to_vec());
        Ok(())
    }
}

/// Bare transport that only counts restarts
#[derive(Default)]
pub struct CountingTransport {
    pub reinits: usize,
    pub fail_reinit: bool,
}

impl Transport for CountingTransport {
    type Error = ();

    fn kind(&self) -> TransportKind {
        TransportKind::UartDma
    }

    fn register_callback(&mut self, _sink: &'static dyn RxSink) -> Result<(), TransportError<()>> {
        Ok(())
    }

    fn send(&mut self, _data: &[u8]) -> Result<(), TransportError<()>> {
        Ok(())
    }

    fn reinit(&mut self) -> Result<(), TransportError<()>> {
        self.reinits += 1;
        if self.fail_reinit {
            Err(TransportError::Port(()))
        } else {
            Ok(())
        }
    }
}
