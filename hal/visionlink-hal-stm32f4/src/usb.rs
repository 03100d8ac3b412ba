//! USB CDC-ACM virtual COM port
//!
//! Same split as the UART service: [`VcpPortHandle`] is the [`VcpPort`]
//! given to the transport, the runners own the CDC-ACM endpoints. The
//! firmware builds the USB device and class, splits the class, and spawns
//! [`VcpService::run_rx`] and [`VcpService::run_tx`] next to the device task.

use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use embassy_usb::class::cdc_acm::{Receiver, Sender};
use embassy_usb::driver::{Driver, EndpointError};
use heapless::Vec;
use visionlink_hal::{RxSink, VcpPort};

/// Full-speed bulk packet size
pub const MAX_PACKET_SIZE: usize = 64;

/// Error from VCP operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum VcpError {
    /// Packet larger than the endpoint
    BufferOverflow,
    /// Host not connected or endpoint disabled
    Disabled,
    /// Previous transmit still queued
    Busy,
}

impl From<EndpointError> for VcpError {
    fn from(e: EndpointError) -> Self {
        match e {
            EndpointError::BufferOverflow => VcpError::BufferOverflow,
            EndpointError::Disabled => VcpError::Disabled,
        }
    }
}

/// Mailboxes between the transport and the CDC-ACM runner tasks
pub struct VcpService {
    open: Signal<CriticalSectionRawMutex, &'static dyn RxSink>,
    tx: Channel<CriticalSectionRawMutex, Vec<u8, MAX_PACKET_SIZE>, 1>,
}

impl VcpService {
    pub const fn new() -> Self {
        Self {
            open: Signal::new(),
            tx: Channel::new(),
        }
    }

    /// Port handle for the transport
    pub fn port(&'static self) -> VcpPortHandle {
        VcpPortHandle { service: self }
    }

    /// Receive runner
    ///
    /// Waits for the port to be opened, then forwards every OUT packet to
    /// the sink. Reopening swaps the sink and restarts the read; a host
    /// disconnect parks the runner until the next connection.
    pub async fn run_rx<D: Driver<'static>>(&'static self, mut rx: Receiver<'static, D>) -> ! {
        let mut sink = self.open.wait().await;
        let mut buf = [0u8; MAX_PACKET_SIZE];

        loop {
            rx.wait_connection().await;
            #[cfg(feature = "defmt")]
            defmt::info!("[vision] VCP host connected");

            loop {
                match select(rx.read_packet(&mut buf), self.open.wait()).await {
                    Either::First(Ok(n)) => sink.on_receive(&buf[..n]),
                    Either::First(Err(EndpointError::Disabled)) => break,
                    Either::First(Err(EndpointError::BufferOverflow)) => {
                        #[cfg(feature = "defmt")]
                        defmt::warn!("[vision] VCP packet overflow");
                    }
                    Either::Second(new_sink) => sink = new_sink,
                }
            }
        }
    }

    /// Transmit runner
    pub async fn run_tx<D: Driver<'static>>(&'static self, mut tx: Sender<'static, D>) -> ! {
        loop {
            let packet = self.tx.receive().await;
            if let Err(_e) = tx.write_packet(&packet).await {
                #[cfg(feature = "defmt")]
                defmt::debug!("[vision] VCP write dropped: {:?}", VcpError::from(_e));
            }
        }
    }
}

impl Default for VcpService {
    fn default() -> Self {
        Self::new()
    }
}

/// [`VcpPort`] handle onto a [`VcpService`]
pub struct VcpPortHandle {
    service: &'static VcpService,
}

impl VcpPort for VcpPortHandle {
    type Error = VcpError;

    fn open(&mut self, sink: &'static dyn RxSink) -> Result<(), VcpError> {
        self.service.open.signal(sink);
        Ok(())
    }

    fn transmit(&mut self, data: &[u8]) -> Result<(), VcpError> {
        let packet = Vec::from_slice(data).map_err(|_| VcpError::BufferOverflow)?;
        self.service.tx.try_send(packet).map_err(|_| VcpError::Busy)
    }
}
