//! UART receive service for STM32F4
//!
//! [`SerialService`] owns nothing but two mailboxes. The transport talks to
//! it through [`ServicePort`] (a [`DmaSerial`]), and the firmware spawns
//! [`SerialService::run_rx`] and [`SerialService::run_tx`] with the split
//! halves of an async UART.
//!
//! Restarting the service drops the in-flight idle-line DMA read, which
//! aborts the transfer, and arms a fresh one. Reception uses idle-line
//! detection so a restart or a dropped byte never leaves the receiver
//! misaligned for more than one frame.

use embassy_futures::select::{select, Either};
use embassy_stm32::mode::Async;
use embassy_stm32::usart::{self, Error as UsartError, UartRx, UartTx};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use heapless::Vec;
use visionlink_hal::uart::{DataBits, Parity, StopBits, UartConfig};
use visionlink_hal::{DmaSerial, RxSink};

/// Largest receive transfer the service accepts
pub const MAX_RECV_SIZE: usize = 64;

/// Largest single transmit
pub const MAX_TX_SIZE: usize = 64;

/// Error from UART operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UartBusError {
    /// Framing error
    Framing,
    /// Noise error
    Noise,
    /// Overrun error
    Overrun,
    /// Parity error
    Parity,
    /// Buffer too small
    BufferTooSmall,
    /// Previous transmit still queued
    Busy,
    /// Other error
    Other,
}

impl From<UsartError> for UartBusError {
    fn from(e: UsartError) -> Self {
        match e {
            UsartError::Framing => UartBusError::Framing,
            UsartError::Noise => UartBusError::Noise,
            UsartError::Overrun => UartBusError::Overrun,
            UsartError::Parity => UartBusError::Parity,
            UsartError::BufferTooLong => UartBusError::BufferTooSmall,
            _ => UartBusError::Other,
        }
    }
}

/// Convert a board-agnostic UART configuration to embassy's
pub fn usart_config(config: &UartConfig) -> usart::Config {
    let mut cfg = usart::Config::default();
    cfg.baudrate = config.baudrate;
    cfg.data_bits = match config.data_bits {
        DataBits::Eight => usart::DataBits::DataBits8,
        DataBits::Nine => usart::DataBits::DataBits9,
    };
    cfg.parity = match config.parity {
        Parity::None => usart::Parity::ParityNone,
        Parity::Even => usart::Parity::ParityEven,
        Parity::Odd => usart::Parity::ParityOdd,
    };
    cfg.stop_bits = match config.stop_bits {
        StopBits::One => usart::StopBits::STOP1,
        StopBits::Two => usart::StopBits::STOP2,
    };
    cfg
}

/// Mailboxes between the transport and the UART runner tasks
pub struct SerialService {
    restart: Signal<CriticalSectionRawMutex, (usize, &'static dyn RxSink)>,
    tx: Channel<CriticalSectionRawMutex, Vec<u8, MAX_TX_SIZE>, 1>,
}

impl SerialService {
    pub const fn new() -> Self {
        Self {
            restart: Signal::new(),
            tx: Channel::new(),
        }
    }

    /// Port handle for the transport
    pub fn port(&'static self) -> ServicePort {
        ServicePort { service: self }
    }

    /// Receive runner
    ///
    /// Idle until the first `service_init`, then deliver every received
    /// burst to the sink. A new `service_init` aborts the current transfer
    /// and re-arms with the new parameters.
    pub async fn run_rx(&'static self, mut rx: UartRx<'static, Async>) -> ! {
        let (mut size, mut sink) = self.restart.wait().await;
        let mut buf = [0u8; MAX_RECV_SIZE];

        loop {
            let len = size.min(MAX_RECV_SIZE);
            match select(rx.read_until_idle(&mut buf[..len]), self.restart.wait()).await {
                Either::First(Ok(n)) => sink.on_receive(&buf[..n]),
                Either::First(Err(_e)) => {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("[vision] UART read error: {:?}", UartBusError::from(_e));
                }
                Either::Second((new_size, new_sink)) => {
                    #[cfg(feature = "defmt")]
                    defmt::debug!("[vision] UART receive service restarted");
                    size = new_size;
                    sink = new_sink;
                }
            }
        }
    }

    /// Transmit runner
    pub async fn run_tx(&'static self, mut tx: UartTx<'static, Async>) -> ! {
        loop {
            let frame = self.tx.receive().await;
            if let Err(_e) = tx.write(&frame).await {
                #[cfg(feature = "defmt")]
                defmt::warn!("[vision] UART write error: {:?}", UartBusError::from(_e));
            }
        }
    }
}

impl Default for SerialService {
    fn default() -> Self {
        Self::new()
    }
}

/// [`DmaSerial`] handle onto a [`SerialService`]
pub struct ServicePort {
    service: &'static SerialService,
}

impl DmaSerial for ServicePort {
    type Error = UartBusError;

    fn service_init(&mut self, recv_size: usize, sink: &'static dyn RxSink) -> Result<(), UartBusError> {
        if recv_size > MAX_RECV_SIZE {
            return Err(UartBusError::BufferTooSmall);
        }
        self.service.restart.signal((recv_size, sink));
        Ok(())
    }

    fn transmit_it(&mut self, data: &[u8]) -> Result<(), UartBusError> {
        let frame = Vec::from_slice(data).map_err(|_| UartBusError::BufferTooSmall)?;
        self.service
            .tx
            .try_send(frame)
            .map_err(|_| UartBusError::Busy)
    }
}
