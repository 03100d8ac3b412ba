//! UART runner tasks
//!
//! Own the two halves of the vision UART on behalf of the serial service.

use defmt::*;
use embassy_stm32::mode::Async;
use embassy_stm32::usart::{UartRx, UartTx};

use visionlink_hal_stm32f4::uart::SerialService;

/// Receive side: idle-line DMA reads delivered to the decode callback
#[embassy_executor::task]
pub async fn serial_rx_task(service: &'static SerialService, rx: UartRx<'static, Async>) -> ! {
    info!("Vision UART RX task started");
    service.run_rx(rx).await
}

/// Transmit side: drains the queued frames
#[embassy_executor::task]
pub async fn serial_tx_task(service: &'static SerialService, tx: UartTx<'static, Async>) -> ! {
    info!("Vision UART TX task started");
    service.run_tx(tx).await
}
