//! USB device and CDC-ACM runner tasks

use defmt::*;
use embassy_stm32::peripherals::USB_OTG_FS;
use embassy_stm32::usb::Driver;
use embassy_usb::class::cdc_acm::{Receiver, Sender};
use embassy_usb::UsbDevice;

use visionlink_hal_stm32f4::usb::VcpService;

/// USB full-speed driver on the OTG_FS core
pub type UsbDriver = Driver<'static, USB_OTG_FS>;

/// USB device state machine
#[embassy_executor::task]
pub async fn usb_device_task(mut device: UsbDevice<'static, UsbDriver>) -> ! {
    info!("USB device task started");
    device.run().await
}

/// Receive side: OUT packets delivered to the decode callback
#[embassy_executor::task]
pub async fn vcp_rx_task(service: &'static VcpService, rx: Receiver<'static, UsbDriver>) -> ! {
    info!("Vision VCP RX task started");
    service.run_rx(rx).await
}

/// Transmit side: drains the queued frames
#[embassy_executor::task]
pub async fn vcp_tx_task(service: &'static VcpService, tx: Sender<'static, UsbDriver>) -> ! {
    info!("Vision VCP TX task started");
    service.run_tx(tx).await
}
