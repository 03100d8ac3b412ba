//! Embassy async tasks
//!
//! Each task runs independently and communicates via signals.

pub mod power;
#[cfg(feature = "transport-uart")]
pub mod serial;
#[cfg(feature = "transport-vcp")]
pub mod usb;
pub mod vision;

pub use power::power_task;
#[cfg(feature = "transport-uart")]
pub use serial::{serial_rx_task, serial_tx_task};
#[cfg(feature = "transport-vcp")]
pub use usb::{usb_device_task, vcp_rx_task, vcp_tx_task};
pub use vision::vision_task;
