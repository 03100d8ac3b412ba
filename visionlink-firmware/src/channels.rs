//! Inter-task communication channels
//!
//! Defines the static signals shared between the Embassy tasks. The gimbal
//! side publishes its current attitude here; the vision task forwards it.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

use visionlink_protocol::VisionSend;

/// Power rail reading from the INA226
#[derive(Debug, Clone, Copy, defmt::Format)]
pub struct PowerReading {
    /// Bus voltage in volts
    pub bus_v: f32,
    /// Current in amps
    pub current_a: f32,
    /// Power in watts
    pub power_w: f32,
}

/// Latest gimbal state to report to the vision computer
/// (updated by the gimbal controller, consumed by the vision task)
pub static VISION_SEND: Signal<CriticalSectionRawMutex, VisionSend> = Signal::new();

/// Latest power reading (updated by the power task)
pub static POWER_READING: Signal<CriticalSectionRawMutex, PowerReading> = Signal::new();
