//! Vision link task
//!
//! Drives the link supervisor at a fixed rate and forwards the gimbal
//! state to the vision computer on every tick.

use defmt::*;
use embassy_time::{Duration, Ticker};

use visionlink_core::{LinkState, VisionSession};
use visionlink_hal_stm32f4::crc::HwCrc;
use visionlink_protocol::VisionSend;

use crate::channels::{POWER_READING, VISION_SEND};

#[cfg(feature = "transport-uart")]
type VisionTransport =
    visionlink_core::UartDmaTransport<visionlink_hal_stm32f4::uart::ServicePort>;

#[cfg(feature = "transport-vcp")]
type VisionTransport =
    visionlink_core::UsbVcpTransport<visionlink_hal_stm32f4::usb::VcpPortHandle>;

/// Session over the selected transport
type VisionSessionFw = VisionSession<HwCrc, VisionTransport>;

/// Supervisor tick interval in milliseconds
pub const TICK_INTERVAL_MS: u64 = 10;

/// Ticks between status log lines
const STATUS_EVERY: u32 = 100;

/// Vision task - supervisor ticks and periodic state reports
#[embassy_executor::task]
pub async fn vision_task(mut session: VisionSessionFw) {
    info!("Vision task started");

    let receiver = session.receiver();
    let mut ticker = Ticker::every(Duration::from_millis(TICK_INTERVAL_MS));
    let mut state = VisionSend::default();
    let mut ticks: u32 = 0;

    loop {
        ticker.next().await;

        if session.tick() == LinkState::Expired {
            debug!(
                "Vision link restarted ({} expirations)",
                session.link().supervisor().expirations()
            );
        }

        if let Some(update) = VISION_SEND.try_take() {
            state = update;
        }
        if let Err(e) = session.send(&state) {
            trace!("Vision send skipped: {:?}", e);
        }

        ticks = ticks.wrapping_add(1);
        if ticks % STATUS_EVERY == 0 {
            let stats = receiver.stats();
            info!(
                "Vision {}: ok={} crc={} marker={} short={} restarts={}",
                if receiver.is_online() { "online" } else { "offline" },
                stats.frames_ok,
                stats.crc_mismatch,
                stats.bad_marker,
                stats.truncated,
                stats.expirations
            );
            if let Some(action) = receiver.latest() {
                debug!(
                    "Vision target: pitch={} yaw={} fire={}",
                    action.abs_pitch, action.abs_yaw, action.fire_times
                );
            }
            if let Some(power) = POWER_READING.try_take() {
                debug!(
                    "Vision rail: {}V {}A {}W",
                    power.bus_v, power.current_a, power.power_w
                );
            }
        }
    }
}
