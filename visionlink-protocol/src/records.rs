//! Typed records carried by vision frames

/// Start-of-frame marker of an inbound action frame
pub const ACTION_SOF: u8 = b'A';

/// Start-of-frame marker of an outbound state frame
pub const SEND_SOF: u8 = b'S';

/// Action frame received from the vision computer
///
/// Only ever produced by a successful decode, so `sof` is always
/// [`ACTION_SOF`] and `crc_check` always matches the payload.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ActionData {
    /// Start-of-frame marker
    pub sof: u8,
    /// Number of shots requested
    pub fire_times: i8,
    /// Absolute pitch target (rad)
    pub abs_pitch: f32,
    /// Absolute yaw target (rad)
    pub abs_yaw: f32,
    /// Reserved for future use
    pub reserved_slot: i16,
    /// Checksum carried by the frame
    pub crc_check: u32,
}

/// State frame sent to the vision computer
///
/// The trailing checksum is not part of the record; it is computed when
/// the record is packed.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct VisionSend {
    /// Start-of-frame marker
    pub sof: u8,
    /// Shots fired since the last report
    pub fire_times: i8,
    /// Current gimbal pitch (rad)
    pub present_pitch: f32,
    /// Current gimbal yaw (rad)
    pub present_yaw: f32,
    /// Reserved for future use
    pub reserved_slot: i16,
}

impl VisionSend {
    /// Create a state record with the default marker and an empty reserved slot
    pub const fn new(fire_times: i8, present_pitch: f32, present_yaw: f32) -> Self {
        Self {
            sof: SEND_SOF,
            fire_times,
            present_pitch,
            present_yaw,
            reserved_slot: 0,
        }
    }
}

impl Default for VisionSend {
    fn default() -> Self {
        Self::new(0, 0.0, 0.0)
    }
}
