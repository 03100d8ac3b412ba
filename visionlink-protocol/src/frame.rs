//! Frame encoding and decoding for the vision link.
//!
//! Both directions use the same fixed 16-byte layout (little-endian):
//! - SOF (1 byte): frame marker, `'A'` for action frames
//! - COUNT (1 byte): signed shot count
//! - FIRST (4 bytes): f32, pitch
//! - SECOND (4 bytes): f32, yaw
//! - RESERVED (2 bytes): i16
//! - CRC (4 bytes): STM32 CRC32 over bytes 0..12

use visionlink_hal::Crc32Unit;

use crate::crc::{self, CrcCheck, CRC_LEN};
use crate::records::{ActionData, VisionSend, ACTION_SOF};

/// Complete frame size in bytes
pub const FRAME_LEN: usize = 16;

/// Bytes covered by the checksum
pub const PAYLOAD_LEN: usize = FRAME_LEN - CRC_LEN;

const SOF_OFFSET: usize = 0;
const COUNT_OFFSET: usize = 1;
const FIRST_OFFSET: usize = 2;
const SECOND_OFFSET: usize = 6;
const RESERVED_OFFSET: usize = 10;
const CRC_OFFSET: usize = PAYLOAD_LEN;

/// Reasons a received buffer is not decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Fewer than [`FRAME_LEN`] bytes available
    Truncated,
    /// First byte is not the expected marker
    BadMarker,
    /// Trailing checksum does not match the payload
    CrcMismatch,
    /// Buffer length is not a whole number of CRC words
    Unaligned,
}

/// A packed frame ready for transmission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Frame([u8; FRAME_LEN]);

impl Frame {
    /// Raw frame bytes
    pub fn as_bytes(&self) -> &[u8; FRAME_LEN] {
        &self.0
    }

    /// Marker byte
    pub fn marker(&self) -> u8 {
        self.0[SOF_OFFSET]
    }

    /// Checksum stored in the trailer
    pub fn crc(&self) -> u32 {
        read_u32(&self.0, CRC_OFFSET)
    }
}

impl From<Frame> for [u8; FRAME_LEN] {
    fn from(frame: Frame) -> Self {
        frame.0
    }
}

/// Pack a state record into `buf`
///
/// `buf` is normally a long-lived transmit buffer: the transport may still
/// be reading it after this returns.
pub fn pack_into<C: Crc32Unit + ?Sized>(crc: &mut C, record: &VisionSend, buf: &mut [u8; FRAME_LEN]) {
    write_fields(
        buf,
        record.sof,
        record.fire_times,
        record.present_pitch,
        record.present_yaw,
        record.reserved_slot,
    );
    seal(crc, buf);
}

/// Pack a state record into a new frame
pub fn pack<C: Crc32Unit + ?Sized>(crc: &mut C, record: &VisionSend) -> Frame {
    let mut buf = [0u8; FRAME_LEN];
    pack_into(crc, record, &mut buf);
    Frame(buf)
}

/// Pack an action record, as the vision computer does
///
/// The stored `crc_check` is ignored and recomputed.
pub fn pack_action<C: Crc32Unit + ?Sized>(crc: &mut C, record: &ActionData) -> Frame {
    let mut buf = [0u8; FRAME_LEN];
    write_fields(
        &mut buf,
        record.sof,
        record.fire_times,
        record.abs_pitch,
        record.abs_yaw,
        record.reserved_slot,
    );
    seal(crc, &mut buf);
    Frame(buf)
}

/// Decode an action frame from the start of `bytes`
///
/// The marker is checked before any CRC work so that noise costs nothing.
/// Bytes past the first [`FRAME_LEN`] are ignored.
pub fn decode_action<C: Crc32Unit + ?Sized>(crc: &mut C, bytes: &[u8]) -> Result<ActionData, FrameError> {
    let frame: &[u8; FRAME_LEN] = bytes
        .get(..FRAME_LEN)
        .and_then(|b| b.try_into().ok())
        .ok_or(FrameError::Truncated)?;

    if frame[SOF_OFFSET] != ACTION_SOF {
        return Err(FrameError::BadMarker);
    }

    if crc::validate(crc, frame)? == CrcCheck::Invalid {
        return Err(FrameError::CrcMismatch);
    }

    Ok(ActionData {
        sof: frame[SOF_OFFSET],
        fire_times: frame[COUNT_OFFSET] as i8,
        abs_pitch: read_f32(frame, FIRST_OFFSET),
        abs_yaw: read_f32(frame, SECOND_OFFSET),
        reserved_slot: read_i16(frame, RESERVED_OFFSET),
        crc_check: read_u32(frame, CRC_OFFSET),
    })
}

/// Decode an action frame, dropping anything that is not a valid frame
pub fn unpack<C: Crc32Unit + ?Sized>(crc: &mut C, bytes: &[u8]) -> Option<ActionData> {
    decode_action(crc, bytes).ok()
}

fn write_fields(buf: &mut [u8; FRAME_LEN], sof: u8, count: i8, first: f32, second: f32, reserved: i16) {
    buf[SOF_OFFSET] = sof;
    buf[COUNT_OFFSET] = count as u8;
    buf[FIRST_OFFSET..FIRST_OFFSET + 4].copy_from_slice(&first.to_le_bytes());
    buf[SECOND_OFFSET..SECOND_OFFSET + 4].copy_from_slice(&second.to_le_bytes());
    buf[RESERVED_OFFSET..RESERVED_OFFSET + 2].copy_from_slice(&reserved.to_le_bytes());
}

/// Compute the CRC over the payload and store it in the trailer
fn seal<C: Crc32Unit + ?Sized>(crc: &mut C, buf: &mut [u8; FRAME_LEN]) {
    let words = [
        read_u32(buf, 0),
        read_u32(buf, 4),
        read_u32(buf, 8),
    ];
    let value = crc.calculate(&words);
    buf[CRC_OFFSET..].copy_from_slice(&value.to_le_bytes());
}

fn read_u32(buf: &[u8; FRAME_LEN], at: usize) -> u32 {
    u32::from_le_bytes([buf[at], buf[at + 1], buf[at + 2], buf[at + 3]])
}

fn read_f32(buf: &[u8; FRAME_LEN], at: usize) -> f32 {
    f32::from_bits(read_u32(buf, at))
}

fn read_i16(buf: &[u8; FRAME_LEN], at: usize) -> i16 {
    i16::from_le_bytes([buf[at], buf[at + 1]])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crc::SoftCrc32;
    use crate::records::SEND_SOF;
    use proptest::prelude::*;

    /// Counts how many words reach the CRC unit
    struct CountingCrc {
        inner: SoftCrc32,
        words: usize,
    }

    impl Crc32Unit for CountingCrc {
        fn reset(&mut self) {
            self.inner.reset();
        }

        fn feed_word(&mut self, word: u32) -> u32 {
            self.words += 1;
            self.inner.feed_word(word)
        }
    }

    fn scenario_frame() -> [u8; FRAME_LEN] {
        [
            0x41, 0x03, // 'A', fire_times = 3
            0x00, 0x00, 0xC0, 0x3F, // 1.5
            0x00, 0x00, 0x00, 0xBF, // -0.5
            0x00, 0x00, // reserved
            0x0C, 0x2B, 0xC4, 0x5D, // crc
        ]
    }

    #[test]
    fn test_pack_layout() {
        let mut crc = SoftCrc32::new();
        let record = VisionSend {
            sof: ACTION_SOF,
            fire_times: 3,
            present_pitch: 1.5,
            present_yaw: -0.5,
            reserved_slot: 0,
        };

        let frame = pack(&mut crc, &record);
        assert_eq!(frame.as_bytes(), &scenario_frame());
        assert_eq!(frame.crc(), 0x5DC4_2B0C);
        assert_eq!(frame.marker(), b'A');
    }

    #[test]
    fn test_pack_default_marker() {
        let mut crc = SoftCrc32::new();
        let frame = pack(&mut crc, &VisionSend::new(-2, 0.25, 3.0));
        assert_eq!(frame.marker(), SEND_SOF);
        assert_eq!(frame.as_bytes()[1], 0xFE);
    }

    #[test]
    fn test_unpack_scenario() {
        let mut crc = SoftCrc32::new();
        let action = unpack(&mut crc, &scenario_frame()).unwrap();

        assert_eq!(action.sof, b'A');
        assert_eq!(action.fire_times, 3);
        assert_eq!(action.abs_pitch, 1.5);
        assert_eq!(action.abs_yaw, -0.5);
        assert_eq!(action.reserved_slot, 0);
        assert_eq!(action.crc_check, 0x5DC4_2B0C);
    }

    #[test]
    fn test_corrupted_pitch_is_dropped() {
        let mut crc = SoftCrc32::new();
        let mut frame = scenario_frame();
        frame[5] ^= 0x01;

        assert_eq!(decode_action(&mut crc, &frame), Err(FrameError::CrcMismatch));
        assert!(unpack(&mut crc, &frame).is_none());
    }

    #[test]
    fn test_truncated_buffer() {
        let mut crc = SoftCrc32::new();
        let frame = scenario_frame();
        assert_eq!(
            decode_action(&mut crc, &frame[..FRAME_LEN - 1]),
            Err(FrameError::Truncated)
        );
        assert_eq!(decode_action(&mut crc, &[]), Err(FrameError::Truncated));
    }

    #[test]
    fn test_trailing_bytes_ignored() {
        let mut crc = SoftCrc32::new();
        let mut data = [0u8; 24];
        data[..FRAME_LEN].copy_from_slice(&scenario_frame());
        data[FRAME_LEN..].fill(0xEE);

        let action = decode_action(&mut crc, &data).unwrap();
        assert_eq!(action.fire_times, 3);
    }

    #[test]
    fn test_pack_action_recomputes_crc() {
        let mut crc = SoftCrc32::new();
        let action = ActionData {
            sof: ACTION_SOF,
            fire_times: 3,
            abs_pitch: 1.5,
            abs_yaw: -0.5,
            reserved_slot: 0,
            crc_check: 0,
        };

        let frame = pack_action(&mut crc, &action);
        assert_eq!(frame.as_bytes(), &scenario_frame());
    }

    #[test]
    fn test_send_marker_is_not_an_action() {
        let mut crc = SoftCrc32::new();
        let frame = pack(&mut crc, &VisionSend::new(1, 0.0, 0.0));
        assert_eq!(
            decode_action(&mut crc, frame.as_bytes()),
            Err(FrameError::BadMarker)
        );
    }

    fn finite() -> impl Strategy<Value = f32> {
        -1.0e6f32..1.0e6f32
    }

    proptest! {
        #[test]
        fn prop_roundtrip_through_action_marker(
            fire in any::<i8>(),
            pitch in finite(),
            yaw in finite(),
            reserved in any::<i16>(),
        ) {
            let mut crc = SoftCrc32::new();
            let record = VisionSend {
                sof: ACTION_SOF,
                fire_times: fire,
                present_pitch: pitch,
                present_yaw: yaw,
                reserved_slot: reserved,
            };

            let frame = pack(&mut crc, &record);
            let action = unpack(&mut crc, frame.as_bytes()).unwrap();

            prop_assert_eq!(action.fire_times, fire);
            prop_assert_eq!(action.abs_pitch.to_bits(), pitch.to_bits());
            prop_assert_eq!(action.abs_yaw.to_bits(), yaw.to_bits());
            prop_assert_eq!(action.reserved_slot, reserved);
            prop_assert_eq!(action.crc_check, frame.crc());
        }

        #[test]
        fn prop_any_payload_bit_flip_is_rejected(
            fire in any::<i8>(),
            pitch in finite(),
            yaw in finite(),
            byte in 0usize..PAYLOAD_LEN,
            bit in 0u8..8,
        ) {
            let mut crc = SoftCrc32::new();
            let mut record = VisionSend::new(fire, pitch, yaw);
            record.sof = ACTION_SOF;

            let mut bytes: [u8; FRAME_LEN] = pack(&mut crc, &record).into();
            bytes[byte] ^= 1 << bit;

            prop_assert!(unpack(&mut crc, &bytes).is_none());
        }

        #[test]
        fn prop_bad_marker_skips_crc(marker in any::<u8>(), rest in any::<[u8; FRAME_LEN - 1]>()) {
            prop_assume!(marker != ACTION_SOF);

            let mut bytes = [0u8; FRAME_LEN];
            bytes[0] = marker;
            bytes[1..].copy_from_slice(&rest);

            let mut crc = CountingCrc { inner: SoftCrc32::new(), words: 0 };
            prop_assert_eq!(decode_action(&mut crc, &bytes), Err(FrameError::BadMarker));
            prop_assert_eq!(crc.words, 0);
        }

        #[test]
        fn prop_pack_is_deterministic(fire in any::<i8>(), pitch in finite(), yaw in finite()) {
            let mut crc = SoftCrc32::new();
            let record = VisionSend::new(fire, pitch, yaw);
            prop_assert_eq!(pack(&mut crc, &record), pack(&mut crc, &record));
        }
    }
}
