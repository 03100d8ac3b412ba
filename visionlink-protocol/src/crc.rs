//! CRC32 validation for vision frames
//!
//! The vision computer checksums every frame with the same algorithm as the
//! STM32 CRC peripheral, so the host-side model here has to match it bit for
//! bit: CRC-32/MPEG-2 fed with each little-endian word's bytes in
//! big-endian order.

use crc::{Crc, Digest, CRC_32_MPEG_2};
use visionlink_hal::Crc32Unit;

use crate::frame::FrameError;

/// CRC-32/MPEG-2, identical to the STM32 CRC unit when fed word by word
pub static STM32_CRC: Crc<u32> = Crc::<u32>::new(&CRC_32_MPEG_2);

/// Size of the trailing checksum in bytes
pub const CRC_LEN: usize = 4;

/// Result of checking a buffer's trailing checksum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CrcCheck {
    /// Trailing word matches the computed CRC
    Valid,
    /// Trailing word does not match
    Invalid,
}

/// Software model of the STM32 CRC unit
///
/// Used on the host and on chips without a CRC peripheral.
#[derive(Clone)]
pub struct SoftCrc32 {
    digest: Digest<'static, u32>,
}

impl SoftCrc32 {
    /// Create a unit in the reset state
    pub fn new() -> Self {
        Self {
            digest: STM32_CRC.digest(),
        }
    }
}

impl Default for SoftCrc32 {
    fn default() -> Self {
        Self::new()
    }
}

impl Crc32Unit for SoftCrc32 {
    fn reset(&mut self) {
        self.digest = STM32_CRC.digest();
    }

    fn feed_word(&mut self, word: u32) -> u32 {
        self.digest.update(&word.to_be_bytes());
        self.digest.clone().finalize()
    }
}

/// Check the trailing checksum of `buffer`
///
/// The last 4 bytes hold the expected CRC (little-endian), everything
/// before them is covered by it. The buffer length must be a multiple of 4
/// and hold at least one payload word, otherwise
/// [`FrameError::Unaligned`] is returned without touching the CRC unit.
pub fn validate<C: Crc32Unit + ?Sized>(crc: &mut C, buffer: &[u8]) -> Result<CrcCheck, FrameError> {
    if buffer.len() % 4 != 0 || buffer.len() < 2 * CRC_LEN {
        return Err(FrameError::Unaligned);
    }

    let (payload, trailer) = buffer.split_at(buffer.len() - CRC_LEN);
    let expected = u32::from_le_bytes([trailer[0], trailer[1], trailer[2], trailer[3]]);
    let computed = crc
        .calculate_le_bytes(payload)
        .ok_or(FrameError::Unaligned)?;

    if computed == expected {
        Ok(CrcCheck::Valid)
    } else {
        Ok(CrcCheck::Invalid)
    }
}
