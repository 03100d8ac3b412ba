//! Hardware CRC unit

use embassy_stm32::crc::Crc;
use visionlink_hal::Crc32Unit;

/// The STM32 CRC peripheral
///
/// Computes exactly what the vision computer computes, so frames checked
/// here and with `SoftCrc32` on the host agree.
pub struct HwCrc {
    crc: Crc<'static>,
}

impl HwCrc {
    /// Take ownership of the peripheral driver
    pub fn new(crc: Crc<'static>) -> Self {
        Self { crc }
    }
}

impl Crc32Unit for HwCrc {
    fn reset(&mut self) {
        self.crc.reset();
    }

    fn feed_word(&mut self, word: u32) -> u32 {
        self.crc.feed_word(word)
    }

    fn calculate(&mut self, words: &[u32]) -> u32 {
        self.crc.reset();
        self.crc.feed_words(words)
    }
}
