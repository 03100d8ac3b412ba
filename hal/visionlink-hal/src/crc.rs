//! CRC32 peripheral abstraction
//!
//! Models the STM32 CRC calculation unit: polynomial `0x04C11DB7`, initial
//! value `0xFFFFFFFF`, no reflection and no final XOR, fed one 32-bit word
//! at a time (most significant bit first).

/// Value of the CRC data register after a reset
pub const CRC32_INIT: u32 = 0xFFFF_FFFF;

/// CRC32 calculation unit
///
/// Implemented by the hardware peripheral on target and by a software
/// model on the host. Both sides of the vision link must agree on the
/// algorithm bit for bit.
pub trait Crc32Unit {
    /// Reset the unit to [`CRC32_INIT`]
    fn reset(&mut self);

    /// Feed one word and return the running CRC
    fn feed_word(&mut self, word: u32) -> u32;

    /// Compute the CRC of `words` from a fresh state
    ///
    /// Equivalent to `HAL_CRC_Calculate(buffer, word_count)`.
    fn calculate(&mut self, words: &[u32]) -> u32 {
        self.reset();
        let mut crc = CRC32_INIT;
        for &word in words {
            crc = self.feed_word(word);
        }
        crc
    }

    /// Compute the CRC of a byte buffer laid out as little-endian words
    ///
    /// Returns `None` if the length is not a multiple of 4.
    fn calculate_le_bytes(&mut self, bytes: &[u8]) -> Option<u32> {
        if bytes.len() % 4 != 0 {
            return None;
        }

        self.reset();
        let mut crc = CRC32_INIT;
        for chunk in bytes.chunks_exact(4) {
            let word = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
            crc = self.feed_word(word);
        }
        Some(crc)
    }
}
