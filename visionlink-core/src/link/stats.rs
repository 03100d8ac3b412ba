//! Link statistics
//!
//! Dropped frames are never reported to callers, so these counters are the
//! only way to tell line noise from a checksum problem.

use portable_atomic::{AtomicU32, Ordering};
use visionlink_protocol::FrameError;

/// Snapshot of the link counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LinkStats {
    /// Frames decoded and published
    pub frames_ok: u32,
    /// Buffers shorter than one frame
    pub truncated: u32,
    /// Buffers with the wrong marker byte
    pub bad_marker: u32,
    /// Frames whose checksum did not match
    pub crc_mismatch: u32,
    /// Supervisor expiries
    pub expirations: u32,
}

/// Decode counters updated from interrupt context
#[derive(Debug, Default)]
pub struct LinkCounters {
    frames_ok: AtomicU32,
    truncated: AtomicU32,
    bad_marker: AtomicU32,
    crc_mismatch: AtomicU32,
}

impl LinkCounters {
    /// All counters at zero
    pub const fn new() -> Self {
        Self {
            frames_ok: AtomicU32::new(0),
            truncated: AtomicU32::new(0),
            bad_marker: AtomicU32::new(0),
            crc_mismatch: AtomicU32::new(0),
        }
    }

    /// Count one decode attempt
    pub fn record<T>(&self, result: &Result<T, FrameError>) {
        let counter = match result {
            Ok(_) => &self.frames_ok,
            Err(FrameError::Truncated) | Err(FrameError::Unaligned) => &self.truncated,
            Err(FrameError::BadMarker) => &self.bad_marker,
            Err(FrameError::CrcMismatch) => &self.crc_mismatch,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Take a snapshot; `expirations` is filled in by the caller
    pub fn snapshot(&self) -> LinkStats {
        LinkStats {
            frames_ok: self.frames_ok.load(Ordering::Relaxed),
            truncated: self.truncated.load(Ordering::Relaxed),
            bad_marker: self.bad_marker.load(Ordering::Relaxed),
            crc_mismatch: self.crc_mismatch.load(Ordering::Relaxed),
            expirations: 0,
        }
    }
}
