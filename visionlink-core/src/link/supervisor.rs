//! Link supervisor implementation
//!
//! A reload-counted watchdog. Every successfully decoded frame reloads the
//! counter (interrupt context); the periodic tick (task context) counts it
//! down. When it reaches zero the transport is restarted and the counter is
//! reloaded, so a dead link is retried once per period, indefinitely.

use portable_atomic::{AtomicBool, AtomicU16, AtomicU32, Ordering};

use crate::transport::Transport;

/// Link state reported by a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkState {
    /// A frame arrived within the reload period
    Alive,
    /// The period elapsed without a frame; the transport was restarted
    Expired,
}

/// Reload-counted watchdog for the vision link
#[derive(Debug)]
pub struct LinkSupervisor {
    /// Ticks allowed between good frames
    reload_count: u16,
    /// Ticks left before expiry; never zero outside `tick`
    remaining: AtomicU16,
    /// A frame arrived since the last expiry
    online: AtomicBool,
    /// Number of expiries so far
    expirations: AtomicU32,
    /// Number of restarts the transport reported as failed
    failed_reinits: AtomicU32,
}

impl LinkSupervisor {
    /// Create a supervisor with the given threshold
    ///
    /// A threshold of 0 is treated as 1. The link starts offline.
    pub const fn new(reload_count: u16) -> Self {
        let reload_count = if reload_count == 0 { 1 } else { reload_count };
        Self {
            reload_count,
            remaining: AtomicU16::new(reload_count),
            online: AtomicBool::new(false),
            expirations: AtomicU32::new(0),
            failed_reinits: AtomicU32::new(0),
        }
    }

    /// Feed the watchdog
    ///
    /// Called after every successful decode. Interrupt safe.
    pub fn reload(&self) {
        self.remaining.store(self.reload_count, Ordering::Release);
        self.online.store(true, Ordering::Release);
    }

    /// Advance one period tick
    ///
    /// On expiry the owner transport is restarted. The restart is assumed to
    /// work: a failure is counted and logged, and the next period simply
    /// tries again.
    pub fn tick<T: Transport>(&self, owner: &mut T) -> LinkState {
        let previous = self.remaining.fetch_sub(1, Ordering::AcqRel);
        if previous > 1 {
            return LinkState::Alive;
        }

        if !self.rearm() {
            return LinkState::Alive;
        }
        self.expirations.fetch_add(1, Ordering::Relaxed);

        if owner.reinit().is_err() {
            self.failed_reinits.fetch_add(1, Ordering::Relaxed);
            #[cfg(feature = "defmt")]
            defmt::error!("[vision] transport restart failed");
        }

        #[cfg(feature = "defmt")]
        defmt::warn!("[vision] vision offline, restart communication.");

        LinkState::Expired
    }

    /// Re-arm an expired counter
    ///
    /// Returns false if a frame reloaded the counter after the decrement,
    /// in which case the link stays online and nothing is restarted.
    fn rearm(&self) -> bool {
        self.online.store(false, Ordering::Release);
        let rearmed = self
            .remaining
            .compare_exchange(0, self.reload_count, Ordering::AcqRel, Ordering::Acquire)
            .is_ok();
        if !rearmed {
            // reload() ran to completion in between
            self.online.store(true, Ordering::Release);
        }
        rearmed
    }

    /// Configured threshold in ticks
    pub fn reload_count(&self) -> u16 {
        self.reload_count
    }

    /// Ticks left before the next expiry
    pub fn remaining(&self) -> u16 {
        self.remaining.load(Ordering::Acquire)
    }

    /// Check if a frame has arrived since the last expiry
    pub fn is_online(&self) -> bool {
        self.online.load(Ordering::Acquire)
    }

    /// Number of expiries so far
    pub fn expirations(&self) -> u32 {
        self.expirations.load(Ordering::Relaxed)
    }

    /// Number of transport restarts that reported an error
    pub fn failed_reinits(&self) -> u32 {
        self.failed_reinits.load(Ordering::Relaxed)
    }
}
