//! State shared between the receive interrupt and task context

use core::cell::{Cell, RefCell};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use visionlink_hal::{Crc32Unit, RxSink};
use visionlink_protocol::{decode_action, pack_into, ActionData, FrameError, VisionSend, FRAME_LEN};

use crate::config::LinkConfig;
use crate::link::{LinkCounters, LinkStats, LinkSupervisor};

/// Decode side of the vision link
///
/// One instance per link, living for the whole program (a `static` or a
/// `StaticCell`). The inbound slot has a single writer (the decode
/// callback) and any number of readers; every access copies the whole
/// record inside a critical section, so a reader interrupted by a decode
/// never sees half of each frame.
pub struct VisionLink<C> {
    config: LinkConfig,
    crc: Mutex<CriticalSectionRawMutex, RefCell<C>>,
    latest: Mutex<CriticalSectionRawMutex, Cell<Option<ActionData>>>,
    supervisor: LinkSupervisor,
    counters: LinkCounters,
}

impl<C: Crc32Unit> VisionLink<C> {
    /// Create a link around a CRC unit
    pub const fn new(crc: C, config: LinkConfig) -> Self {
        let config = config.sanitized();
        Self {
            config,
            crc: Mutex::new(RefCell::new(crc)),
            latest: Mutex::new(Cell::new(None)),
            supervisor: LinkSupervisor::new(config.reload_count),
            counters: LinkCounters::new(),
        }
    }

    /// Decode one receive buffer
    ///
    /// On success the inbound slot is overwritten and the supervisor is
    /// reloaded. On failure nothing but the statistics changes: consumers
    /// keep seeing the last good frame.
    pub fn decode(&self, bytes: &[u8]) -> Result<ActionData, FrameError> {
        let result = self
            .crc
            .lock(|crc| decode_action(&mut *crc.borrow_mut(), bytes));
        self.counters.record(&result);

        match result {
            Ok(action) => {
                self.latest.lock(|slot| slot.set(Some(action)));
                self.supervisor.reload();
            }
            Err(_e) => {
                #[cfg(feature = "defmt")]
                defmt::trace!("[vision] frame dropped: {:?}", _e);
            }
        }

        result
    }

    /// Pack a state record into `buf` using the shared CRC unit
    pub fn pack_into(&self, record: &VisionSend, buf: &mut [u8; FRAME_LEN]) {
        self.crc
            .lock(|crc| pack_into(&mut *crc.borrow_mut(), record, buf));
    }

    /// Latest successfully decoded frame, if any
    pub fn latest(&self) -> Option<ActionData> {
        self.latest.lock(|slot| slot.get())
    }

    /// Link supervisor
    pub fn supervisor(&self) -> &LinkSupervisor {
        &self.supervisor
    }

    /// Configuration in effect
    pub fn config(&self) -> &LinkConfig {
        &self.config
    }

    /// Decode and supervision counters
    pub fn stats(&self) -> LinkStats {
        LinkStats {
            expirations: self.supervisor.expirations(),
            ..self.counters.snapshot()
        }
    }
}

impl<C: Crc32Unit + Send> RxSink for VisionLink<C> {
    fn on_receive(&self, data: &[u8]) {
        let _ = self.decode(data);
    }
}

/// Read handle for the latest inbound record
///
/// Reading never blocks and never waits for a new frame: callers that need
/// fresh data check [`Receiver::is_online`] as well.
pub struct Receiver<'a, C> {
    link: &'a VisionLink<C>,
}

impl<C> Clone for Receiver<'_, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for Receiver<'_, C> {}

impl<'a, C: Crc32Unit> Receiver<'a, C> {
    /// Create a handle for `link`
    pub fn new(link: &'a VisionLink<C>) -> Self {
        Self { link }
    }

    /// Latest good frame (`None` until the first one arrives)
    pub fn latest(&self) -> Option<ActionData> {
        self.link.latest()
    }

    /// Check if a frame arrived since the supervisor last expired
    pub fn is_online(&self) -> bool {
        self.link.supervisor().is_online()
    }

    /// Link counters
    pub fn stats(&self) -> LinkStats {
        self.link.stats()
    }
}
