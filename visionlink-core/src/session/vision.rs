//! Task-side half of the vision link

use visionlink_hal::Crc32Unit;
use visionlink_protocol::{VisionSend, FRAME_LEN};

use super::shared::{Receiver, VisionLink};
use crate::link::LinkState;
use crate::transport::{Transport, TransportError};

/// Owner of the transport and the transmit buffer
///
/// The transmit buffer lives as long as the session because the transport
/// may still be reading it after [`VisionSession::send`] returns. `send`
/// takes `&mut self`, so two sends can never overlap on the same buffer.
pub struct VisionSession<C: 'static, T> {
    link: &'static VisionLink<C>,
    transport: T,
    tx_buf: [u8; FRAME_LEN],
    last_sent: Option<VisionSend>,
}

impl<C, T> VisionSession<C, T>
where
    C: Crc32Unit + Send + 'static,
    T: Transport,
{
    /// Register `link` as the transport's decode callback
    ///
    /// Returns the session and the handle through which the rest of the
    /// firmware reads inbound data.
    pub fn initialize(
        link: &'static VisionLink<C>,
        mut transport: T,
    ) -> Result<(Self, Receiver<'static, C>), TransportError<T::Error>> {
        transport.register_callback(link)?;

        #[cfg(feature = "defmt")]
        defmt::info!(
            "[vision] link up over {:?}, reload every {} ticks",
            transport.kind(),
            link.supervisor().reload_count()
        );

        let session = Self {
            link,
            transport,
            tx_buf: [0u8; FRAME_LEN],
            last_sent: None,
        };
        Ok((session, Receiver::new(link)))
    }

    /// Pack and transmit a state record
    pub fn send(&mut self, record: &VisionSend) -> Result<(), TransportError<T::Error>> {
        self.link.pack_into(record, &mut self.tx_buf);
        self.last_sent = Some(*record);
        self.transport.send(&self.tx_buf)
    }

    /// Advance the link supervisor by one tick
    ///
    /// Restarts the transport when the link has been silent for the whole
    /// reload period.
    pub fn tick(&mut self) -> LinkState {
        self.link.supervisor().tick(&mut self.transport)
    }

    /// Another read handle for the inbound record
    pub fn receiver(&self) -> Receiver<'static, C> {
        Receiver::new(self.link)
    }

    /// Last record passed to [`VisionSession::send`]
    pub fn last_sent(&self) -> Option<&VisionSend> {
        self.last_sent.as_ref()
    }

    /// Bytes of the most recently packed frame
    pub fn tx_frame(&self) -> &[u8; FRAME_LEN] {
        &self.tx_buf
    }

    /// Shared decode side
    pub fn link(&self) -> &'static VisionLink<C> {
        self.link
    }

    /// Borrow the transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Mutably borrow the transport
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }
}
