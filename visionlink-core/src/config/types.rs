//! Link configuration types

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use visionlink_protocol::FRAME_LEN;

/// Supervisor reload count for the UART build (ticks)
pub const UART_RELOAD_COUNT: u16 = 10;

/// Supervisor reload count for the USB build (ticks, 50 ms at a 10 ms tick)
pub const VCP_RELOAD_COUNT: u16 = 5;

/// Receive buffer size requested from the transport
pub const VISION_RECV_SIZE: usize = FRAME_LEN;

/// Transport variant carrying the link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TransportKind {
    /// UART with DMA reception and interrupt-driven transmit
    UartDma,
    /// USB CDC-ACM virtual COM port
    UsbVcp,
}

/// Vision link configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LinkConfig {
    /// Transport this configuration targets
    pub transport: TransportKind,
    /// Supervisor ticks without a good frame before the transport is restarted
    pub reload_count: u16,
    /// Bytes per receive transfer
    pub recv_size: usize,
}

impl LinkConfig {
    /// Defaults for the DMA UART build
    pub const UART: Self = Self {
        transport: TransportKind::UartDma,
        reload_count: UART_RELOAD_COUNT,
        recv_size: VISION_RECV_SIZE,
    };

    /// Defaults for the USB virtual COM port build
    pub const VCP: Self = Self {
        transport: TransportKind::UsbVcp,
        reload_count: VCP_RELOAD_COUNT,
        recv_size: VISION_RECV_SIZE,
    };

    /// Defaults for the given transport
    pub const fn for_transport(transport: TransportKind) -> Self {
        match transport {
            TransportKind::UartDma => Self::UART,
            TransportKind::UsbVcp => Self::VCP,
        }
    }

    /// Clamp values the link cannot run with
    ///
    /// A zero reload count becomes 1 and the receive size is never smaller
    /// than one frame.
    pub const fn sanitized(self) -> Self {
        Self {
            transport: self.transport,
            reload_count: if self.reload_count == 0 { 1 } else { self.reload_count },
            recv_size: if self.recv_size < FRAME_LEN { FRAME_LEN } else { self.recv_size },
        }
    }
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self::UART
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_per_transport_defaults() {
        assert_eq!(LinkConfig::for_transport(TransportKind::UartDma).reload_count, 10);
        assert_eq!(LinkConfig::for_transport(TransportKind::UsbVcp).reload_count, 5);
        assert_eq!(LinkConfig::default().recv_size, 16);
    }

    #[test]
    fn test_sanitized_clamps() {
        let config = LinkConfig {
            transport: TransportKind::UartDma,
            reload_count: 0,
            recv_size: 4,
        }
        .sanitized();

        assert_eq!(config.reload_count, 1);
        assert_eq!(config.recv_size, FRAME_LEN);
    }
}
