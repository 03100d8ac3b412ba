//! Protocol session
//!
//! The session is split along execution contexts:
//!
//! - [`VisionLink`] is shared with the receive interrupt. It owns the
//!   latest inbound record, the CRC unit and the supervisor, and is the
//!   decode callback registered with the transport.
//! - [`VisionSession`] lives in task context. It owns the transport and the
//!   persistent transmit buffer.
//! - [`Receiver`] is the read-only handle the rest of the firmware polls.

pub mod shared;
pub mod vision;

pub use shared::{Receiver, VisionLink};
pub use vision::VisionSession;
