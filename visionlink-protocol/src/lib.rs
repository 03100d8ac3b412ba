//! Vision Link Protocol
//!
//! This crate defines the fixed-frame binary protocol between the gimbal
//! controller and the vision computer. Every message is exactly 16 bytes
//! and protected by a CRC32 computed the way the STM32 CRC peripheral does.
//!
//! # Frame Layout
//!
//! ```text
//! ┌─────┬───────┬─────────┬─────────┬──────────┬─────────┐
//! │ SOF │ COUNT │ PITCH   │ YAW     │ RESERVED │ CRC32   │
//! │ 1B  │ 1B i8 │ 4B f32  │ 4B f32  │ 2B i16   │ 4B u32  │
//! └─────┴───────┴─────────┴─────────┴──────────┴─────────┘
//! ```
//!
//! All multi-byte fields are little-endian. The CRC covers bytes 0..12.
//!
//! Malformed input never surfaces as a panic: a frame with the wrong
//! marker or a bad checksum is simply not decoded, and the caller keeps
//! the last good record.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod crc;
pub mod frame;
pub mod records;

pub use crate::crc::{validate, CrcCheck, SoftCrc32, CRC_LEN};
pub use frame::{decode_action, pack, pack_action, pack_into, unpack, Frame, FrameError, FRAME_LEN, PAYLOAD_LEN};
pub use records::{ActionData, VisionSend, ACTION_SOF, SEND_SOF};
