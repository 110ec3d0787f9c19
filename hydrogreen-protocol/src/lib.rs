//! Hydrogreen RS-485 Link Protocol
//!
//! This crate defines the serial protocol between the dashboard and the
//! vehicle's main controller. Both directions use fixed-length frames with
//! no length or type header; a frame ends with a marker byte and carries a
//! one-byte checksum.
//!
//! # Frame Overview
//!
//! Dashboard → controller (control frame, 11 bytes):
//! ```text
//! ┌──────────────────────┬──────┬──────────┐
//! │ BUTTON FLAGS         │ EOT  │ CHECKSUM │
//! │ 9 × 1B               │ 0x17 │ 1B       │
//! └──────────────────────┴──────┴──────────┘
//! ```
//!
//! Controller → dashboard (telemetry frame, 39 bytes):
//! ```text
//! ┌──────────────────────┬──────────┬──────┐
//! │ TELEMETRY FIELDS     │ CHECKSUM │ EOT  │
//! │ 37B (1/2/4B, LE)     │ 1B       │ 0x17 │
//! └──────────────────────┴──────────┴──────┘
//! ```
//!
//! The trailing marker is the only synchronization signal the receiver has.
//! [`LinkAssembler`] collects bytes until a full frame is held and checks the
//! marker; what happens on a mismatch is selected by [`SyncPolicy`].

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(unsafe_code)]

pub mod assembler;
pub mod buttons;
pub mod checksum;
pub mod frame;

pub use assembler::{AssemblerEvent, LinkAssembler, SyncPolicy, ASSEMBLY_CAPACITY};
pub use buttons::{ButtonState, WIRE_FLAG_COUNT};
pub use checksum::{Checksum, Crc8};
pub use frame::{
    ChecksumPolicy, ControlFrame, FrameError, TelemetryFrame, CONTROL_FRAME_LEN, EOT_BYTE,
    SOT_BYTE, TELEMETRY_FRAME_LEN, TELEMETRY_PAYLOAD_LEN,
};
