//! Hydrogreen Hardware Abstraction Layer
//!
//! This crate defines the small set of hardware traits the dashboard logic
//! needs. Board firmware implements them on top of the chip HAL; host tests
//! implement them with in-memory doubles.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  hydrogreen-firmware (embassy-stm32)    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  hydrogreen-hal (this crate - traits)   │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  hydrogreen-core (link + page logic)    │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`uart::ByteTx`] - Single-byte serial transmit
//! - [`gpio::InputPin`] - Digital input

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod uart;

// Re-export key traits at crate root for convenience
pub use gpio::{ActiveLow, InputPin};
pub use uart::{ByteTx, UartConfig};
