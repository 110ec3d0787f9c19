//! Board-agnostic core logic for the Hydrogreen dashboard firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Hardware abstraction traits (display surface, button source)
//! - Link scheduler and the receive-side frame mailbox
//! - Page selection state machine and per-page updaters
//! - Configuration type definitions

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod dashboard;
pub mod link;
pub mod pages;
pub mod state;
pub mod traits;

#[cfg(test)]
pub(crate) mod testing;

pub use dashboard::Dashboard;
