//! Page controller and per-page updaters
//!
//! The controller picks the active page each cycle and hands the cycle to
//! that page's updater. Updaters are small timed state machines that write
//! to the display one command at a time and retry while it is busy.

pub mod controller;
pub mod emergency;
pub mod init;
pub mod leak;
pub mod mode1;

pub use controller::{LocalCounters, PageController};
pub use emergency::{EmergencyPage, EmergencyPhase};
pub use init::{InitPage, InitStep};
pub use leak::{LeakPage, LeakPhase};
pub use mode1::{FastField, Mode1Page, Mode1Slot, SlowField};

/// Expansion-board pin driving the speed-reset lamp and the leak alarm
pub const EXPANSION_ALARM_PIN: u8 = 7;

/// Number of expansion-board GPIOs
pub const EXPANSION_GPIO_COUNT: u8 = 8;
