//! Page selection state machine
//!
//! Which page the dashboard shows is a pure function of the current page
//! and the safety flags and buttons sampled this cycle.

pub mod events;
pub mod machine;

pub use events::PageEvent;
pub use machine::{PageId, PageInputs};
