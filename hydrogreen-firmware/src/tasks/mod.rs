//! Embassy async tasks
//!
//! Each task runs independently and communicates via the statics in
//! [`crate::channels`].

pub mod dashboard;
pub mod display_tx;
pub mod link_rx;

pub use dashboard::{dashboard_task, Buttons};
pub use display_tx::display_tx_task;
pub use link_rx::link_rx_task;
