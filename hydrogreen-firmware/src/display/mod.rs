//! Nextion HMI display
//!
//! Page updaters talk to a [`NextionDisplay`], which encodes each call as a
//! Nextion instruction and queues it for the display TX task.

pub mod nextion;

pub use nextion::{NextionCommand, NextionDisplay};
