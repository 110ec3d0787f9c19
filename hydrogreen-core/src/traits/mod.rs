//! Hardware abstraction traits
//!
//! These traits define the interface between the core page logic and the
//! board-specific display and input hardware.

pub mod buttons;
pub mod display;

pub use buttons::{ButtonPanel, ButtonSource};
pub use display::{Color, DisplayError, DisplaySurface, GpioMode, Rect};
