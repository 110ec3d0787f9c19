//! RS-485 link handling
//!
//! The receive side is split across two contexts: the UART reader pushes
//! bytes into a [`FrameMailbox`] as they arrive, and the main cycle drains
//! completed frames through the [`LinkScheduler`], which also paces the
//! outgoing control frames.

pub mod health;
pub mod mailbox;
pub mod scheduler;

pub use health::{LinkHealth, LinkStats};
pub use mailbox::{FrameMailbox, RxCounters};
pub use scheduler::{LinkError, LinkEvent, LinkScheduler, TxPhase, INTER_FRAME_GAP};
