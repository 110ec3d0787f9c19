//! Inter-task communication
//!
//! Defines the statics shared between Embassy tasks.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use hydrogreen_core::link::FrameMailbox;
use hydrogreen_protocol::SyncPolicy;

use crate::display::NextionCommand;

/// Display commands queued per main cycle before writes report busy
pub const DISPLAY_CHANNEL_SIZE: usize = 8;

/// Telemetry bytes from the link UART, drained by the dashboard task
///
/// The sync policy is replaced with the configured one at boot.
pub static LINK_MAILBOX: FrameMailbox<CriticalSectionRawMutex> =
    FrameMailbox::new(SyncPolicy::Realign);

/// Encoded Nextion commands waiting for the display UART
pub static DISPLAY_CHANNEL: Channel<
    CriticalSectionRawMutex,
    NextionCommand,
    DISPLAY_CHANNEL_SIZE,
> = Channel::new();
