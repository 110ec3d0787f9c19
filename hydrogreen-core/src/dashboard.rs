//! One main cycle of the dashboard
//!
//! [`Dashboard`] owns the link scheduler and the page controller and runs
//! them in a fixed order each tick: one link step (drain received telemetry,
//! clock out one control frame byte), then a page update from the latest
//! telemetry.

use embassy_sync::blocking_mutex::raw::RawMutex;
use hydrogreen_hal::ByteTx;
use hydrogreen_protocol::{ButtonState, Checksum, Crc8};

use crate::config::DashboardConfig;
use crate::link::{FrameMailbox, LinkError, LinkEvent, LinkScheduler};
use crate::pages::PageController;
use crate::state::PageEvent;
use crate::traits::DisplaySurface;

/// What happened during one cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleReport<E> {
    /// Link step outcome; a transmit failure replaces the receive event,
    /// though received telemetry is still applied
    pub link: Result<LinkEvent, LinkError<E>>,
    /// Page controller event
    pub page: Option<PageEvent>,
}

/// Dashboard context
pub struct Dashboard<C: Checksum = Crc8> {
    link: LinkScheduler<C>,
    pages: PageController,
}

impl Dashboard<Crc8> {
    /// Create a dashboard using the software CRC-8
    pub fn new(config: &DashboardConfig) -> Self {
        Self::with_checksum(Crc8, config)
    }
}

impl<C: Checksum> Dashboard<C> {
    /// Create a dashboard with a board-supplied checksum primitive
    pub fn with_checksum(checksum: C, config: &DashboardConfig) -> Self {
        Self {
            link: LinkScheduler::with_checksum(checksum, config.link, config.ticks().link_timeout),
            pages: PageController::new(config),
        }
    }

    /// Link scheduler state
    pub fn link(&self) -> &LinkScheduler<C> {
        &self.link
    }

    /// Page controller state
    pub fn pages(&self) -> &PageController {
        &self.pages
    }

    /// Run one main cycle
    pub fn tick<T, M, D>(
        &mut self,
        buttons: &ButtonState,
        tx: &mut T,
        mailbox: &FrameMailbox<M>,
        display: &mut D,
    ) -> CycleReport<T::Error>
    where
        T: ByteTx,
        M: RawMutex,
        D: DisplaySurface,
    {
        let link = self.link.step(tx, buttons, mailbox);
        let page = self.pages.step(display, self.link.telemetry(), buttons);

        CycleReport { link, page }
    }
}
