//! Dashboard main cycle task
//!
//! Runs at the configured tick rate: samples the buttons, then hands the
//! cycle to the core dashboard, which drains telemetry, updates pages and
//! clocks out one control frame byte.

use defmt::*;
use embassy_time::{Duration, Ticker};

use hydrogreen_core::config::DashboardConfig;
use hydrogreen_core::dashboard::CycleReport;
use hydrogreen_core::link::LinkEvent;
use hydrogreen_core::state::PageEvent;
use hydrogreen_core::traits::{ButtonPanel, ButtonSource};
use hydrogreen_core::Dashboard;
use hydrogreen_hal::ActiveLow;

use crate::channels::{DISPLAY_CHANNEL, LINK_MAILBOX};
use crate::display::NextionDisplay;
use crate::io::{ButtonPin, LinkTx, LinkTxError};

/// Buttons are wired to ground with pull-ups
pub type Buttons = ButtonPanel<ActiveLow<ButtonPin>>;

/// Seconds between link statistics reports
const STATS_INTERVAL_S: u32 = 10;

/// Dashboard task - owns the link scheduler and page controller
#[embassy_executor::task]
pub async fn dashboard_task(config: DashboardConfig, mut buttons: Buttons, mut tx: LinkTx) {
    info!("Dashboard task started");

    let mut dashboard = Dashboard::new(&config);
    let mut display = NextionDisplay::new(DISPLAY_CHANNEL.sender());
    let mut ticker = Ticker::every(Duration::from_hz(u64::from(config.tick_hz)));

    let stats_every = config.tick_hz.saturating_mul(STATS_INTERVAL_S).max(1);
    let mut cycles: u32 = 0;

    loop {
        ticker.next().await;

        let state = buttons.read();
        let report = dashboard.tick(&state, &mut tx, &LINK_MAILBOX, &mut display);
        log_report(&report);

        cycles = cycles.wrapping_add(1);
        if cycles % stats_every == 0 {
            let stats = dashboard.link().stats();
            debug!(
                "Link {:?}: {} accepted, {} desyncs, {} checksum errors, {} sent",
                dashboard.link().health(),
                stats.frames_accepted,
                stats.desyncs,
                stats.checksum_errors,
                stats.frames_sent
            );
        }
    }
}

fn log_report(report: &CycleReport<LinkTxError>) {
    match &report.link {
        Ok(LinkEvent::Idle) => {}
        Ok(LinkEvent::FrameAccepted) => trace!("Telemetry accepted"),
        Ok(LinkEvent::ChecksumMismatch { received, computed }) => {
            warn!(
                "Telemetry checksum mismatch: got {:#x}, expected {:#x}",
                received, computed
            );
        }
        Ok(LinkEvent::FrameRejected(e)) => warn!("Telemetry rejected: {:?}", e),
        Ok(LinkEvent::Desynced { count }) => warn!("Link desync ({} windows dropped)", count),
        Ok(LinkEvent::TimedOut) => warn!("No telemetry from main controller"),
        Err(e) => warn!("Control frame byte not sent: {:?}", e),
    }

    match report.page {
        None => {}
        Some(PageEvent::InitComplete(page)) => info!("Init complete, showing {:?}", page),
        Some(PageEvent::Transition { from, to }) => debug!("Page {:?} -> {:?}", from, to),
        Some(PageEvent::PageLoaded(page)) => debug!("Page {:?} loaded after retry", page),
        Some(PageEvent::DeviceReset) => info!("Reset combo held, restarting display"),
        Some(PageEvent::EmergencyCycleComplete) => trace!("Emergency blink cycle complete"),
        Some(PageEvent::WriteRejected(e)) => warn!("Display field skipped: {:?}", e),
    }
}
