//! Page controller
//!
//! Runs the init sequence until it picks a first page, then applies the
//! priority rules every cycle and drives the active page's updater. The
//! reset combo is the only way back to init.

use hydrogreen_protocol::{ButtonState, TelemetryFrame};

use super::{EmergencyPage, InitPage, LeakPage, Mode1Page};
use crate::config::{DashboardCapabilities, DashboardConfig, TickTiming};
use crate::state::{PageEvent, PageId, PageInputs};
use crate::traits::{DisplayError, DisplaySurface};

/// Page-local tick counters, for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LocalCounters {
    pub init: u32,
    pub mode1: u32,
    pub emergency: u32,
    pub leak: u32,
    pub reset_hold: u32,
}

/// Page selection context
pub struct PageController {
    page: PageId,
    init_complete: bool,
    /// Page switched to but not yet accepted by the display
    pending_load: Option<PageId>,
    reset_hold: u32,
    timing: TickTiming,
    capabilities: DashboardCapabilities,
    speed_full_scale: u8,
    init: InitPage,
    mode1: Mode1Page,
    emergency: EmergencyPage,
    leak: LeakPage,
}

impl PageController {
    /// Create a controller that starts with the init sequence
    pub fn new(config: &DashboardConfig) -> Self {
        Self {
            page: PageId::Init,
            init_complete: false,
            pending_load: None,
            reset_hold: 0,
            timing: config.ticks(),
            capabilities: config.capabilities,
            speed_full_scale: config.speed_bar_full_scale,
            init: InitPage::default(),
            mode1: Mode1Page::default(),
            emergency: EmergencyPage::default(),
            leak: LeakPage::default(),
        }
    }

    /// Active page
    pub fn page(&self) -> PageId {
        self.page
    }

    /// Check if the init sequence has finished
    pub fn init_complete(&self) -> bool {
        self.init_complete
    }

    /// Page waiting for the display to accept a load
    pub fn pending_load(&self) -> Option<PageId> {
        self.pending_load
    }

    /// Current page-local counters
    pub fn local_counters(&self) -> LocalCounters {
        LocalCounters {
            init: self.init.ticks(),
            mode1: self.mode1.ticks(),
            emergency: self.emergency.ticks(),
            leak: self.leak.ticks(),
            reset_hold: self.reset_hold,
        }
    }

    /// Init page state
    pub fn init_page(&self) -> &InitPage {
        &self.init
    }

    /// Run one cycle
    pub fn step<D: DisplaySurface>(
        &mut self,
        display: &mut D,
        telemetry: &TelemetryFrame,
        buttons: &ButtonState,
    ) -> Option<PageEvent> {
        let inputs = PageInputs::sample(telemetry, buttons);

        if !self.init_complete {
            let page = self
                .init
                .update(display, &self.timing, &self.capabilities, &inputs)?;
            self.clear_locals();
            self.page = page;
            self.init_complete = true;
            return Some(PageEvent::InitComplete(page));
        }

        let mut event = self.choose_page(&inputs);
        if event == Some(PageEvent::DeviceReset) {
            return event;
        }

        if let Some(page) = self.pending_load {
            if display.load_page(page.display_page()).is_err() {
                return event;
            }
            self.pending_load = None;
            event = event.or(Some(PageEvent::PageLoaded(page)));
        }

        match self.page {
            PageId::Init => {}
            PageId::Mode1 => {
                let written = self.mode1.update(
                    display,
                    self.timing.refresh,
                    self.speed_full_scale,
                    &self.capabilities,
                    telemetry,
                    buttons,
                );
                // Busy writes are retried by the updater
                if let Err(err @ DisplayError::InvalidCommand) = written {
                    event = event.or(Some(PageEvent::WriteRejected(err)));
                }
            }
            PageId::Emergency => {
                if self.emergency.update(display, &self.timing) {
                    event = event.or(Some(PageEvent::EmergencyCycleComplete));
                }
            }
            PageId::Leak => self.leak.update(display, &self.timing, &self.capabilities),
        }

        event
    }

    fn choose_page(&mut self, inputs: &PageInputs) -> Option<PageEvent> {
        if let Some(next) = self.page.next(inputs) {
            let from = self.page;
            self.clear_locals();
            self.page = next;
            self.pending_load = Some(next);
            return Some(PageEvent::Transition { from, to: next });
        }

        if inputs.reset_combo {
            self.reset_hold = self.reset_hold.saturating_add(1);
            if self.reset_hold >= self.timing.reset_hold {
                self.clear_locals();
                self.pending_load = None;
                self.init_complete = false;
                self.page = PageId::Init;
                return Some(PageEvent::DeviceReset);
            }
        } else {
            self.reset_hold = 0;
        }

        None
    }

    fn clear_locals(&mut self) {
        self.init.reset();
        self.mode1.reset();
        self.emergency.reset();
        self.leak.reset();
        self.reset_hold = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PageTiming;
    use crate::pages::InitStep;
    use crate::testing::{Command, FakeDisplay};

    fn config() -> DashboardConfig {
        DashboardConfig {
            timing: PageTiming {
                display_boot_ms: 2,
                splash_ms: 5,
                reset_hold_ms: 20,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn telemetry(leak: u8, emergency: u8) -> TelemetryFrame {
        TelemetryFrame {
            h2_leak: leak,
            emergency_button: emergency,
            ..Default::default()
        }
    }

    fn booted(display: &mut FakeDisplay) -> PageController {
        let mut pages = PageController::new(&config());
        let idle = ButtonState::default();
        for _ in 0..100 {
            if let Some(PageEvent::InitComplete(_)) =
                pages.step(display, &telemetry(0, 0), &idle)
            {
                display.take();
                return pages;
            }
        }
        panic!("init did not complete");
    }

    fn step_n(
        pages: &mut PageController,
        display: &mut FakeDisplay,
        telemetry: &TelemetryFrame,
        buttons: &ButtonState,
        n: u32,
    ) -> Vec<PageEvent> {
        (0..n)
            .filter_map(|_| pages.step(display, telemetry, buttons))
            .collect()
    }

    #[test]
    fn test_boots_into_mode1() {
        let mut display = FakeDisplay::new();
        let pages = booted(&mut display);
        assert_eq!(pages.page(), PageId::Mode1);
        assert!(pages.init_complete());
        assert_eq!(pages.local_counters(), LocalCounters::default());
    }

    #[test]
    fn test_rules_wait_for_init() {
        let mut display = FakeDisplay::new();
        let mut pages = PageController::new(&config());
        let events = step_n(
            &mut pages,
            &mut display,
            &telemetry(1, 0),
            &ButtonState::default(),
            3,
        );
        assert!(events.is_empty());
        assert_eq!(pages.page(), PageId::Init);
    }

    #[test]
    fn test_leak_and_emergency_selects_leak() {
        let mut display = FakeDisplay::new();
        let mut pages = booted(&mut display);

        let event = pages.step(&mut display, &telemetry(1, 1), &ButtonState::default());
        assert_eq!(
            event,
            Some(PageEvent::Transition {
                from: PageId::Mode1,
                to: PageId::Leak
            })
        );
        assert_eq!(pages.page(), PageId::Leak);
        assert_eq!(display.take(), vec![Command::Page(3)]);
    }

    #[test]
    fn test_unchanged_inputs_are_idempotent() {
        let mut display = FakeDisplay::new();
        let mut pages = booted(&mut display);
        let idle = ButtonState::default();

        for (leak, emergency) in [(0, 1), (1, 1), (0, 0)] {
            let frame = telemetry(leak, emergency);
            let first = step_n(&mut pages, &mut display, &frame, &idle, 1);
            assert_eq!(first.len(), 1);
            let settled = pages.page();

            let later = step_n(&mut pages, &mut display, &frame, &idle, 50);
            assert!(later
                .iter()
                .all(|e| !matches!(e, PageEvent::Transition { .. })));
            assert_eq!(pages.page(), settled);
        }
    }

    #[test]
    fn test_transition_clears_page_counters() {
        let mut display = FakeDisplay::new();
        let mut pages = booted(&mut display);
        let idle = ButtonState::default();

        step_n(&mut pages, &mut display, &telemetry(0, 1), &idle, 7);
        assert_eq!(pages.local_counters().emergency, 7);

        pages.step(&mut display, &telemetry(0, 0), &idle);
        assert_eq!(pages.page(), PageId::Mode1);
        assert_eq!(pages.local_counters().emergency, 0);
    }

    #[test]
    fn test_reset_combo_reinitializes() {
        let mut display = FakeDisplay::new();
        let mut pages = booted(&mut display);
        let combo = ButtonState {
            mode1: true,
            mode2: true,
            ..Default::default()
        };

        let events = step_n(&mut pages, &mut display, &telemetry(0, 0), &combo, 19);
        assert!(events.is_empty());
        assert_eq!(pages.local_counters().reset_hold, 19);

        let event = pages.step(&mut display, &telemetry(0, 0), &combo);
        assert_eq!(event, Some(PageEvent::DeviceReset));
        assert_eq!(pages.page(), PageId::Init);
        assert!(!pages.init_complete());
        assert_eq!(pages.local_counters(), LocalCounters::default());
        assert_eq!(pages.init_page().step(), InitStep::ResetDisplay);

        // Init runs again from the panel reset
        display.take();
        pages.step(&mut display, &telemetry(0, 0), &ButtonState::default());
        assert_eq!(display.take(), vec![Command::Reset]);
    }

    #[test]
    fn test_short_combo_is_forgotten() {
        let mut display = FakeDisplay::new();
        let mut pages = booted(&mut display);
        let combo = ButtonState {
            mode1: true,
            mode2: true,
            ..Default::default()
        };
        let idle = ButtonState::default();

        step_n(&mut pages, &mut display, &telemetry(0, 0), &combo, 19);
        pages.step(&mut display, &telemetry(0, 0), &idle);
        assert_eq!(pages.local_counters().reset_hold, 0);

        let events = step_n(&mut pages, &mut display, &telemetry(0, 0), &combo, 19);
        assert!(events.is_empty());
        assert_eq!(pages.page(), PageId::Mode1);
    }

    #[test]
    fn test_busy_page_load_is_retried() {
        let mut display = FakeDisplay::new();
        let mut pages = booted(&mut display);
        let idle = ButtonState::default();

        display.busy = true;
        pages.step(&mut display, &telemetry(0, 1), &idle);
        assert_eq!(pages.page(), PageId::Emergency);
        assert_eq!(pages.pending_load(), Some(PageId::Emergency));

        display.busy = false;
        let event = pages.step(&mut display, &telemetry(0, 1), &idle);
        assert_eq!(event, Some(PageEvent::PageLoaded(PageId::Emergency)));
        assert_eq!(pages.pending_load(), None);
        assert_eq!(display.take(), vec![Command::Page(4)]);
    }

    #[test]
    fn test_mode1_updates_after_boot() {
        let mut display = FakeDisplay::new();
        let mut pages = booted(&mut display);
        let frame = TelemetryFrame {
            speed: 50,
            ..Default::default()
        };

        step_n(&mut pages, &mut display, &frame, &ButtonState::default(), 5);
        assert_eq!(display.take(), vec![Command::Progress("SB".into(), 100)]);
    }

    #[test]
    fn test_rejected_mode1_write_is_reported() {
        let mut display = FakeDisplay::new();
        let mut pages = booted(&mut display);
        display.reject_floats = true;
        let frame = TelemetryFrame {
            fc_voltage: 1.0e33,
            ..Default::default()
        };
        let idle = ButtonState::default();

        // SB, ms, V, SB, ms, mi, SB, ms, sec, SB, ms, FCV
        let events = step_n(&mut pages, &mut display, &frame, &idle, 5 * 12);
        assert_eq!(
            events,
            vec![PageEvent::WriteRejected(DisplayError::InvalidCommand)]
        );

        let written = step_n(&mut pages, &mut display, &frame, &idle, 5);
        assert!(written.is_empty());
        assert_eq!(display.commands.last(), Some(&Command::Progress("SB".into(), 0)));
    }
}
