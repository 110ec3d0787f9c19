//! Leak page: expansion-board alarm output
//!
//! The page itself is static; with the expansion board the alarm pin is
//! pulsed high near the end of every cycle.

use crate::config::{DashboardCapabilities, TickTiming};
use crate::traits::DisplaySurface;

use super::EXPANSION_ALARM_PIN;

/// Alarm pin state as last written to the display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LeakPhase {
    #[default]
    Quiet,
    Sounding,
}

/// Leak page updater
#[derive(Debug, Clone, Default)]
pub struct LeakPage {
    ticks: u32,
    phase: LeakPhase,
}

impl LeakPage {
    /// Alarm state
    pub fn phase(&self) -> LeakPhase {
        self.phase
    }

    /// Ticks into the current cycle
    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    /// Restart the alarm cycle
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Run one cycle
    pub fn update<D: DisplaySurface>(
        &mut self,
        display: &mut D,
        timing: &TickTiming,
        capabilities: &DashboardCapabilities,
    ) {
        if !capabilities.expansion_board {
            return;
        }
        self.ticks = self.ticks.saturating_add(1);

        if self.ticks >= timing.leak_cycle {
            if display.write_pin(EXPANSION_ALARM_PIN, false).is_ok() {
                self.ticks = 0;
                self.phase = LeakPhase::Quiet;
            }
        } else if self.ticks >= timing.leak_alarm_on
            && self.phase == LeakPhase::Quiet
            && display.write_pin(EXPANSION_ALARM_PIN, true).is_ok()
        {
            self.phase = LeakPhase::Sounding;
        }
    }
}
