//! Emergency page: blinking stop indicator

use crate::config::TickTiming;
use crate::traits::DisplaySurface;

/// Emergency stop progress indicator
pub const FIELD_EMERGENCY: &str = "em_button";

/// Indicator state as last written to the display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EmergencyPhase {
    /// Indicator clear
    #[default]
    Dark,
    /// Indicator full
    Lit,
}

/// Emergency page updater
#[derive(Debug, Clone, Default)]
pub struct EmergencyPage {
    ticks: u32,
    phase: EmergencyPhase,
}

impl EmergencyPage {
    /// Indicator state
    pub fn phase(&self) -> EmergencyPhase {
        self.phase
    }

    /// Ticks into the current cycle
    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    /// Restart the blink cycle
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Run one cycle, returning `true` when a blink cycle completes
    pub fn update<D: DisplaySurface>(&mut self, display: &mut D, timing: &TickTiming) -> bool {
        self.ticks = self.ticks.saturating_add(1);

        if self.ticks >= timing.emergency_cycle {
            if display.write_progress(FIELD_EMERGENCY, 0).is_ok() {
                self.ticks = 0;
                self.phase = EmergencyPhase::Dark;
                return true;
            }
        } else if self.ticks >= timing.emergency_indicator_on
            && self.phase == EmergencyPhase::Dark
            && display.write_progress(FIELD_EMERGENCY, 100).is_ok()
        {
            self.phase = EmergencyPhase::Lit;
        }

        false
    }
}
