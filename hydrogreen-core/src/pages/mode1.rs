//! Mode1 page: the driving display
//!
//! One field is written per refresh interval. The fast fields go out every
//! round; each round ends with a single field from the slow list, so slow
//! fields are refreshed once every six rounds.

use hydrogreen_protocol::{ButtonState, TelemetryFrame};

use crate::config::DashboardCapabilities;
use crate::traits::{Color, DisplayError, DisplaySurface, Rect};

use super::EXPANSION_ALARM_PIN;

/// Speed progress bar
pub const FIELD_SPEED_BAR: &str = "SB";
/// Lap milliseconds
pub const FIELD_LAP_MILLIS: &str = "ms";
/// Speed readout
pub const FIELD_SPEED: &str = "V";
/// Lap minutes
pub const FIELD_LAP_MINUTES: &str = "mi";
/// Lap seconds
pub const FIELD_LAP_SECONDS: &str = "sec";
/// Fuel-cell voltage
pub const FIELD_FC_VOLTAGE: &str = "FCV";
/// Supercap voltage
pub const FIELD_SC_VOLTAGE: &str = "SCV";

/// Fields written every round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FastField {
    SpeedBar,
    LapMillis,
    /// Expansion pin mirroring the speed-reset button
    SpeedResetLamp,
}

/// Fields written once per round, in rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SlowField {
    #[default]
    Speed,
    LapMinutes,
    LapSeconds,
    FuelCellVoltage,
    SupercapVoltage,
    /// Border color showing the power supply switch
    PowerBorder,
}

impl SlowField {
    fn next(self) -> Self {
        match self {
            SlowField::Speed => SlowField::LapMinutes,
            SlowField::LapMinutes => SlowField::LapSeconds,
            SlowField::LapSeconds => SlowField::FuelCellVoltage,
            SlowField::FuelCellVoltage => SlowField::SupercapVoltage,
            SlowField::SupercapVoltage => SlowField::PowerBorder,
            SlowField::PowerBorder => SlowField::Speed,
        }
    }
}

/// Next write slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode1Slot {
    Fast(FastField),
    Slow,
}

impl Default for Mode1Slot {
    fn default() -> Self {
        Mode1Slot::Fast(FastField::SpeedBar)
    }
}

/// Mode1 page updater
#[derive(Debug, Clone, Default)]
pub struct Mode1Page {
    ticks: u32,
    slot: Mode1Slot,
    slow: SlowField,
}

/// Scale `speed` to a 0..=100 bar against `full_scale`
pub fn speed_percent(speed: u8, full_scale: u8) -> u8 {
    if full_scale == 0 {
        return 0;
    }
    let percent = u16::from(speed) * 100 / u16::from(full_scale);
    percent.min(100) as u8
}

impl Mode1Page {
    /// Next slot to be written
    pub fn slot(&self) -> Mode1Slot {
        self.slot
    }

    /// Next slow field in the rotation
    pub fn slow_field(&self) -> SlowField {
        self.slow
    }

    /// Ticks since the last write
    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    /// Restart from the first fast field
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Run one cycle
    ///
    /// A busy display is retried at the next refresh interval. A field the
    /// display cannot encode is skipped so the rest of the rotation keeps
    /// refreshing; its error is still returned.
    pub fn update<D: DisplaySurface>(
        &mut self,
        display: &mut D,
        refresh_ticks: u32,
        speed_full_scale: u8,
        capabilities: &DashboardCapabilities,
        telemetry: &TelemetryFrame,
        buttons: &ButtonState,
    ) -> Result<(), DisplayError> {
        self.ticks = self.ticks.saturating_add(1);
        if self.ticks < refresh_ticks {
            return Ok(());
        }
        self.ticks = 0;

        let written = match self.slot {
            Mode1Slot::Fast(field) => Self::write_fast(
                display,
                field,
                speed_full_scale,
                telemetry,
                buttons,
            ),
            Mode1Slot::Slow => Self::write_slow(display, self.slow, telemetry, buttons),
        };
        if written == Err(DisplayError::Busy) {
            return written;
        }

        self.slot = match self.slot {
            Mode1Slot::Fast(FastField::SpeedBar) => Mode1Slot::Fast(FastField::LapMillis),
            Mode1Slot::Fast(FastField::LapMillis) if capabilities.expansion_board => {
                Mode1Slot::Fast(FastField::SpeedResetLamp)
            }
            Mode1Slot::Fast(FastField::LapMillis | FastField::SpeedResetLamp) => Mode1Slot::Slow,
            Mode1Slot::Slow => {
                self.slow = self.slow.next();
                Mode1Slot::default()
            }
        };

        written
    }

    fn write_fast<D: DisplaySurface>(
        display: &mut D,
        field: FastField,
        speed_full_scale: u8,
        telemetry: &TelemetryFrame,
        buttons: &ButtonState,
    ) -> Result<(), DisplayError> {
        match field {
            FastField::SpeedBar => display.write_progress(
                FIELD_SPEED_BAR,
                speed_percent(telemetry.speed, speed_full_scale),
            ),
            FastField::LapMillis => {
                display.write_number(FIELD_LAP_MILLIS, i32::from(telemetry.lap_millis))
            }
            FastField::SpeedResetLamp => display.write_pin(EXPANSION_ALARM_PIN, buttons.speed_reset),
        }
    }

    fn write_slow<D: DisplaySurface>(
        display: &mut D,
        field: SlowField,
        telemetry: &TelemetryFrame,
        buttons: &ButtonState,
    ) -> Result<(), DisplayError> {
        match field {
            SlowField::Speed => display.write_number(FIELD_SPEED, i32::from(telemetry.speed)),
            SlowField::LapMinutes => {
                display.write_number(FIELD_LAP_MINUTES, i32::from(telemetry.lap_minutes))
            }
            SlowField::LapSeconds => {
                display.write_number(FIELD_LAP_SECONDS, i32::from(telemetry.lap_seconds))
            }
            SlowField::FuelCellVoltage => display.write_float(FIELD_FC_VOLTAGE, telemetry.fc_voltage),
            SlowField::SupercapVoltage => display.write_float(FIELD_SC_VOLTAGE, telemetry.sc_voltage),
            SlowField::PowerBorder => {
                let color = if buttons.power_supply {
                    Color::Gray
                } else {
                    Color::Red
                };
                display.draw_rect(Rect::SCREEN, color)
            }
        }
    }
}
