//! Dashboard button state
//!
//! Snapshot of the steering-wheel and panel buttons. The nine race-control
//! flags travel to the main controller in every control frame; the two mode
//! buttons only drive local page selection.

/// Momentary button flags, `true` while pressed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonState {
    /// Page selection button 1
    pub mode1: bool,
    /// Page selection button 2
    pub mode2: bool,
    /// Half throttle
    pub half_gas: bool,
    /// Full throttle
    pub full_gas: bool,
    /// Horn
    pub horn: bool,
    /// Reset lap/speed averaging on the controller
    pub speed_reset: bool,
    /// Main power supply switch
    pub power_supply: bool,
    /// Close the supercapacitor relay
    pub sc_close: bool,
    /// Request fuel cell off
    pub fuelcell_off: bool,
    /// Request fuel cell prepare-to-race stage
    pub fuelcell_prepare_to_race: bool,
    /// Request fuel cell race stage
    pub fuelcell_race: bool,
}

/// Number of flags carried in a control frame
pub const WIRE_FLAG_COUNT: usize = 9;

impl ButtonState {
    /// Transmitted flags in wire order
    pub fn wire_flags(&self) -> [bool; WIRE_FLAG_COUNT] {
        [
            self.half_gas,
            self.full_gas,
            self.horn,
            self.speed_reset,
            self.power_supply,
            self.sc_close,
            self.fuelcell_off,
            self.fuelcell_prepare_to_race,
            self.fuelcell_race,
        ]
    }

    /// Both page selection buttons held together (device reset combo)
    pub fn reset_combo(&self) -> bool {
        self.mode1 && self.mode2
    }

    /// Only the first page selection button is held
    pub fn mode1_only(&self) -> bool {
        self.mode1 && !self.mode2
    }
}
