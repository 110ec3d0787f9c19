//! Button input
//!
//! The page logic and the link scheduler consume a [`ButtonState`] snapshot
//! once per cycle. [`ButtonPanel`] builds that snapshot from one digital
//! input per button.

use hydrogreen_hal::InputPin;
use hydrogreen_protocol::ButtonState;

/// Source of button snapshots
pub trait ButtonSource {
    /// Sample all buttons
    fn read(&mut self) -> ButtonState;
}

/// Eleven input pins, one per button, high while pressed
///
/// Wrap a pin in [`hydrogreen_hal::ActiveLow`] for buttons wired to ground.
pub struct ButtonPanel<P> {
    pub mode1: P,
    pub mode2: P,
    pub half_gas: P,
    pub full_gas: P,
    pub horn: P,
    pub speed_reset: P,
    pub power_supply: P,
    pub sc_close: P,
    pub fuelcell_off: P,
    pub fuelcell_prepare_to_race: P,
    pub fuelcell_race: P,
}

impl<P: InputPin> ButtonSource for ButtonPanel<P> {
    fn read(&mut self) -> ButtonState {
        ButtonState {
            mode1: self.mode1.is_high(),
            mode2: self.mode2.is_high(),
            half_gas: self.half_gas.is_high(),
            full_gas: self.full_gas.is_high(),
            horn: self.horn.is_high(),
            speed_reset: self.speed_reset.is_high(),
            power_supply: self.power_supply.is_high(),
            sc_close: self.sc_close.is_high(),
            fuelcell_off: self.fuelcell_off.is_high(),
            fuelcell_prepare_to_race: self.fuelcell_prepare_to_race.is_high(),
            fuelcell_race: self.fuelcell_race.is_high(),
        }
    }
}
