//! GPIO pin abstractions
//!
//! Provides the digital input trait used for dashboard buttons.

/// Digital input pin
///
/// Implementations should handle the actual hardware register reading
/// for the specific chip.
pub trait InputPin {
    /// Check if the pin reads high (logic 1)
    fn is_high(&self) -> bool;

    /// Check if the pin reads low (logic 0)
    fn is_low(&self) -> bool {
        !self.is_high()
    }
}

/// Input that reads as high while the physical pin is low
///
/// Buttons are wired to ground with pull-ups, so "pressed" is a low level.
#[derive(Debug, Clone, Copy)]
pub struct ActiveLow<P>(pub P);

impl<P: InputPin> InputPin for ActiveLow<P> {
    fn is_high(&self) -> bool {
        self.0.is_low()
    }
}

impl<P: InputPin + ?Sized> InputPin for &P {
    fn is_high(&self) -> bool {
        (**self).is_high()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Level(bool);

    impl InputPin for Level {
        fn is_high(&self) -> bool {
            self.0
        }
    }

    #[test]
    fn test_active_low_inverts() {
        assert!(ActiveLow(Level(false)).is_high());
        assert!(ActiveLow(Level(true)).is_low());
    }

    #[test]
    fn test_reference_forwards() {
        let pin = Level(true);
        assert!((&pin).is_high());
    }
}
