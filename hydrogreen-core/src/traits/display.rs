//! Display surface trait for the Nextion HMI panel

/// Errors that can occur with display communication
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Transmit path cannot take another command right now; retry later
    Busy,
    /// Field name or value cannot be encoded as a display command
    InvalidCommand,
}

/// Fill colors used by the pages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Color {
    Gray,
    Red,
}

/// Screen rectangle in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Rect {
    /// Outline of the whole 320×240 screen
    pub const SCREEN: Rect = Rect {
        x: 0,
        y: 0,
        width: 320,
        height: 240,
    };
}

/// Expansion-board GPIO modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GpioMode {
    /// Input with pull-up
    PullUpInput,
    /// Push-pull output
    Output,
    /// PWM output
    Pwm,
}

/// Trait for the dashboard display
///
/// Every call queues one command. `Err(DisplayError::Busy)` means nothing
/// was queued and the caller should retry on a later cycle.
pub trait DisplaySurface {
    /// Reset the panel to its boot state
    fn reset_device(&mut self) -> Result<(), DisplayError>;

    /// Switch to a page by panel page number
    fn load_page(&mut self, page: u8) -> Result<(), DisplayError>;

    /// Set an integer field
    fn write_number(&mut self, field: &str, value: i32) -> Result<(), DisplayError>;

    /// Set a float field
    fn write_float(&mut self, field: &str, value: f32) -> Result<(), DisplayError>;

    /// Set a progress bar, `percent` in 0..=100
    fn write_progress(&mut self, field: &str, percent: u8) -> Result<(), DisplayError>;

    /// Draw a rectangle outline
    fn draw_rect(&mut self, rect: Rect, color: Color) -> Result<(), DisplayError>;

    /// Configure an expansion-board GPIO
    fn configure_gpio(&mut self, pin: u8, mode: GpioMode, pwm: u8) -> Result<(), DisplayError>;

    /// Drive an expansion-board output pin
    fn write_pin(&mut self, pin: u8, high: bool) -> Result<(), DisplayError>;
}

impl<D: DisplaySurface + ?Sized> DisplaySurface for &mut D {
    fn reset_device(&mut self) -> Result<(), DisplayError> {
        (**self).reset_device()
    }

    fn load_page(&mut self, page: u8) -> Result<(), DisplayError> {
        (**self).load_page(page)
    }

    fn write_number(&mut self, field: &str, value: i32) -> Result<(), DisplayError> {
        (**self).write_number(field, value)
    }

    fn write_float(&mut self, field: &str, value: f32) -> Result<(), DisplayError> {
        (**self).write_float(field, value)
    }

    fn write_progress(&mut self, field: &str, percent: u8) -> Result<(), DisplayError> {
        (**self).write_progress(field, percent)
    }

    fn draw_rect(&mut self, rect: Rect, color: Color) -> Result<(), DisplayError> {
        (**self).draw_rect(rect, color)
    }

    fn configure_gpio(&mut self, pin: u8, mode: GpioMode, pwm: u8) -> Result<(), DisplayError> {
        (**self).configure_gpio(pin, mode, pwm)
    }

    fn write_pin(&mut self, pin: u8, high: bool) -> Result<(), DisplayError> {
        (**self).write_pin(pin, high)
    }
}
