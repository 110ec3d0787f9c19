//! Host test doubles

use hydrogreen_hal::ByteTx;

use crate::traits::{Color, DisplayError, DisplaySurface, GpioMode, Rect};

/// Command recorded by [`FakeDisplay`]
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Reset,
    Page(u8),
    Number(String, i32),
    Float(String, f32),
    Progress(String, u8),
    Rect(Rect, Color),
    Gpio(u8, GpioMode, u8),
    Pin(u8, bool),
}

/// Display that records commands and can be made busy
#[derive(Debug, Default)]
pub struct FakeDisplay {
    pub commands: Vec<Command>,
    pub busy: bool,
    /// Fail float writes as unencodable
    pub reject_floats: bool,
}

impl FakeDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&mut self) -> Vec<Command> {
        core::mem::take(&mut self.commands)
    }

    fn record(&mut self, command: Command) -> Result<(), DisplayError> {
        if self.busy {
            return Err(DisplayError::Busy);
        }
        self.commands.push(command);
        Ok(())
    }
}

impl DisplaySurface for FakeDisplay {
    fn reset_device(&mut self) -> Result<(), DisplayError> {
        self.record(Command::Reset)
    }

    fn load_page(&mut self, page: u8) -> Result<(), DisplayError> {
        self.record(Command::Page(page))
    }

    fn write_number(&mut self, field: &str, value: i32) -> Result<(), DisplayError> {
        self.record(Command::Number(field.to_string(), value))
    }

    fn write_float(&mut self, field: &str, value: f32) -> Result<(), DisplayError> {
        if self.reject_floats {
            return Err(DisplayError::InvalidCommand);
        }
        self.record(Command::Float(field.to_string(), value))
    }

    fn write_progress(&mut self, field: &str, percent: u8) -> Result<(), DisplayError> {
        self.record(Command::Progress(field.to_string(), percent))
    }

    fn draw_rect(&mut self, rect: Rect, color: Color) -> Result<(), DisplayError> {
        self.record(Command::Rect(rect, color))
    }

    fn configure_gpio(&mut self, pin: u8, mode: GpioMode, pwm: u8) -> Result<(), DisplayError> {
        self.record(Command::Gpio(pin, mode, pwm))
    }

    fn write_pin(&mut self, pin: u8, high: bool) -> Result<(), DisplayError> {
        self.record(Command::Pin(pin, high))
    }
}

/// Transmitter that records bytes and can be made to fail
#[derive(Debug, Default)]
pub struct FakeTx {
    pub bytes: Vec<u8>,
    pub fail: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxFull;

impl ByteTx for FakeTx {
    type Error = TxFull;

    fn write_byte(&mut self, byte: u8) -> Result<(), TxFull> {
        if self.fail {
            return Err(TxFull);
        }
        self.bytes.push(byte);
        Ok(())
    }
}
