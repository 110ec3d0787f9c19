//! Nextion instruction encoding
//!
//! Instructions are ASCII text terminated by three 0xFF bytes:
//!
//! ```text
//! page 1ÿÿÿ
//! SB.val=42ÿÿÿ
//! FCV.txt="31.50"ÿÿÿ
//! draw 0,0,319,239,GRAYÿÿÿ
//! ```

use core::fmt::Write;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::channel::Sender;
use heapless::Vec;

use hydrogreen_core::traits::{Color, DisplayError, DisplaySurface, GpioMode, Rect};

/// Longest encoded instruction including the terminator
pub const MAX_COMMAND_LEN: usize = 48;

/// Instruction terminator
const TERMINATOR: [u8; 3] = [0xFF; 3];

/// One encoded instruction
pub type NextionCommand = Vec<u8, MAX_COMMAND_LEN>;

/// `core::fmt` sink over a command buffer
struct CommandWriter(NextionCommand);

impl Write for CommandWriter {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        self.0
            .extend_from_slice(s.as_bytes())
            .map_err(|_| core::fmt::Error)
    }
}

fn encode(args: core::fmt::Arguments<'_>) -> Result<NextionCommand, DisplayError> {
    let mut writer = CommandWriter(Vec::new());
    writer
        .write_fmt(args)
        .map_err(|_| DisplayError::InvalidCommand)?;
    writer
        .0
        .extend_from_slice(&TERMINATOR)
        .map_err(|_| DisplayError::InvalidCommand)?;
    Ok(writer.0)
}

/// Reject names that would break out of the instruction
fn field(name: &str) -> Result<&str, DisplayError> {
    let valid = !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_');
    if valid {
        Ok(name)
    } else {
        Err(DisplayError::InvalidCommand)
    }
}

fn color_name(color: Color) -> &'static str {
    match color {
        Color::Gray => "GRAY",
        Color::Red => "RED",
    }
}

fn gpio_mode(mode: GpioMode) -> u8 {
    match mode {
        GpioMode::PullUpInput => 0,
        GpioMode::Output => 2,
        GpioMode::Pwm => 3,
    }
}

/// Panel reset
pub fn reset() -> Result<NextionCommand, DisplayError> {
    encode(format_args!("rest"))
}

/// Page change
pub fn page(page: u8) -> Result<NextionCommand, DisplayError> {
    encode(format_args!("page {}", page))
}

/// Integer assignment, also used for progress bars
pub fn number(name: &str, value: i32) -> Result<NextionCommand, DisplayError> {
    encode(format_args!("{}.val={}", field(name)?, value))
}

/// Float shown as text with two decimals
///
/// Values that are not finite, or too large to fit one instruction, show
/// as `--`.
pub fn float(name: &str, value: f32) -> Result<NextionCommand, DisplayError> {
    let name = field(name)?;
    if value.is_finite() {
        if let Ok(command) = encode(format_args!("{}.txt=\"{:.2}\"", name, value)) {
            return Ok(command);
        }
    }
    encode(format_args!("{}.txt=\"--\"", name))
}

/// Rectangle outline; Nextion takes inclusive corner coordinates
pub fn rect(rect: Rect, color: Color) -> Result<NextionCommand, DisplayError> {
    let x2 = rect.x.saturating_add(rect.width.saturating_sub(1));
    let y2 = rect.y.saturating_add(rect.height.saturating_sub(1));
    encode(format_args!(
        "draw {},{},{},{},{}",
        rect.x,
        rect.y,
        x2,
        y2,
        color_name(color)
    ))
}

/// Expansion GPIO configuration, not bound to any component
pub fn cfgpio(pin: u8, mode: GpioMode, pwm: u8) -> Result<NextionCommand, DisplayError> {
    encode(format_args!("cfgpio {},{},{}", pin, gpio_mode(mode), pwm))
}

/// Expansion GPIO output level
pub fn pin(pin: u8, high: bool) -> Result<NextionCommand, DisplayError> {
    encode(format_args!("pio{}={}", pin, u8::from(high)))
}

/// Display surface that queues instructions on a channel
///
/// A full channel is reported as [`DisplayError::Busy`].
pub struct NextionDisplay<'a, M: RawMutex, const N: usize> {
    queue: Sender<'a, M, NextionCommand, N>,
}

impl<'a, M: RawMutex, const N: usize> NextionDisplay<'a, M, N> {
    /// Create a display writing to `queue`
    pub fn new(queue: Sender<'a, M, NextionCommand, N>) -> Self {
        Self { queue }
    }

    fn send(&mut self, command: Result<NextionCommand, DisplayError>) -> Result<(), DisplayError> {
        self.queue
            .try_send(command?)
            .map_err(|_| DisplayError::Busy)
    }
}

impl<M: RawMutex, const N: usize> DisplaySurface for NextionDisplay<'_, M, N> {
    fn reset_device(&mut self) -> Result<(), DisplayError> {
        self.send(reset())
    }

    fn load_page(&mut self, id: u8) -> Result<(), DisplayError> {
        self.send(page(id))
    }

    fn write_number(&mut self, name: &str, value: i32) -> Result<(), DisplayError> {
        self.send(number(name, value))
    }

    fn write_float(&mut self, name: &str, value: f32) -> Result<(), DisplayError> {
        self.send(float(name, value))
    }

    fn write_progress(&mut self, name: &str, percent: u8) -> Result<(), DisplayError> {
        self.send(number(name, i32::from(percent.min(100))))
    }

    fn draw_rect(&mut self, area: Rect, color: Color) -> Result<(), DisplayError> {
        self.send(rect(area, color))
    }

    fn configure_gpio(&mut self, id: u8, mode: GpioMode, pwm: u8) -> Result<(), DisplayError> {
        self.send(cfgpio(id, mode, pwm))
    }

    fn write_pin(&mut self, id: u8, high: bool) -> Result<(), DisplayError> {
        self.send(pin(id, high))
    }
}
