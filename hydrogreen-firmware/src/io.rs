//! Board I/O adapters
//!
//! Implements the hydrogreen-hal traits on top of embassy-stm32 drivers.

use embassy_stm32::gpio::Input;
use embassy_stm32::usart::{self, BufferedUartTx};
use embedded_io::Write;

use hydrogreen_hal::uart::{Parity, StopBits};
use hydrogreen_hal::{ByteTx, InputPin, UartConfig};

/// RS-485 link to the main controller
pub const LINK_UART: UartConfig = UartConfig::with_baudrate(115_200);

/// Nextion display; the HMI project must set the same `bauds`
pub const DISPLAY_UART: UartConfig = UartConfig::with_baudrate(115_200);

/// Convert to the embassy-stm32 UART configuration
pub fn usart_config(cfg: &UartConfig) -> usart::Config {
    let mut config = usart::Config::default();
    config.baudrate = cfg.baudrate;
    config.parity = match cfg.parity {
        Parity::None => usart::Parity::ParityNone,
        Parity::Even => usart::Parity::ParityEven,
        Parity::Odd => usart::Parity::ParityOdd,
    };
    config.stop_bits = match cfg.stop_bits {
        StopBits::One => usart::StopBits::STOP1,
        StopBits::Two => usart::StopBits::STOP2,
    };
    config
}

/// Button input, high while the pin reads high
pub struct ButtonPin(pub Input<'static>);

impl InputPin for ButtonPin {
    fn is_high(&self) -> bool {
        self.0.is_high()
    }
}

/// Link transmit errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkTxError {
    /// UART driver error
    Uart(usart::Error),
    /// Driver accepted no bytes
    Stalled,
}

/// Control frame transmitter over the buffered link UART
///
/// The TX ring buffer is far larger than one control frame, so a write
/// only lands in the buffer and returns.
pub struct LinkTx {
    tx: BufferedUartTx<'static>,
}

impl LinkTx {
    pub fn new(tx: BufferedUartTx<'static>) -> Self {
        Self { tx }
    }
}

impl ByteTx for LinkTx {
    type Error = LinkTxError;

    fn write_byte(&mut self, byte: u8) -> Result<(), LinkTxError> {
        match self.tx.write(&[byte]) {
            Ok(0) => Err(LinkTxError::Stalled),
            Ok(_) => Ok(()),
            Err(e) => Err(LinkTxError::Uart(e)),
        }
    }
}
