//! Link UART receive task
//!
//! Feeds every received byte into the frame mailbox. Frame decoding happens
//! in the dashboard task.

use defmt::*;
use embassy_stm32::usart::BufferedUartRx;
use embedded_io_async::Read;

use hydrogreen_protocol::AssemblerEvent;

use crate::channels::LINK_MAILBOX;

/// Buffer size for UART receive
const RX_BUF_SIZE: usize = 64;

/// Link RX task - assembles telemetry frames from the main controller
#[embassy_executor::task]
pub async fn link_rx_task(mut rx: BufferedUartRx<'static>) {
    info!("Link RX task started");

    let mut buf = [0u8; RX_BUF_SIZE];

    loop {
        match rx.read(&mut buf).await {
            Ok(n) if n > 0 => {
                trace!("RX: {} bytes", n);

                for &byte in &buf[..n] {
                    match LINK_MAILBOX.on_byte(byte) {
                        AssemblerEvent::Complete(_) => {
                            trace!("Telemetry frame assembled");
                        }
                        AssemblerEvent::Desync { kept } => {
                            trace!("Frame desync, kept {} bytes", kept);
                        }
                        AssemblerEvent::Overflow => {
                            warn!("Assembly buffer overflow");
                        }
                        AssemblerEvent::Collecting(_) => {}
                    }
                }
            }
            Ok(_) => {
                // No bytes read, continue
            }
            Err(e) => {
                warn!("Link UART read error: {:?}", e);
            }
        }
    }
}
