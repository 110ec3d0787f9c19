//! Display UART transmit task
//!
//! Drains queued Nextion instructions to the display.

use defmt::*;
use embassy_stm32::usart::BufferedUartTx;
use embedded_io_async::Write;

use crate::channels::DISPLAY_CHANNEL;

/// Display TX task - writes Nextion instructions in queue order
#[embassy_executor::task]
pub async fn display_tx_task(mut tx: BufferedUartTx<'static>) {
    info!("Display TX task started");

    loop {
        let command = DISPLAY_CHANNEL.receive().await;
        if let Err(e) = tx.write_all(&command).await {
            warn!("Failed to send display command: {:?}", e);
        }
    }
}
