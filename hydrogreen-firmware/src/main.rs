//! Hydrogreen - Vehicle Dashboard Firmware
//!
//! Main firmware binary for the STM32F446-based dashboard of the Hydrogreen
//! hydrogen car. Talks to the main controller over an RS-485 link and drives
//! a Nextion HMI display.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_stm32::bind_interrupts;
use embassy_stm32::gpio::{AnyPin, Input, Pull};
use embassy_stm32::peripherals::{USART1, USART2};
use embassy_stm32::usart::{self, BufferedUart};
use embassy_stm32::Peri;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use hydrogreen_hal::ActiveLow;

use crate::channels::LINK_MAILBOX;
use crate::io::{usart_config, ButtonPin, LinkTx, DISPLAY_UART, LINK_UART};
use crate::tasks::Buttons;

mod channels;
mod config;
mod display;
mod io;
mod tasks;

bind_interrupts!(struct Irqs {
    USART1 => usart::BufferedInterruptHandler<USART1>;
    USART2 => usart::BufferedInterruptHandler<USART2>;
});

// Static cells for UART buffers (must live forever)
static LINK_TX_BUF: StaticCell<[u8; 64]> = StaticCell::new();
static LINK_RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static DISPLAY_TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static DISPLAY_RX_BUF: StaticCell<[u8; 32]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Hydrogreen dashboard starting...");

    let p = embassy_stm32::init(Default::default());
    info!("Peripherals initialized");

    let config = config::load();
    LINK_MAILBOX.configure(config.link.sync);

    // RS-485 link to the main controller (PA2=TX, PA3=RX)
    let link = BufferedUart::new(
        p.USART2,
        p.PA3,
        p.PA2,
        LINK_TX_BUF.init([0; 64]),
        LINK_RX_BUF.init([0; 256]),
        Irqs,
        usart_config(&LINK_UART),
    )
    .unwrap();
    let (link_tx, link_rx) = link.split();

    // Nextion display (PA9=TX, PA10=RX); nothing is read back
    let display = BufferedUart::new(
        p.USART1,
        p.PA10,
        p.PA9,
        DISPLAY_TX_BUF.init([0; 256]),
        DISPLAY_RX_BUF.init([0; 32]),
        Irqs,
        usart_config(&DISPLAY_UART),
    )
    .unwrap();
    let (display_tx, _display_rx) = display.split();

    // Buttons on PC0..PC10, active low
    let button = |pin: Peri<'static, AnyPin>| ActiveLow(ButtonPin(Input::new(pin, Pull::Up)));
    let buttons = Buttons {
        mode1: button(p.PC0.into()),
        mode2: button(p.PC1.into()),
        half_gas: button(p.PC2.into()),
        full_gas: button(p.PC3.into()),
        horn: button(p.PC4.into()),
        speed_reset: button(p.PC5.into()),
        power_supply: button(p.PC6.into()),
        sc_close: button(p.PC7.into()),
        fuelcell_off: button(p.PC8.into()),
        fuelcell_prepare_to_race: button(p.PC9.into()),
        fuelcell_race: button(p.PC10.into()),
    };

    // Spawn tasks
    spawner.spawn(tasks::link_rx_task(link_rx)).unwrap();
    spawner.spawn(tasks::display_tx_task(display_tx)).unwrap();
    spawner
        .spawn(tasks::dashboard_task(config, buttons, LinkTx::new(link_tx)))
        .unwrap();

    info!("All tasks spawned");
}
