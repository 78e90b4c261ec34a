#![no_std]
#![no_main]

//! Button LED toggler.
//!
//! Every change of the USER button level inverts the eight compass LEDs.
//! PE9, PE11, PE13 and PE15 start lit.

use defmt_rtt as _;
use panic_probe as _;

use embassy_stm32::gpio::{Input, Level, Output, Pull, Speed};
use log::{info, LevelFilter};

use f3_vcp_firmware::config::pins::{LED_COUNT, LED_INITIAL_PATTERN};
use f3_vcp_firmware::demo::{ButtonEdge, LedBank};
use f3_vcp_firmware::{board, logger};

#[cortex_m_rt::entry]
fn main() -> ! {
    logger::init(LevelFilter::Info);
    let p = board::init();

    let mut button = Input::new(p.PA0, Pull::Down);

    let leds: [Output<'static>; LED_COUNT] = [
        Output::new(p.PE8, Level::Low, Speed::Low),
        Output::new(p.PE9, Level::Low, Speed::Low),
        Output::new(p.PE10, Level::Low, Speed::Low),
        Output::new(p.PE11, Level::Low, Speed::Low),
        Output::new(p.PE12, Level::Low, Speed::Low),
        Output::new(p.PE13, Level::Low, Speed::Low),
        Output::new(p.PE14, Level::Low, Speed::Low),
        Output::new(p.PE15, Level::Low, Speed::Low),
    ];

    // GPIO on this chip cannot fail
    let Ok(mut bank) = LedBank::new(leds, LED_INITIAL_PATTERN);
    let Ok(mut edge) = ButtonEdge::new(&mut button);

    info!("Toggling LEDs on button changes");

    loop {
        if let Ok(true) = edge.poll(&mut button) {
            let _ = bank.toggle_all();
        }
    }
}
