#![no_std]
#![no_main]

//! Virtual COM Port hello demo.
//!
//! Forces the host to re-enumerate the board, waits for the blue USER
//! button, prints "Hello World!" and then a hex counter every 250 ms.

use defmt_rtt as _;
use panic_probe as _;

use embassy_executor::InterruptExecutor;
use embassy_stm32::gpio::{Input, Pull};
use embassy_stm32::interrupt;
use embassy_stm32::interrupt::{InterruptExt, Priority};
use embassy_time::{block_for, Duration};
use log::{error, info, warn, LevelFilter};

use f3_vcp_firmware::config::demo::{COUNT_INTERVAL_MS, HELLO_LINE};
use f3_vcp_firmware::demo::{counter_line, wait_for_press};
use f3_vcp_firmware::usb::UsbCdcEndpoint;
use f3_vcp_firmware::vcp::{LineTransport, TransportError};
use f3_vcp_firmware::{board, logger};

/// Executor for the USB tasks, preempting the main loop
static EXECUTOR_USB: InterruptExecutor = InterruptExecutor::new();

#[interrupt]
unsafe fn UART4() {
    EXECUTOR_USB.on_interrupt()
}

#[cortex_m_rt::entry]
fn main() -> ! {
    logger::init(LevelFilter::Info);
    let p = board::init();

    interrupt::UART4.set_priority(Priority::P6);
    let spawner = EXECUTOR_USB.start(interrupt::UART4);

    let mut vcp = board::start_vcp(spawner, p.USB, p.PA12, p.PA11);

    // Pull D+ low so the host forgets the device, then bring it back
    connect(&mut vcp);

    // Give the user a chance to open a terminal first
    let mut button = Input::new(p.PA0, Pull::Down);
    info!("Press the USER button to start");
    let _ = wait_for_press(&mut button);

    send_line(&mut vcp, HELLO_LINE.as_bytes());

    let mut count: u8 = 0;
    loop {
        let line = counter_line(count);
        send_line(&mut vcp, line.as_bytes());
        count = count.wrapping_add(1);
        block_for(Duration::from_millis(COUNT_INTERVAL_MS));
    }
}

/// Reset the port until the host configures the device
fn connect(vcp: &mut LineTransport<'static, UsbCdcEndpoint>) {
    loop {
        vcp.reset();
        match vcp.wait_configured(None) {
            Ok(()) => return,
            Err(_) => warn!("Host did not enumerate the VCP, resetting again"),
        }
    }
}

/// Send a line, recovering the link on failure. The line is dropped if
/// the link had to be recovered.
fn send_line(vcp: &mut LineTransport<'static, UsbCdcEndpoint>, line: &[u8]) {
    match vcp.send(line) {
        Ok(()) => {}
        Err(TransportError::NotReady) => {
            error!("VCP stalled, resetting port");
            connect(vcp);
        }
        Err(TransportError::Disconnected) => {
            if vcp.wait_configured(None).is_err() {
                connect(vcp);
            }
        }
        Err(e) => error!("VCP send failed: {:?}", e),
    }
}
