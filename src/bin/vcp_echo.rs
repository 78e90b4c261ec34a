#![no_std]
#![no_main]

//! Virtual COM Port echo demo.
//!
//! Every line received from the host is sent back with a "> " prefix.

use defmt_rtt as _;
use panic_probe as _;

use embassy_executor::InterruptExecutor;
use embassy_stm32::interrupt;
use embassy_stm32::interrupt::{InterruptExt, Priority};
use heapless::Vec;
use log::{info, warn, LevelFilter};

use f3_vcp_firmware::config::demo::ECHO_PREFIX;
use f3_vcp_firmware::config::vcp::TX_CAPACITY;
use f3_vcp_firmware::vcp::TransportError;
use f3_vcp_firmware::{board, logger};

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
    vcp.reset();

    loop {
        if vcp.wait_configured(None).is_err() {
            vcp.reset();
            continue;
        }

        let line = match vcp.receive_line(None) {
            Ok(line) => line,
            Err(TransportError::BufferOverflow) => {
                warn!("Line too long, dropped");
                continue;
            }
            Err(TransportError::NotReady) => {
                vcp.reset();
                continue;
            }
            Err(_) => continue,
        };

        // Echo with prefix and newline, clipped to one transfer
        let mut reply: Vec<u8, TX_CAPACITY> = Vec::new();
        let _ = reply.extend_from_slice(ECHO_PREFIX.as_bytes());
        let room = reply.capacity() - reply.len() - 1;
        let _ = reply.extend_from_slice(&line[..line.len().min(room)]);
        let _ = reply.push(b'\n');

        info!("Echo {} bytes", line.len());
        match vcp.send(&reply) {
            Ok(()) => {}
            Err(TransportError::NotReady) => vcp.reset(),
            Err(e) => warn!("Echo failed: {:?}", e),
        }
    }
}
