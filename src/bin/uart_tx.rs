#![no_std]
#![no_main]

//! UART transmit demo.
//!
//! USART1 (PC4 TX / PC5 RX) repeats 'I', waiting for the data register to
//! empty after each byte. USART3 (PC10 TX / PC11 RX) repeats 0xA5, waiting
//! for transmission complete. Both run at 115200 8N1 without flow control.

use defmt_rtt as _;
use panic_probe as _;

use embassy_stm32::usart::{Config as UartConfig, Uart};
use log::{info, LevelFilter};

use f3_vcp_firmware::config::uart::{BAUD_RATE, USART1_TX_BYTE, USART3_TX_BYTE};
use f3_vcp_firmware::{board, logger};

#[cortex_m_rt::entry]
fn main() -> ! {
    logger::init(LevelFilter::Info);
    let p = board::init();

    let mut usart1 = match Uart::new_blocking(p.USART1, p.PC5, p.PC4, uart_config()) {
        Ok(uart) => uart,
        Err(e) => panic!("USART1 config rejected: {:?}", e),
    };
    let mut usart3 = match Uart::new_blocking(p.USART3, p.PC11, p.PC10, uart_config()) {
        Ok(uart) => uart,
        Err(e) => panic!("USART3 config rejected: {:?}", e),
    };

    info!("UART demo running at {} baud", BAUD_RATE);

    loop {
        // blocking_write returns once the byte is in the shift register
        let _ = usart1.blocking_write(&[USART1_TX_BYTE]);

        // blocking_flush waits for the last stop bit
        let _ = usart3.blocking_write(&[USART3_TX_BYTE]);
        let _ = usart3.blocking_flush();
    }
}

/// 115200 8N1, no flow control
fn uart_config() -> UartConfig {
    let mut config = UartConfig::default();
    config.baudrate = BAUD_RATE;
    config
}
