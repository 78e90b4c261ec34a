//! Hardware and protocol configuration constants for the STM32F3-Discovery

/// USB device identity and CDC endpoint sizing
pub mod usb {
    /// STMicroelectronics Virtual COM Port VID/PID
    pub const VID: u16 = 0x0483;
    pub const PID: u16 = 0x5740;

    pub const MANUFACTURER: &str = "STMicroelectronics";
    pub const PRODUCT: &str = "STM32 Virtual ComPort";
    pub const SERIAL_NUMBER: &str = "F3DISCOVERY";

    /// Full-speed bulk endpoint size
    pub const MAX_PACKET_SIZE: u16 = 64;
}

/// Virtual COM Port transport sizing and timing
pub mod vcp {
    /// Largest line a single outbound transfer may carry
    pub const TX_CAPACITY: usize = 64;

    /// Largest inbound line, terminator excluded
    pub const LINE_CAPACITY: usize = 64;

    /// Depth of the byte queue between the reception context and the caller.
    /// heapless spsc queues hold one element less than their size.
    pub const RX_QUEUE_SIZE: usize = 128;

    /// Time D+ is held low so the host notices the disconnect
    pub const RESET_SETTLE_MS: u64 = 500;

    /// How long the demos wait for the host to configure the device
    pub const CONNECT_TIMEOUT_MS: u64 = 5_000;

    pub const LINE_FEED: u8 = b'\n';
    pub const CARRIAGE_RETURN: u8 = b'\r';
}

/// Board pin assignments
pub mod pins {
    /// USB D+ on PA12, pulled low to force re-enumeration
    pub const USB_DP: usize = 12;

    /// The eight compass LEDs sit on PE8..PE15
    pub const LED_COUNT: usize = 8;

    /// PE9, PE11, PE13 and PE15 are lit at power-up
    pub const LED_INITIAL_PATTERN: u8 = 0b1010_1010;
}

/// UART demo configuration
pub mod uart {
    pub const BAUD_RATE: u32 = 115200;

    /// Byte repeated on USART1 (PC4 TX / PC5 RX)
    pub const USART1_TX_BYTE: u8 = b'I';

    /// Byte repeated on USART3 (PC10 TX / PC11 RX)
    pub const USART3_TX_BYTE: u8 = 0xA5;
}

/// Demo program behaviour
pub mod demo {
    pub const HELLO_LINE: &str = "Hello World!\n";

    /// Interval between counter lines
    pub const COUNT_INTERVAL_MS: u64 = 250;

    /// Prefix echoed in front of every received line
    pub const ECHO_PREFIX: &str = "> ";
}
