//! USB device setup for the CDC-ACM Virtual COM Port.
//!
//! Builds the embassy-usb device with one CDC-ACM function and a handler
//! that mirrors bus reset / configuration events into [`LinkSignals`].

pub mod cdc_io;
pub mod endpoint;

pub use cdc_io::{CdcError, CdcReader, CdcWriter};
pub use endpoint::{UsbCdcEndpoint, RX_ARM, TX_CHANNEL};

use embassy_stm32::peripherals::USB;
use embassy_stm32::usb::Driver;
use embassy_stm32::{bind_interrupts, peripherals, usb};
use embassy_usb::class::cdc_acm::{CdcAcmClass, State};
use embassy_usb::{Builder, Handler, UsbDevice};
use static_cell::StaticCell;

use crate::config;
use crate::vcp::LinkSignals;

bind_interrupts!(pub struct Irqs {
    USB_LP_CAN_RX0 => usb::InterruptHandler<peripherals::USB>;
});

/// USB driver type for the STM32F303 full-speed peripheral
pub type UsbDriver = Driver<'static, USB>;

static CONFIG_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static BOS_DESCRIPTOR: StaticCell<[u8; 256]> = StaticCell::new();
static CONTROL_BUF: StaticCell<[u8; 64]> = StaticCell::new();
static CDC_STATE: StaticCell<State<'static>> = StaticCell::new();
static LINK_HANDLER: StaticCell<LinkHandler> = StaticCell::new();

/// Reports bus-level events into the shared link flags
struct LinkHandler {
    signals: &'static LinkSignals,
}

impl Handler for LinkHandler {
    fn reset(&mut self) {
        self.signals.set_configured(false);
    }

    fn configured(&mut self, configured: bool) {
        log::info!("USB: {}", if configured { "Configured" } else { "Deconfigured" });
        self.signals.set_configured(configured);
    }
}

/// The built USB device and its CDC-ACM function
pub struct VcpUsb {
    pub device: UsbDevice<'static, UsbDriver>,
    pub class: CdcAcmClass<'static, UsbDriver>,
}

/// Build the Virtual COM Port device.
///
/// Must be called once; the descriptor buffers are static.
pub fn build(driver: UsbDriver, signals: &'static LinkSignals) -> VcpUsb {
    let mut usb_config = embassy_usb::Config::new(config::usb::VID, config::usb::PID);
    usb_config.manufacturer = Some(config::usb::MANUFACTURER);
    usb_config.product = Some(config::usb::PRODUCT);
    usb_config.serial_number = Some(config::usb::SERIAL_NUMBER);
    usb_config.max_power = 100;
    usb_config.max_packet_size_0 = 64;

    let mut builder = Builder::new(
        driver,
        usb_config,
        CONFIG_DESCRIPTOR.init([0; 256]),
        BOS_DESCRIPTOR.init([0; 256]),
        &mut [], // no msos descriptors
        CONTROL_BUF.init([0; 64]),
    );

    builder.handler(LINK_HANDLER.init(LinkHandler { signals }));

    let class = CdcAcmClass::new(
        &mut builder,
        CDC_STATE.init(State::new()),
        config::usb::MAX_PACKET_SIZE,
    );

    VcpUsb {
        device: builder.build(),
        class,
    }
}
