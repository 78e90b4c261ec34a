//! Board bring-up for the STM32F3-Discovery.

use embassy_executor::SendSpawner;
use embassy_stm32::peripherals::{PA11, PA12, USB};
use embassy_stm32::time::Hertz;
use embassy_stm32::{Config, Peri, Peripherals};
use static_cell::StaticCell;

use crate::tasks::vcp_start_task;
use crate::usb::UsbCdcEndpoint;
use crate::vcp::{InboundFeed, LineTransport, LinkSignals, RxQueue, TransportConfig};

/// Flags shared between the main loop and the USB tasks
pub static LINK: LinkSignals = LinkSignals::new();

/// Receive queue, split between the pump task and the transport
static RX_QUEUE: StaticCell<RxQueue> = StaticCell::new();

/// Clock the core at 72 MHz from the 8 MHz ST-LINK clock and take the peripherals
pub fn init() -> Peripherals {
    let mut config = Config::default();
    {
        use embassy_stm32::rcc::*;
        config.rcc.hse = Some(Hse {
            freq: Hertz(8_000_000),
            mode: HseMode::Bypass,
        });
        config.rcc.pll = Some(Pll {
            src: PllSource::HSE,
            prediv: PllPreDiv::DIV1,
            mul: PllMul::MUL9,
        });
        config.rcc.sys = Sysclk::PLL1_P;
        config.rcc.ahb_pre = AHBPrescaler::DIV1;
        config.rcc.apb1_pre = APBPrescaler::DIV2;
        config.rcc.apb2_pre = APBPrescaler::DIV1;
    }
    embassy_stm32::init(config)
}

/// Bring up the Virtual COM Port.
///
/// The USB tasks are spawned on `spawner`, which must belong to an
/// interrupt executor so they keep running while the caller spins.
/// May only be called once.
pub fn start_vcp(
    spawner: SendSpawner,
    usb_peri: Peri<'static, USB>,
    dp: Peri<'static, PA12>,
    dm: Peri<'static, PA11>,
) -> LineTransport<'static, UsbCdcEndpoint> {
    let (producer, consumer) = RX_QUEUE.init(RxQueue::new()).split();

    spawner.must_spawn(vcp_start_task(
        usb_peri,
        dp,
        dm,
        InboundFeed::new(producer, &LINK),
        &LINK,
    ));

    LineTransport::new(
        UsbCdcEndpoint::new(),
        &LINK,
        consumer,
        TransportConfig::default(),
    )
}
