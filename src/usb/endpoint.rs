//! CdcEndpoint implementation backed by the embassy-usb CDC-ACM class.
//!
//! The endpoint itself never touches the USB peripheral. Transfers go
//! through a single-slot channel to the pump task running in interrupt
//! context, and reception is armed through a signal.

use embassy_stm32::pac;
use embassy_stm32::pac::gpio::vals::Moder;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use heapless::Vec;

use crate::config::pins::USB_DP;
use crate::config::vcp::TX_CAPACITY;
use crate::vcp::{CdcEndpoint, EndpointError};

/// One outbound transfer
pub type TxPacket = Vec<u8, TX_CAPACITY>;

/// Outbound slot handed to the pump task
pub static TX_CHANNEL: Channel<CriticalSectionRawMutex, TxPacket, 1> = Channel::new();

/// Raised by `start_receive()`; the pump reads packets until a line ends
pub static RX_ARM: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// USB CDC-ACM endpoint of the Virtual COM Port
pub struct UsbCdcEndpoint {
    _private: (),
}

impl UsbCdcEndpoint {
    /// Must only exist once; the statics above are not shared with anyone else
    pub(crate) fn new() -> Self {
        Self { _private: () }
    }
}

impl CdcEndpoint for UsbCdcEndpoint {
    fn submit(&mut self, data: &[u8]) -> Result<(), EndpointError> {
        let packet = TxPacket::from_slice(data).map_err(|_| EndpointError::Stalled)?;

        // The busy flag guarantees the slot is free; a full slot means the
        // pump task is wedged
        TX_CHANNEL
            .try_send(packet)
            .map_err(|_| EndpointError::Stalled)
    }

    fn start_receive(&mut self) -> Result<(), EndpointError> {
        RX_ARM.signal(());
        Ok(())
    }

    fn disconnect(&mut self) {
        // Drop any transfer the pump has not picked up yet
        while TX_CHANNEL.try_receive().is_ok() {}
        RX_ARM.reset();

        // PA12 as push-pull output driven low
        pac::GPIOA.bsrr().write(|w| w.set_br(USB_DP, true));
        pac::GPIOA.moder().modify(|w| w.set_moder(USB_DP, Moder::OUTPUT));
    }

    fn connect(&mut self) {
        // Hand PA12 back to the USB peripheral (AF14 is still selected)
        pac::GPIOA.moder().modify(|w| w.set_moder(USB_DP, Moder::ALTERNATE));
    }
}
