//! USB tasks, run on the interrupt executor.
//!
//! These play the part of the USB interrupt: they complete outbound
//! transfers, publish received bytes and never block the main loop.

use embassy_executor::Spawner;
use embassy_futures::join::join;
use embassy_stm32::peripherals::{PA11, PA12, USB};
use embassy_stm32::usb::Driver;
use embassy_stm32::Peri;
use embassy_usb::class::cdc_acm::CdcAcmClass;
use embassy_usb::UsbDevice;
use embedded_io_async::{Read, Write};

use crate::config::usb::MAX_PACKET_SIZE;
use crate::usb::{self, CdcError, CdcReader, CdcWriter, Irqs, UsbDriver, VcpUsb, RX_ARM, TX_CHANNEL};
use crate::vcp::{InboundFeed, LinkSignals, TxOutcome};

/// Build the USB device on the executor that will run it.
///
/// The device holds the non-`Send` event handler, so it is created here
/// rather than handed over from thread mode.
#[embassy_executor::task]
pub async fn vcp_start_task(
    usb_peri: Peri<'static, USB>,
    dp: Peri<'static, PA12>,
    dm: Peri<'static, PA11>,
    feed: InboundFeed<'static>,
    signals: &'static LinkSignals,
) {
    let spawner = Spawner::for_current_executor().await;

    let driver = Driver::new(usb_peri, Irqs, dp, dm);
    let VcpUsb { device, class } = usb::build(driver, signals);

    spawner.must_spawn(usb_device_task(device));
    spawner.must_spawn(cdc_pump_task(class, feed, signals));
}

/// Task that runs the USB device state machine
#[embassy_executor::task]
pub async fn usb_device_task(mut device: UsbDevice<'static, UsbDriver>) -> ! {
    device.run().await
}

/// Task that moves data between the CDC endpoints and the transport
#[embassy_executor::task]
pub async fn cdc_pump_task(
    class: CdcAcmClass<'static, UsbDriver>,
    feed: InboundFeed<'static>,
    signals: &'static LinkSignals,
) {
    let (sender, receiver) = class.split();

    join(
        transmit_loop(CdcWriter::new(sender), signals),
        receive_loop(CdcReader::new(receiver), feed, signals),
    )
    .await;
}

/// Write each submitted line, then signal completion
async fn transmit_loop(mut writer: CdcWriter<'static, UsbDriver>, signals: &LinkSignals) {
    loop {
        let packet = TX_CHANNEL.receive().await;
        let session = signals.session();

        let outcome = match writer.write(&packet).await {
            Ok(_) => TxOutcome::Sent,
            Err(CdcError::Disconnected) => {
                log::warn!("USB TX: Endpoint disabled, dropping {} bytes", packet.len());
                TxOutcome::Disconnected
            }
            Err(CdcError::Overflow) => {
                log::warn!("USB TX: Endpoint failed");
                TxOutcome::Failed
            }
        };

        if !signals.finish_transfer(session, outcome) {
            log::debug!("USB TX: Port was reset during transfer, outcome dropped");
        }
    }
}

/// Once armed, read packets until one carries a line terminator
async fn receive_loop(
    mut reader: CdcReader<'static, UsbDriver>,
    mut feed: InboundFeed<'static>,
    signals: &LinkSignals,
) {
    let mut buf = [0u8; MAX_PACKET_SIZE as usize];

    loop {
        RX_ARM.wait().await;

        loop {
            match reader.read(&mut buf).await {
                Ok(n) => {
                    if feed.deliver(&buf[..n]) {
                        break;
                    }
                }
                Err(CdcError::Disconnected) => {
                    signals.set_configured(false);
                    break;
                }
                Err(CdcError::Overflow) => {
                    // Packet larger than the buffer is lost
                    signals.report_overrun();
                }
            }
        }
    }
}
