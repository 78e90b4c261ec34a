//! embedded_io_async wrapper for CDC-ACM Receiver/Sender.
//!
//! Provides Read/Write implementations for the CDC packet-based API so the
//! pump task can treat the Virtual COM Port as a byte stream.

use embassy_usb::class::cdc_acm::{Receiver, Sender};
use embassy_usb::driver::{Driver, EndpointError};
use embedded_io_async::{ErrorType, Read, Write};

/// Error type for CDC I/O operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum CdcError {
    /// Endpoint disabled: the host dropped or reset the configuration
    Disconnected,
    /// Packet did not fit the buffer
    Overflow,
}

impl From<EndpointError> for CdcError {
    fn from(error: EndpointError) -> Self {
        match error {
            EndpointError::Disabled => CdcError::Disconnected,
            EndpointError::BufferOverflow => CdcError::Overflow,
        }
    }
}

impl embedded_io::Error for CdcError {
    fn kind(&self) -> embedded_io::ErrorKind {
        match self {
            CdcError::Disconnected => embedded_io::ErrorKind::NotConnected,
            CdcError::Overflow => embedded_io::ErrorKind::InvalidInput,
        }
    }
}

/// Wrapper around CDC Receiver that implements embedded_io_async::Read.
pub struct CdcReader<'d, D: Driver<'d>> {
    inner: Receiver<'d, D>,
}

impl<'d, D: Driver<'d>> CdcReader<'d, D> {
    pub fn new(inner: Receiver<'d, D>) -> Self {
        Self { inner }
    }
}

impl<'d, D: Driver<'d>> ErrorType for CdcReader<'d, D> {
    type Error = CdcError;
}

impl<'d, D: Driver<'d>> Read for CdcReader<'d, D> {
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        // Wait for the OUT endpoint to be enabled before reading
        self.inner.wait_connection().await;

        Ok(self.inner.read_packet(buf).await?)
    }
}

/// Wrapper around CDC Sender that implements embedded_io_async::Write.
///
/// Each write is one transfer. A transfer that exactly fills the last
/// packet is closed with a zero-length packet so the host does not wait
/// for more.
pub struct CdcWriter<'d, D: Driver<'d>> {
    inner: Sender<'d, D>,
}

impl<'d, D: Driver<'d>> CdcWriter<'d, D> {
    pub fn new(inner: Sender<'d, D>) -> Self {
        Self { inner }
    }
}

impl<'d, D: Driver<'d>> ErrorType for CdcWriter<'d, D> {
    type Error = CdcError;
}

impl<'d, D: Driver<'d>> Write for CdcWriter<'d, D> {
    async fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        // Wait for the IN endpoint to be enabled before writing
        self.inner.wait_connection().await;

        let max_packet = self.inner.max_packet_size() as usize;
        for chunk in buf.chunks(max_packet) {
            self.inner.write_packet(chunk).await?;
        }
        if !buf.is_empty() && buf.len() % max_packet == 0 {
            self.inner.write_packet(&[]).await?;
        }

        Ok(buf.len())
    }

    async fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}
