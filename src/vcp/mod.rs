//! Line-oriented Virtual COM Port transport.
//!
//! A half-duplex, single-outstanding-transfer layer over a CDC endpoint:
//! - outbound lines are fired one at a time, each send waiting for the
//!   previous transfer's completion signal
//! - inbound bytes are accumulated until `\n` or `\r`

pub mod inbound;
pub mod link;
pub mod traits;
pub mod transport;

pub use inbound::{InboundBuffer, InboundFeed, Line, RxQueue};
pub use link::{LinkSignals, TxOutcome, TxState};
pub use traits::{CdcEndpoint, EndpointError};
pub use transport::{LineTransport, TransportConfig};

/// Errors surfaced to the caller of the transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "embedded", derive(defmt::Format))]
pub enum TransportError {
    /// Endpoint reported a hard failure; call `reset()` before retrying
    NotReady,
    /// No line terminator arrived within the caller's timeout
    Timeout,
    /// Host has not (re)configured the device
    Disconnected,
    /// Line longer than the buffer, or received bytes were dropped
    BufferOverflow,
}

impl From<EndpointError> for TransportError {
    fn from(error: EndpointError) -> Self {
        match error {
            EndpointError::Stalled => TransportError::NotReady,
            EndpointError::Disconnected => TransportError::Disconnected,
        }
    }
}
