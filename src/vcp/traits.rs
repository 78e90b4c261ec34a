//! CDC endpoint trait for abstraction and testability
//!
//! This trait is the hardware side of the Virtual COM Port: it accepts
//! outbound transfers, arms reception and drives the D+ line. Completion
//! and received bytes come back asynchronously through [`LinkSignals`]
//! and the receive queue, never through this trait.
//!
//! [`LinkSignals`]: crate::vcp::link::LinkSignals

/// Errors reported by the hardware endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "embedded", derive(defmt::Format))]
pub enum EndpointError {
    /// Endpoint is halted and will not accept transfers until reset
    Stalled,
    /// Host has not configured the device
    Disconnected,
}

/// Abstract CDC endpoint interface
///
/// Implemented by the USB CDC-ACM endpoint on the target and by a mock
/// for testing.
pub trait CdcEndpoint {
    /// Hand one transfer to the endpoint.
    ///
    /// Returns as soon as the data has been accepted; completion is
    /// signalled later from the interrupt context.
    fn submit(&mut self, data: &[u8]) -> Result<(), EndpointError>;

    /// Arm the OUT endpoint so the host may send data
    fn start_receive(&mut self) -> Result<(), EndpointError>;

    /// Pull D+ low so the host sees a detach
    fn disconnect(&mut self);

    /// Release D+ so the host enumerates the device again
    fn connect(&mut self);
}
