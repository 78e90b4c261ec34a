//! Flags shared between the caller and the USB interrupt context
//!
//! The busy flag is the outbound slot's ownership marker: the caller sets
//! it when it submits a transfer and the completion callback clears it.
//! Everything else is written by the interrupt side only. Payload data
//! is always published before the flag that announces it, so Release
//! stores pair with Acquire loads throughout.
//!
//! Each port reset starts a new session. A transfer picked up in an
//! earlier session reports its outcome through [`LinkSignals::finish_transfer`],
//! which drops it once the session has moved on.

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

/// Observable state of the outbound path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "embedded", derive(defmt::Format))]
pub enum TxState {
    /// No transfer outstanding
    Idle,
    /// A transfer was submitted and has not completed yet
    InFlight,
    /// The endpoint reported a hard failure; only a reset clears this
    Stalled,
}

/// How a transfer left the endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "embedded", derive(defmt::Format))]
pub enum TxOutcome {
    /// All bytes went out
    Sent,
    /// The host dropped the configuration mid-transfer
    Disconnected,
    /// The endpoint failed; the slot stays busy until reset
    Failed,
}

/// Link-level flags written from interrupt context
pub struct LinkSignals {
    busy: AtomicBool,
    stalled: AtomicBool,
    configured: AtomicBool,
    rx_overrun: AtomicBool,
    session: AtomicU32,
}

impl LinkSignals {
    /// Create the flag block with the outbound slot free and the link down
    pub const fn new() -> Self {
        Self {
            busy: AtomicBool::new(false),
            stalled: AtomicBool::new(false),
            configured: AtomicBool::new(false),
            rx_overrun: AtomicBool::new(false),
            session: AtomicU32::new(0),
        }
    }

    /// Completion callback: the in-flight transfer has left the endpoint
    pub fn transfer_complete(&self) {
        self.busy.store(false, Ordering::Release);
    }

    /// The endpoint halted; outstanding and future sends fail until reset
    pub fn endpoint_stalled(&self) {
        self.stalled.store(true, Ordering::Release);
    }

    /// Host configured (or deconfigured / bus-reset) the device
    pub fn set_configured(&self, configured: bool) {
        self.configured.store(configured, Ordering::Release);
    }

    /// Reception context dropped bytes because the queue was full
    pub fn report_overrun(&self) {
        self.rx_overrun.store(true, Ordering::Release);
    }

    /// Session a transfer belongs to, sampled when it is picked up
    pub fn session(&self) -> u32 {
        self.session.load(Ordering::Acquire)
    }

    /// Apply the outcome of a transfer picked up in `session`.
    ///
    /// Returns false, changing nothing, if the port was reset since.
    /// Must be called from the context that preempts the caller, so the
    /// check and the update are not split by a reset.
    pub fn finish_transfer(&self, session: u32, outcome: TxOutcome) -> bool {
        if self.session() != session {
            return false;
        }

        match outcome {
            TxOutcome::Sent => self.transfer_complete(),
            TxOutcome::Disconnected => {
                self.set_configured(false);
                self.transfer_complete();
            }
            TxOutcome::Failed => self.endpoint_stalled(),
        }
        true
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub fn is_stalled(&self) -> bool {
        self.stalled.load(Ordering::Acquire)
    }

    pub fn is_configured(&self) -> bool {
        self.configured.load(Ordering::Acquire)
    }

    pub fn tx_state(&self) -> TxState {
        if self.is_stalled() {
            TxState::Stalled
        } else if self.is_busy() {
            TxState::InFlight
        } else {
            TxState::Idle
        }
    }

    /// Mark the outbound slot as owned by a new transfer
    pub(crate) fn claim(&self) {
        self.busy.store(true, Ordering::Release);
    }

    /// Read and clear the overrun flag
    pub(crate) fn take_overrun(&self) -> bool {
        self.rx_overrun.swap(false, Ordering::AcqRel)
    }

    /// Return the outbound path to idle after a port reset and start a
    /// new session
    pub(crate) fn clear(&self) {
        self.session.fetch_add(1, Ordering::AcqRel);
        self.stalled.store(false, Ordering::Release);
        self.rx_overrun.store(false, Ordering::Release);
        self.busy.store(false, Ordering::Release);
    }
}

impl Default for LinkSignals {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let signals = LinkSignals::new();

        assert_eq!(signals.tx_state(), TxState::Idle);
        assert!(!signals.is_configured());
    }

    #[test]
    fn test_claim_and_complete() {
        let signals = LinkSignals::new();

        signals.claim();
        assert_eq!(signals.tx_state(), TxState::InFlight);

        signals.transfer_complete();
        assert_eq!(signals.tx_state(), TxState::Idle);
    }

    #[test]
    fn test_stall_keeps_busy_until_clear() {
        let signals = LinkSignals::new();

        signals.claim();
        signals.endpoint_stalled();
        assert_eq!(signals.tx_state(), TxState::Stalled);
        assert!(signals.is_busy());

        signals.clear();
        assert_eq!(signals.tx_state(), TxState::Idle);
        assert!(!signals.is_busy());
    }

    #[test]
    fn test_overrun_is_taken_once() {
        let signals = LinkSignals::new();

        signals.report_overrun();
        assert!(signals.take_overrun());
        assert!(!signals.take_overrun());
    }

    #[test]
    fn test_finish_transfer_in_current_session() {
        let signals = LinkSignals::new();
        signals.set_configured(true);

        signals.claim();
        assert!(signals.finish_transfer(signals.session(), TxOutcome::Sent));
        assert_eq!(signals.tx_state(), TxState::Idle);

        signals.claim();
        assert!(signals.finish_transfer(signals.session(), TxOutcome::Disconnected));
        assert_eq!(signals.tx_state(), TxState::Idle);
        assert!(!signals.is_configured());

        signals.claim();
        assert!(signals.finish_transfer(signals.session(), TxOutcome::Failed));
        assert_eq!(signals.tx_state(), TxState::Stalled);
    }

    #[test]
    fn test_outcome_from_before_clear_is_dropped() {
        let signals = LinkSignals::new();
        signals.set_configured(true);

        signals.claim();
        let stale = signals.session();
        signals.clear();
        signals.set_configured(true);
        assert_ne!(signals.session(), stale);

        // A new transfer is in flight when the old one fails late
        signals.claim();
        assert!(!signals.finish_transfer(stale, TxOutcome::Failed));
        assert!(!signals.finish_transfer(stale, TxOutcome::Disconnected));
        assert!(!signals.finish_transfer(stale, TxOutcome::Sent));

        assert_eq!(signals.tx_state(), TxState::InFlight);
        assert!(signals.is_configured());
    }

    #[test]
    fn test_completion_from_another_thread() {
        let signals = LinkSignals::new();
        signals.claim();

        std::thread::scope(|s| {
            s.spawn(|| signals.transfer_complete());
        });

        assert!(!signals.is_busy());
    }
}
