//! Line transport over a CDC endpoint
//!
//! All waiting is done by spinning: the caller is a single-threaded main
//! loop and the only other actor is the USB interrupt context, which
//! writes [`LinkSignals`] and feeds the receive queue.

use core::hint::spin_loop;

use embassy_time::{block_for, Duration, Instant};
use heapless::spsc::Consumer;
use log::{debug, info, warn};

use crate::config::vcp::{CONNECT_TIMEOUT_MS, RESET_SETTLE_MS, RX_QUEUE_SIZE, TX_CAPACITY};
use crate::vcp::inbound::{InboundBuffer, Line};
use crate::vcp::link::{LinkSignals, TxState};
use crate::vcp::traits::{CdcEndpoint, EndpointError};
use crate::vcp::TransportError;

/// Timing used by the transport
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// How long D+ is held low during `reset()`
    pub reset_settle: Duration,
    /// Default bound for `wait_configured()`
    pub connect_timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            reset_settle: Duration::from_millis(RESET_SETTLE_MS),
            connect_timeout: Duration::from_millis(CONNECT_TIMEOUT_MS),
        }
    }
}

/// Line-oriented send/receive over a CDC endpoint
pub struct LineTransport<'a, E: CdcEndpoint> {
    endpoint: E,
    signals: &'a LinkSignals,
    inbound: InboundBuffer<'a>,
    config: TransportConfig,
}

impl<'a, E: CdcEndpoint> LineTransport<'a, E> {
    pub fn new(
        endpoint: E,
        signals: &'a LinkSignals,
        consumer: Consumer<'a, u8, RX_QUEUE_SIZE>,
        config: TransportConfig,
    ) -> Self {
        Self {
            endpoint,
            signals,
            inbound: InboundBuffer::new(consumer),
            config,
        }
    }

    /// Send one line as a single transfer.
    ///
    /// Waits for the previous transfer to complete, submits `line` and
    /// returns without waiting for it. A stalled endpoint yields
    /// `NotReady` and leaves the slot busy until `reset()`.
    pub fn send(&mut self, line: &[u8]) -> Result<(), TransportError> {
        if line.len() > TX_CAPACITY {
            warn!("VCP: {} byte line exceeds {} byte transfer", line.len(), TX_CAPACITY);
            return Err(TransportError::BufferOverflow);
        }

        loop {
            if !self.signals.is_configured() {
                return Err(TransportError::Disconnected);
            }
            match self.signals.tx_state() {
                TxState::Idle => break,
                TxState::InFlight => spin_loop(),
                TxState::Stalled => {
                    warn!("VCP: Endpoint stalled, reset required");
                    return Err(TransportError::NotReady);
                }
            }
        }

        self.signals.claim();
        match self.endpoint.submit(line) {
            Ok(()) => {
                debug!("VCP TX: {} bytes", line.len());
                Ok(())
            }
            Err(EndpointError::Stalled) => {
                warn!("VCP TX: Endpoint stalled");
                self.signals.endpoint_stalled();
                Err(TransportError::NotReady)
            }
            Err(EndpointError::Disconnected) => {
                // Nothing was queued, so nothing will complete
                self.signals.transfer_complete();
                Err(TransportError::Disconnected)
            }
        }
    }

    /// Receive one line, terminator excluded.
    ///
    /// Arms reception if no complete line is queued yet, then spins until
    /// a `\n` or `\r` arrives. On `Timeout` the partial line is kept and
    /// the next call continues it.
    pub fn receive_line(&mut self, timeout: Option<Duration>) -> Result<Line, TransportError> {
        // A timeout too large to represent means no deadline
        let deadline = timeout.and_then(|t| Instant::now().checked_add(t));
        let mut armed = false;

        loop {
            if self.signals.take_overrun() {
                warn!("VCP RX: Receive queue overrun, dropping partial line");
                self.inbound.clear();
                return Err(TransportError::BufferOverflow);
            }

            match self.inbound.poll() {
                Ok(true) => {
                    if let Some(line) = self.inbound.take_line() {
                        debug!("VCP RX: {} bytes", line.len());
                        return Ok(line);
                    }
                }
                Ok(false) => {}
                Err(e) => {
                    warn!("VCP RX: Line exceeds buffer, discarded");
                    return Err(e);
                }
            }

            if !self.signals.is_configured() {
                return Err(TransportError::Disconnected);
            }

            if !armed {
                self.endpoint.start_receive()?;
                armed = true;
            }

            if let Some(deadline) = deadline {
                if Instant::now() >= deadline {
                    return Err(TransportError::Timeout);
                }
            }

            spin_loop();
        }
    }

    /// Force the host to re-enumerate the device.
    ///
    /// Holds D+ low for the settle delay, releases it and returns both
    /// paths to idle. The link stays down until the host configures the
    /// device again.
    pub fn reset(&mut self) {
        info!("VCP: Resetting port");

        self.endpoint.disconnect();
        self.signals.set_configured(false);
        block_for(self.config.reset_settle);
        self.endpoint.connect();

        self.signals.clear();
        self.inbound.clear();
    }

    /// Spin until the host has configured the device.
    ///
    /// `None` uses the configured connect timeout.
    pub fn wait_configured(&self, timeout: Option<Duration>) -> Result<(), TransportError> {
        let deadline = Instant::now()
            .checked_add(timeout.unwrap_or(self.config.connect_timeout))
            .unwrap_or(Instant::MAX);

        while !self.signals.is_configured() {
            if Instant::now() >= deadline {
                warn!("VCP: Host did not configure the device");
                return Err(TransportError::Disconnected);
            }
            spin_loop();
        }

        info!("VCP: Link configured");
        Ok(())
    }

    pub fn tx_state(&self) -> TxState {
        self.signals.tx_state()
    }

    pub fn is_configured(&self) -> bool {
        self.signals.is_configured()
    }

    pub fn endpoint(&self) -> &E {
        &self.endpoint
    }
}
