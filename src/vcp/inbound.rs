//! Inbound line accumulation
//!
//! The reception context publishes raw bytes into a single-producer,
//! single-consumer queue through [`InboundFeed`]. The caller side,
//! [`InboundBuffer`], moves them into a fixed-capacity line until a
//! `\n` or `\r` arrives. Bytes that follow a terminator stay queued and
//! start the next line.

use crate::config::vcp::{CARRIAGE_RETURN, LINE_CAPACITY, LINE_FEED, RX_QUEUE_SIZE};
use crate::vcp::link::LinkSignals;
use crate::vcp::TransportError;
use heapless::spsc::{Consumer, Producer, Queue};
use heapless::Vec;

/// Byte queue between the reception context and the caller
pub type RxQueue = Queue<u8, RX_QUEUE_SIZE>;

/// A complete received line, terminator excluded
pub type Line = Vec<u8, LINE_CAPACITY>;

/// Returns true for either line terminator
pub fn is_terminator(byte: u8) -> bool {
    byte == LINE_FEED || byte == CARRIAGE_RETURN
}

/// Producer half, owned by the reception (interrupt) context
pub struct InboundFeed<'a> {
    producer: Producer<'a, u8, RX_QUEUE_SIZE>,
    signals: &'a LinkSignals,
}

impl<'a> InboundFeed<'a> {
    pub fn new(producer: Producer<'a, u8, RX_QUEUE_SIZE>, signals: &'a LinkSignals) -> Self {
        Self { producer, signals }
    }

    /// Publish received bytes to the caller.
    ///
    /// Bytes that do not fit are dropped and the overrun flag is raised.
    /// Returns true if `bytes` contained a line terminator.
    pub fn deliver(&mut self, bytes: &[u8]) -> bool {
        let mut terminated = false;

        for &byte in bytes {
            if is_terminator(byte) {
                terminated = true;
            }
            if self.producer.enqueue(byte).is_err() {
                self.signals.report_overrun();
            }
        }

        terminated
    }
}

/// Caller-side line accumulator
pub struct InboundBuffer<'a> {
    consumer: Consumer<'a, u8, RX_QUEUE_SIZE>,
    line: Line,
    terminated: bool,
    /// Dropping the tail of an oversized line up to its terminator
    discarding: bool,
}

impl<'a> InboundBuffer<'a> {
    pub fn new(consumer: Consumer<'a, u8, RX_QUEUE_SIZE>) -> Self {
        Self {
            consumer,
            line: Vec::new(),
            terminated: false,
            discarding: false,
        }
    }

    /// Drain queued bytes into the line.
    ///
    /// Returns `Ok(true)` once a terminator has been seen. Stops at the
    /// terminator so later bytes remain queued. A line longer than
    /// [`LINE_CAPACITY`] is discarded and reported as `BufferOverflow`;
    /// the rest of it up to the next terminator is dropped as well.
    pub fn poll(&mut self) -> Result<bool, TransportError> {
        if self.terminated {
            return Ok(true);
        }

        while let Some(byte) = self.consumer.dequeue() {
            if is_terminator(byte) {
                if self.discarding {
                    self.discarding = false;
                    continue;
                }
                self.terminated = true;
                return Ok(true);
            }

            if self.discarding {
                continue;
            }

            if self.line.push(byte).is_err() {
                self.line.clear();
                self.discarding = true;
                return Err(TransportError::BufferOverflow);
            }
        }

        Ok(false)
    }

    /// Extract the finished line and start a fresh one.
    ///
    /// Returns `None` if no terminator has been seen yet.
    pub fn take_line(&mut self) -> Option<Line> {
        if !self.terminated {
            return None;
        }

        self.terminated = false;
        Some(core::mem::replace(&mut self.line, Vec::new()))
    }

    /// Discard the partial line and everything still queued
    pub fn clear(&mut self) {
        while self.consumer.dequeue().is_some() {}
        self.line.clear();
        self.terminated = false;
        self.discarding = false;
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// Bytes accumulated in the current line
    pub fn len(&self) -> usize {
        self.line.len()
    }

    pub fn is_empty(&self) -> bool {
        self.line.is_empty()
    }
}
