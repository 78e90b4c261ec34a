//! Log output over RTT.
//!
//! Implements the `log` facade by formatting each record into a fixed-size
//! buffer and handing it to defmt. Messages longer than the buffer are
//! truncated.

use core::fmt::Write;

use heapless::String;
use log::{Level, LevelFilter, Log, Metadata, Record};

/// Maximum length of a single log message
const MAX_LOG_MSG_LEN: usize = 128;

/// Forwards `log` records to defmt-rtt
struct RttLogger;

static LOGGER: RttLogger = RttLogger;

impl Log for RttLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let mut msg: String<MAX_LOG_MSG_LEN> = String::new();
        let _ = msg.write_fmt(*record.args());

        match record.level() {
            Level::Error => defmt::error!("{=str}", msg.as_str()),
            Level::Warn => defmt::warn!("{=str}", msg.as_str()),
            Level::Info => defmt::info!("{=str}", msg.as_str()),
            Level::Debug => defmt::debug!("{=str}", msg.as_str()),
            Level::Trace => defmt::trace!("{=str}", msg.as_str()),
        }
    }

    fn flush(&self) {}
}

/// Install the logger.
///
/// Must be called once during startup, before the first log call.
/// Later calls are ignored.
pub fn init(level: LevelFilter) {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}
