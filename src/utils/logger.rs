// src/utils/logger.rs
//
// All diagnostics go to the error stream as plain human-readable lines;
// nothing downstream parses them.

use log::{Level, LevelFilter, Metadata, Record, SetLoggerError};

static LOGGER: StderrLogger = StderrLogger;

struct StderrLogger;

pub fn init() -> Result<(), SetLoggerError> {
    log::set_logger(&LOGGER).map(|()| log::set_max_level(LevelFilter::Info))
}

/// Verbose mode opens up the debug-level chatter (per-file progress,
/// molecule switches).
pub fn set_verbose(verbose: bool) {
    log::set_max_level(if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    });
}

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Debug
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            match record.level() {
                Level::Error => eprintln!("molview: error: {}", record.args()),
                Level::Warn => eprintln!("molview: warning: {}", record.args()),
                _ => eprintln!("molview: {}", record.args()),
            }
        }
    }

    fn flush(&self) {}
}
