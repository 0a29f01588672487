//! `jsonxl_log` v1:
//! Minimal `log` backend writing one line per record to stderr.
//!
//! stdout carries workbook bytes, so nothing here ever touches it.

use std::io::Write;

use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};

/// Stderr logger. Install with [`init`].
pub struct StderrLogger;

static LOGGER: StderrLogger = StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let mut stderr = std::io::stderr().lock();
        // Write failures on stderr are dropped.
        let _ = writeln!(stderr, "{}", format_record(record));
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// Render a record as `[LEVEL target] message`.
pub fn format_record(record: &Record<'_>) -> String {
    format!(
        "[{:<5} {}] {}",
        record.level(),
        record.target(),
        record.args()
    )
}

/// Map a `-v` count to a level filter: 0 → warn, 1 → info, 2+ → debug.
pub fn derive_level_filter(n_verbose: u8) -> LevelFilter {
    match n_verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    }
}

/// Install the stderr logger with the given maximum level.
pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
    log::set_logger(&LOGGER)?;
    log::set_max_level(level);
    Ok(())
}
