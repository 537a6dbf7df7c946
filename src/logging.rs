//! `log` backend that writes to the browser console.
//!
//! Game code logs with `log::info!("[SAVE] ...")`; the level picks the
//! console method so warnings and errors stand out in devtools.

use log::{Level, LevelFilter, Log, Metadata, Record};

struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let text = format!("{}", record.args());
        match record.level() {
            Level::Error => web_sys::console::error_1(&text.into()),
            Level::Warn => web_sys::console::warn_1(&text.into()),
            _ => web_sys::console::log_1(&text.into()),
        }
    }

    fn flush(&self) {}
}

/// Install the console logger. A second call is a no-op.
pub fn init() {
    let _ = log::set_logger(&LOGGER).map(|()| log::set_max_level(LevelFilter::Info));
}
