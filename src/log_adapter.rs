//! Bridge publishing the global logger through the `log` facade.
//!
//! Lets code already written against `log::info!` and friends flow through
//! the asynchronous pipeline without changes. Install explicitly, after
//! `Logger::global().init(..)`:
//!
//! ```no_run
//! # use rolling_logger::{Logger, LoggerConfig};
//! Logger::global().init(&LoggerConfig::default()).unwrap();
//! rolling_logger::install_log_adapter().unwrap();
//! log::info!("routed through the engine");
//! ```

use log::{Level, Metadata, Record};

use crate::config::LoggerLevel;
use crate::logger::Logger;

/// `log::Log` implementation over [`Logger::global`].
pub struct LogFacadeAdapter;

fn map_level(level: Level) -> LoggerLevel {
    match level {
        Level::Trace | Level::Debug => LoggerLevel::Debug,
        Level::Info => LoggerLevel::Info,
        Level::Warn => LoggerLevel::Warning,
        Level::Error => LoggerLevel::Error,
    }
}

impl log::Log for LogFacadeAdapter {
    fn enabled(&self, metadata: &Metadata) -> bool {
        Logger::global().should_keep_log(map_level(metadata.level()))
    }

    fn log(&self, record: &Record) {
        let level = map_level(record.level());
        let function = record.module_path().unwrap_or("unknown");
        let line = record.line().unwrap_or(0);
        Logger::global().emit(level, function, line, *record.args());
    }

    // Delivery is asynchronous by design; there is nothing to flush here.
    fn flush(&self) {}
}

static ADAPTER: LogFacadeAdapter = LogFacadeAdapter;

/// Registers the adapter as the `log` crate's logger and opens the level
/// filter fully; the engine's own gate decides what is kept.
pub fn install_log_adapter() -> Result<(), log::SetLoggerError> {
    log::set_logger(&ADAPTER)?;
    log::set_max_level(log::LevelFilter::Trace);
    Ok(())
}
