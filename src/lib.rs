//! # rolling_logger
//!
//! An in-process asynchronous logging engine: any number of producer
//! threads emit leveled, formatted records; one background consumer
//! persists them to a size-rotated, archive-compressed file (or records go
//! straight to the console).
//!
//! ## How delivery works
//!
//! * Producers render each record into one text line and append it to the
//!   frontend half of a double buffer under a mutex.
//! * When the frontend cannot take a record, the congestion policy decides:
//!   `Blocking` waits for the consumer, `Dropping` discards immediately.
//! * The consumer swaps the two buffer regions (an O(1) ownership
//!   exchange), writes the drained bytes to the live file with no lock
//!   held, and rotates the file into a `.tar.gz` archive once it crosses
//!   the size threshold.
//!
//! Within one thread, records reach the file in emission order. Nothing on
//! the logging path panics or returns an error; only `init` is fallible.
//!
//! ## Quick start
//!
//! ```no_run
//! use rolling_logger::{infolog, Logger, LoggerConfig, LoggerTarget};
//!
//! let config = LoggerConfig {
//!     target: LoggerTarget::File,
//!     log_dir_path: "/var/log/myapp".into(),
//!     file_name: "myapp.log".to_string(),
//!     ..LoggerConfig::default()
//! };
//! Logger::global().init(&config).unwrap();
//!
//! infolog!("service started, pid {}", std::process::id());
//!
//! // Flushes buffered bytes; required before exit for file targets.
//! Logger::global().destroy();
//! ```
//!
//! ## Main components
//!
//! * [`Logger`]: the facade holding lifecycle, level gate and dispatch
//! * [`LoggerConfig`]: immutable configuration supplied once to `init`
//! * [`set_thread_context_key`]: per-thread correlation key stamped into
//!   every line that thread emits
//! * [`install_log_adapter`]: routes the `log` crate's macros through the
//!   engine

pub mod civil_time;
pub mod config;
mod consumer;
pub mod context;
mod double_buffer;
mod formatter;
pub mod log_adapter;
pub mod logger;
mod rotation;

pub use config::{
    CongestionControlPolicy, InitError, LoggerConfig, LoggerLevel, LoggerTarget,
    ARCHIVE_FILE_EXTENSION, BUFFER_SIZE_MAX, FUNCTION_BUFFER_MAX_LEN, MESSAGE_BUFFER_MAX_LEN,
};
pub use context::set_thread_context_key;
pub use log_adapter::{install_log_adapter, LogFacadeAdapter};
pub use logger::Logger;

/// Resolves to the path of the enclosing function, e.g.
/// `myapp::worker::run`.
#[doc(hidden)]
#[macro_export]
macro_rules! __function_path {
    () => {{
        fn f() {}
        let name = ::std::any::type_name_of_val(&f);
        name.strip_suffix("::f").unwrap_or(name)
    }};
}

#[doc(hidden)]
#[macro_export]
macro_rules! __emit_log {
    ($level:expr, $fmt:literal $(, $arg:expr)* $(,)?) => {{
        let logger = $crate::Logger::global();
        // Gate before formatting; emit re-checks.
        if logger.should_keep_log($level) {
            logger.emit(
                $level,
                $crate::__function_path!(),
                ::core::line!(),
                ::core::format_args!($fmt $(, $arg)*),
            );
        }
    }};
}

/// Emits a Debug record through the global logger, capturing the enclosing
/// function path and line number.
///
/// ```no_run
/// # use rolling_logger::dbglog;
/// dbglog!("cache miss for {}", "key-42");
/// ```
#[macro_export]
macro_rules! dbglog {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::__emit_log!($crate::LoggerLevel::Debug, $fmt $(, $arg)*)
    };
}

/// Emits an Info record through the global logger.
#[macro_export]
macro_rules! infolog {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::__emit_log!($crate::LoggerLevel::Info, $fmt $(, $arg)*)
    };
}

/// Emits a Warning record through the global logger.
#[macro_export]
macro_rules! warnlog {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::__emit_log!($crate::LoggerLevel::Warning, $fmt $(, $arg)*)
    };
}

/// Emits an Error record through the global logger.
#[macro_export]
macro_rules! errlog {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::__emit_log!($crate::LoggerLevel::Error, $fmt $(, $arg)*)
    };
}

/// Emits a Fatal record through the global logger.
#[macro_export]
macro_rules! fatallog {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::__emit_log!($crate::LoggerLevel::Fatal, $fmt $(, $arg)*)
    };
}
