use std::path::PathBuf;
use thiserror::Error;

/// Configuration and shared limits for the logging engine.
///
/// A `LoggerConfig` is handed to `Logger::init` exactly once and is immutable
/// afterwards; everything that may change at runtime (minimum level,
/// congestion policy, per-thread context key) lives outside of it.

/// Maximum rendered length of a single message body, in bytes.
/// Longer messages are truncated without a marker.
pub const MESSAGE_BUFFER_MAX_LEN: usize = 4096;

/// Maximum length of the source-location (function path) field, in bytes.
pub const FUNCTION_BUFFER_MAX_LEN: usize = 1024;

/// Hard cap on total double-buffer memory. A single region may use at most
/// half of this, so both regions together never exceed the cap.
pub const BUFFER_SIZE_MAX: usize = 64 * 1024 * 1024;

/// Stack scratch size for rendering one line. Lines longer than this spill
/// to a one-shot heap buffer.
pub(crate) const LINE_SCRATCH_LEN: usize =
    MESSAGE_BUFFER_MAX_LEN + FUNCTION_BUFFER_MAX_LEN + 1024;

/// Extension given to rotated-archive containers.
pub const ARCHIVE_FILE_EXTENSION: &str = "tar.gz";

/// Severity of a log record, ordered from least to most severe.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LoggerLevel {
    Debug = 0,
    Info = 1,
    Warning = 2,
    Error = 3,
    Fatal = 4,
}

impl LoggerLevel {
    /// The fixed tag rendered into the second field of every line.
    pub fn as_str(self) -> &'static str {
        match self {
            LoggerLevel::Debug => "DBG",
            LoggerLevel::Info => "INFO",
            LoggerLevel::Warning => "WARN",
            LoggerLevel::Error => "ERR",
            LoggerLevel::Fatal => "FATAL",
        }
    }

}

/// Where rendered lines end up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoggerTarget {
    /// Immediate, unbuffered console output. No consumer thread is started.
    Stdout,
    /// Asynchronous delivery through the double buffer into a rotating file.
    File,
}

/// What a producer does when the frontend buffer cannot take its record.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CongestionControlPolicy {
    /// Wait until the consumer frees enough room. Never loses a record, may
    /// block the producer indefinitely if the consumer stalls.
    Blocking = 0,
    /// Discard the record immediately. Bounded latency, loses records under
    /// sustained overload.
    Dropping = 1,
}

impl CongestionControlPolicy {
    pub(crate) fn from_u8(value: u8) -> CongestionControlPolicy {
        match value {
            0 => CongestionControlPolicy::Blocking,
            _ => CongestionControlPolicy::Dropping,
        }
    }
}

/// Immutable logger configuration, supplied once to `Logger::init`.
#[derive(Debug, Clone)]
pub struct LoggerConfig {
    pub target: LoggerTarget,
    /// Directory holding the live file, temporaries and archives. Must
    /// already exist for the `File` target.
    pub log_dir_path: PathBuf,
    /// Base name of the live log file, e.g. `app.log`.
    pub file_name: String,
    /// Rotation threshold in bytes; the file is retired once its size
    /// reaches this value. Must be non-zero for the `File` target.
    pub file_size_max: u64,
    /// Base name of archive containers; the full name gains a monotonic
    /// token and the archive extension.
    pub archive_file_name: String,
    /// Advisory retention bound. The engine does not prune archives itself;
    /// callers relying on bounded disk use must prune externally.
    pub archive_count_max: usize,
    /// Capacity of each buffer region in bytes. At most `BUFFER_SIZE_MAX / 2`.
    pub buffer_size: usize,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            target: LoggerTarget::Stdout,
            log_dir_path: PathBuf::from("."),
            file_name: "app.log".to_string(),
            file_size_max: 16 * 1024 * 1024,
            archive_file_name: "app".to_string(),
            archive_count_max: 10,
            buffer_size: 1024 * 1024,
        }
    }
}

impl LoggerConfig {
    pub(crate) fn validate(&self) -> Result<(), InitError> {
        if self.target == LoggerTarget::Stdout {
            return Ok(());
        }
        if !self.log_dir_path.is_dir() {
            return Err(InitError::InvalidLogDir(self.log_dir_path.clone()));
        }
        if self.file_name.is_empty() {
            return Err(InitError::EmptyFileName);
        }
        if self.buffer_size == 0 || self.buffer_size > BUFFER_SIZE_MAX / 2 {
            return Err(InitError::BufferSizeOutOfRange(self.buffer_size));
        }
        if self.file_size_max == 0 {
            return Err(InitError::ZeroRotationThreshold);
        }
        Ok(())
    }
}

/// Why `Logger::init` refused a configuration. Init is the only fallible
/// public operation; past it, failures are silent drops or internal
/// diagnostics.
#[derive(Debug, Error)]
pub enum InitError {
    #[error("log directory {0:?} does not exist or is not a directory")]
    InvalidLogDir(PathBuf),
    #[error("log file name must not be empty")]
    EmptyFileName,
    #[error("buffer size {0} is out of range, per-region cap is {cap}", cap = BUFFER_SIZE_MAX / 2)]
    BufferSizeOutOfRange(usize),
    #[error("rotation threshold must be greater than zero")]
    ZeroRotationThreshold,
    #[error("failed to open log file: {0}")]
    OpenLogFile(#[source] std::io::Error),
    #[error("failed to spawn consumer thread: {0}")]
    SpawnConsumer(#[source] std::io::Error),
    #[error("logger has been destroyed and cannot be re-initialized")]
    Stopped,
}
