//! The logger facade: configuration, level gate, lifecycle, dispatch.
//!
//! A `Logger` moves Uninitialized → Ready (`init`) → Stopped (`destroy`,
//! terminal). The emit path takes only a shared read lock plus the buffer
//! mutex; `init`/`destroy` take the write lock. Minimum level and
//! congestion policy are relaxed atomics that may be flipped at any time
//! after init, racing benignly with concurrent emits (last writer wins).
//!
//! Most programs use the process-wide handle from [`Logger::global`],
//! constructed lazily on first touch so it cannot race other static
//! initializers. Its `destroy` must run before process exit when the target
//! is a file, or buffered bytes may be lost.

use std::fmt;
use std::io::{self, Write};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{SystemTime, UNIX_EPOCH};

use lazy_static::lazy_static;
use parking_lot::RwLock;

use crate::civil_time;
use crate::config::{CongestionControlPolicy, InitError, LoggerConfig, LoggerLevel, LoggerTarget};
use crate::consumer::Consumer;
use crate::context;
use crate::double_buffer::DoubleBuffer;
use crate::formatter;
use crate::rotation;

lazy_static! {
    static ref GLOBAL_LOGGER: Logger = Logger::new();
}

enum LifecycleState {
    Uninitialized,
    Ready,
    Stopped,
}

struct Inner {
    state: LifecycleState,
    config: LoggerConfig,
    utc_offset_secs: i64,
    buffer: Option<Arc<DoubleBuffer>>,
    consumer: Option<JoinHandle<()>>,
}

/// An asynchronous, rotating logger instance. One per process is the
/// intended shape; see [`Logger::global`].
pub struct Logger {
    level: AtomicU8,
    policy: AtomicU8,
    inner: RwLock<Inner>,
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger {
    /// The process-wide instance. Lazily constructed; call `init` on it
    /// during startup and `destroy` before exit.
    pub fn global() -> &'static Logger {
        &GLOBAL_LOGGER
    }

    /// An uninitialized logger keeping all records (minimum level Debug)
    /// under the Blocking policy. Emits are no-ops until `init` succeeds.
    pub fn new() -> Self {
        Self {
            level: AtomicU8::new(LoggerLevel::Debug as u8),
            policy: AtomicU8::new(CongestionControlPolicy::Blocking as u8),
            inner: RwLock::new(Inner {
                state: LifecycleState::Uninitialized,
                config: LoggerConfig::default(),
                utc_offset_secs: 0,
                buffer: None,
                consumer: None,
            }),
        }
    }

    /// Pure level gate: true for every level at or above the configured
    /// minimum. Callers should check this before any expensive formatting;
    /// `emit` re-checks it regardless.
    pub fn should_keep_log(&self, level: LoggerLevel) -> bool {
        level as u8 >= self.level.load(Ordering::Relaxed)
    }

    pub fn set_log_level(&self, level: LoggerLevel) {
        self.level.store(level as u8, Ordering::Relaxed);
    }

    pub fn set_congestion_control_policy(&self, policy: CongestionControlPolicy) {
        self.policy.store(policy as u8, Ordering::Relaxed);
    }

    /// Sets the calling thread's context key; forwards to
    /// [`crate::context::set_thread_context_key`].
    pub fn set_thread_context_key(&self, key: &str) {
        context::set_thread_context_key(key);
    }

    /// Validates the configuration, captures the UTC offset, and for the
    /// `File` target opens the live file, allocates both buffer regions and
    /// starts the consumer thread. For `Stdout` this only marks the logger
    /// Ready.
    ///
    /// A second call on a Ready logger is a no-op success. A call on a
    /// destroyed logger fails with [`InitError::Stopped`].
    pub fn init(&self, config: &LoggerConfig) -> Result<(), InitError> {
        let mut inner = self.inner.write();
        match inner.state {
            LifecycleState::Ready => return Ok(()),
            LifecycleState::Stopped => return Err(InitError::Stopped),
            LifecycleState::Uninitialized => {}
        }
        config.validate()?;
        inner.utc_offset_secs = civil_time::utc_offset_seconds();
        inner.config = config.clone();
        if config.target == LoggerTarget::File {
            let file = rotation::open_log_file(config).map_err(InitError::OpenLogFile)?;
            let (buffer, spare) = DoubleBuffer::new(config.buffer_size);
            let buffer = Arc::new(buffer);
            let consumer = Consumer::new(Arc::clone(&buffer), spare, file, config.clone());
            let handle = thread::Builder::new()
                .name("rolling-logger-consumer".to_string())
                .spawn(move || consumer.run())
                .map_err(InitError::SpawnConsumer)?;
            inner.buffer = Some(buffer);
            inner.consumer = Some(handle);
        }
        inner.state = LifecycleState::Ready;
        Ok(())
    }

    /// Stops the pipeline and joins the consumer, which drains bytes
    /// already pending at that instant, then flushes and closes the file.
    /// Idempotent; the logger is terminal afterwards. Records other threads
    /// are concurrently enqueueing are best-effort and may be dropped.
    pub fn destroy(&self) {
        let mut inner = self.inner.write();
        if let Some(buffer) = inner.buffer.take() {
            buffer.shutdown();
        }
        if let Some(handle) = inner.consumer.take() {
            let _ = handle.join();
        }
        inner.state = LifecycleState::Stopped;
    }

    /// Renders and dispatches one record. Fire-and-forget: below-minimum
    /// levels, an uninitialized or destroyed logger, and Dropping-policy
    /// discards all return silently.
    pub fn emit(&self, level: LoggerLevel, function: &str, line: u32, args: fmt::Arguments<'_>) {
        if !self.should_keep_log(level) {
            return;
        }
        let inner = self.inner.read();
        if !matches!(inner.state, LifecycleState::Ready) {
            return;
        }
        let timestamp_micros = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_micros() as u64)
            .unwrap_or(0);
        let message = formatter::render_message(args);
        let record = context::with_thread_context_key(|context_key| {
            formatter::format_record(
                level,
                function,
                line,
                &message,
                timestamp_micros,
                inner.utc_offset_secs,
                context::current_thread_id(),
                context_key,
            )
        });
        match inner.config.target {
            LoggerTarget::Stdout => {
                let _ = io::stdout().lock().write_all(record.as_bytes());
            }
            LoggerTarget::File => {
                let Some(buffer) = inner.buffer.as_ref() else {
                    return;
                };
                if record.as_bytes().len() >= buffer.capacity() {
                    emergency_log(format_args!(
                        "record of {} bytes cannot fit a buffer of {} bytes, dropped",
                        record.as_bytes().len(),
                        buffer.capacity()
                    ));
                    return;
                }
                let policy = CongestionControlPolicy::from_u8(self.policy.load(Ordering::Relaxed));
                // Dropped and ShutDown outcomes are silent by contract.
                let _ = buffer.push(record.as_bytes(), policy);
            }
        }
    }
}

/// Last-resort diagnostic channel for pipeline failures (rotation, file
/// I/O). Writes one line to stderr and never re-enters the pipeline, so a
/// failing disk cannot recurse the engine into itself.
pub(crate) fn emergency_log(args: fmt::Arguments<'_>) {
    let _ = writeln!(io::stderr().lock(), "[rolling_logger] {args}");
}
