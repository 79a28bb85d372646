//! The single background worker that persists drained buffers.
//!
//! State machine: Idle (parked on the not-empty condition) → Draining
//! (region swap under the mutex) → Writing (file append with no lock held)
//! → Rotating when the post-write size reaches the threshold → Idle.
//! Terminal state Stopped: entered once shutdown is requested and nothing
//! is pending, after which the file is flushed and closed.

use std::fs::File;
use std::io::Write;
use std::sync::Arc;

use crate::config::LoggerConfig;
use crate::double_buffer::{DoubleBuffer, DrainOutcome};
use crate::logger::emergency_log;
use crate::rotation;

pub(crate) struct Consumer {
    buffer: Arc<DoubleBuffer>,
    /// The backend region; exchanged with the frontend on every drain.
    spare: Box<[u8]>,
    /// Consumer-private by design: producers never touch the file handle,
    /// so no lock wraps the writes. `None` after a failed reopen; the next
    /// drain retries.
    file: Option<File>,
    /// Size at open plus bytes appended since, so the threshold check does
    /// no metadata syscall per write.
    file_size: u64,
    config: LoggerConfig,
}

impl Consumer {
    pub(crate) fn new(
        buffer: Arc<DoubleBuffer>,
        spare: Box<[u8]>,
        file: File,
        config: LoggerConfig,
    ) -> Self {
        let file_size = file.metadata().map(|meta| meta.len()).unwrap_or(0);
        Self {
            buffer,
            spare,
            file: Some(file),
            file_size,
            config,
        }
    }

    /// Runs until shutdown. A final drain happens only for bytes already
    /// pending when shutdown is requested.
    pub(crate) fn run(mut self) {
        loop {
            match self.buffer.drain_into(&mut self.spare) {
                DrainOutcome::Drained(pending) => self.write_drained(pending),
                DrainOutcome::ShutDown => break,
            }
        }
        if let Some(file) = self.file.take() {
            let _ = file.sync_all();
        }
    }

    fn write_drained(&mut self, pending: usize) {
        if self.file.is_none() {
            match rotation::open_log_file(&self.config) {
                Ok(file) => {
                    self.file_size = file.metadata().map(|meta| meta.len()).unwrap_or(0);
                    self.file = Some(file);
                }
                Err(err) => {
                    emergency_log(format_args!(
                        "log file unavailable, dropping {pending} pending bytes: {err}"
                    ));
                    return;
                }
            }
        }
        let Some(file) = self.file.as_mut() else {
            return;
        };
        if let Err(err) = file.write_all(&self.spare[..pending]) {
            emergency_log(format_args!(
                "failed to write {pending} bytes to log file: {err}"
            ));
            return;
        }
        self.file_size += pending as u64;
        if self.file_size >= self.config.file_size_max {
            self.rotate();
        }
    }

    fn rotate(&mut self) {
        // Close before the rename.
        self.file = None;
        match rotation::rotate(&self.config) {
            Ok(file) => {
                self.file_size = file.metadata().map(|meta| meta.len()).unwrap_or(0);
                self.file = Some(file);
            }
            Err(err) => {
                emergency_log(format_args!(
                    "failed to reopen log file after rotation: {err}"
                ));
            }
        }
    }
}
