//! Renders a log record into one self-delimited text line.
//!
//! Line format, fixed for downstream parsers:
//!
//! `[YYYY-MM-DD HH:MM:SS.micros][LEVEL][message][function:line][threadID][contextKey]`
//!
//! terminated by the platform line ending. The message body is capped at
//! `MESSAGE_BUFFER_MAX_LEN` bytes and the function path at
//! `FUNCTION_BUFFER_MAX_LEN` bytes, both truncated without a marker. A
//! failing `Display` impl substitutes a placeholder instead of surfacing an
//! error; formatting never fails into caller code.

use std::fmt::{self, Write};

use crate::civil_time::civil_datetime;
use crate::config::{
    LoggerLevel, FUNCTION_BUFFER_MAX_LEN, LINE_SCRATCH_LEN, MESSAGE_BUFFER_MAX_LEN,
};

#[cfg(windows)]
pub(crate) const LINE_ENDING: &str = "\r\n";
#[cfg(not(windows))]
pub(crate) const LINE_ENDING: &str = "\n";

/// Substituted for the message body when argument rendering fails.
const RENDER_FAILURE_PLACEHOLDER: &str = "...";

/// A rendered line: an inline stack region that spills to a one-shot heap
/// buffer when the line outgrows it. The spill copies what was already
/// rendered, so an oversized line is never truncated or corrupted.
pub(crate) struct LineBuffer {
    stack: [u8; LINE_SCRATCH_LEN],
    len: usize,
    heap: Option<Vec<u8>>,
}

impl LineBuffer {
    fn new() -> Self {
        Self {
            stack: [0u8; LINE_SCRATCH_LEN],
            len: 0,
            heap: None,
        }
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        match &self.heap {
            Some(heap) => heap,
            None => &self.stack[..self.len],
        }
    }

    fn push_bytes(&mut self, bytes: &[u8]) {
        if let Some(heap) = &mut self.heap {
            heap.extend_from_slice(bytes);
            return;
        }
        if self.len + bytes.len() <= LINE_SCRATCH_LEN {
            self.stack[self.len..self.len + bytes.len()].copy_from_slice(bytes);
            self.len += bytes.len();
        } else {
            let mut heap = Vec::with_capacity(self.len + bytes.len());
            heap.extend_from_slice(&self.stack[..self.len]);
            heap.extend_from_slice(bytes);
            self.heap = Some(heap);
        }
    }
}

impl fmt::Write for LineBuffer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.push_bytes(s.as_bytes());
        Ok(())
    }
}

/// `fmt::Write` sink that silently stops accepting bytes past `cap`,
/// cutting on a char boundary.
struct BoundedWriter<'a> {
    buf: &'a mut String,
    cap: usize,
}

impl fmt::Write for BoundedWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let remaining = self.cap - self.buf.len();
        if remaining == 0 {
            return Ok(());
        }
        if s.len() <= remaining {
            self.buf.push_str(s);
        } else {
            let mut cut = remaining;
            while !s.is_char_boundary(cut) {
                cut -= 1;
            }
            self.buf.push_str(&s[..cut]);
        }
        Ok(())
    }
}

/// Renders the caller's message arguments, truncated to
/// `MESSAGE_BUFFER_MAX_LEN`. A `fmt::Error` surfaced by an argument's
/// `Display`/`Debug` impl yields the placeholder instead of propagating.
pub(crate) fn render_message(args: fmt::Arguments<'_>) -> String {
    let mut message = String::new();
    let mut sink = BoundedWriter {
        buf: &mut message,
        cap: MESSAGE_BUFFER_MAX_LEN,
    };
    if sink.write_fmt(args).is_err() {
        message.clear();
        message.push_str(RENDER_FAILURE_PLACEHOLDER);
    }
    message
}

fn truncated_function(function: &str) -> &str {
    if function.len() <= FUNCTION_BUFFER_MAX_LEN {
        return function;
    }
    let mut cut = FUNCTION_BUFFER_MAX_LEN;
    while !function.is_char_boundary(cut) {
        cut -= 1;
    }
    &function[..cut]
}

/// Assembles the full line for one record. `timestamp_micros` is the capture
/// time as microseconds since the Unix epoch; the civil date applies the
/// process-wide UTC offset while the microsecond remainder prints unpadded.
#[allow(clippy::too_many_arguments)]
pub(crate) fn format_record(
    level: LoggerLevel,
    function: &str,
    line: u32,
    message: &str,
    timestamp_micros: u64,
    utc_offset_secs: i64,
    thread_id: u64,
    context_key: &str,
) -> LineBuffer {
    let datetime = civil_datetime(timestamp_micros / 1_000_000, utc_offset_secs);
    let micros = timestamp_micros % 1_000_000;
    let mut buffer = LineBuffer::new();
    // Writes into LineBuffer are infallible; all arguments are plain values.
    let _ = write!(
        buffer,
        "[{datetime}.{micros}][{level}][{message}][{function}:{line}][{thread_id}][{context_key}]{LINE_ENDING}",
        level = level.as_str(),
        function = truncated_function(function),
    );
    buffer
}
