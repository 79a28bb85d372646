use std::fmt;
use std::fs;

use rolling_logger::{
    set_thread_context_key, Logger, LoggerConfig, LoggerLevel, LoggerTarget,
    FUNCTION_BUFFER_MAX_LEN, MESSAGE_BUFFER_MAX_LEN,
};
use tempfile::TempDir;

fn file_config(dir: &TempDir) -> LoggerConfig {
    LoggerConfig {
        target: LoggerTarget::File,
        log_dir_path: dir.path().to_path_buf(),
        file_name: "test.log".to_string(),
        file_size_max: 64 * 1024 * 1024,
        archive_file_name: "test-archive".to_string(),
        archive_count_max: 4,
        buffer_size: 256 * 1024,
    }
}

/// Runs `emit_records` against a fresh file logger and returns the file
/// contents after teardown.
fn capture(emit_records: impl FnOnce(&Logger)) -> String {
    let dir = TempDir::new().unwrap();
    let logger = Logger::new();
    logger.init(&file_config(&dir)).unwrap();
    emit_records(&logger);
    logger.destroy();
    fs::read_to_string(dir.path().join("test.log")).unwrap()
}

fn fields(line: &str) -> Vec<&str> {
    line.strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .expect("line must be bracket-delimited")
        .split("][")
        .collect()
}

#[test]
fn line_has_the_six_fixed_fields() {
    let content = capture(|logger| {
        logger.emit(
            LoggerLevel::Warning,
            "alpha::beta",
            42,
            format_args!("hello {}", "world"),
        );
    });
    let line = content.lines().next().unwrap();
    let parts = fields(line);
    assert_eq!(parts.len(), 6);
    assert_eq!(parts[1], "WARN");
    assert_eq!(parts[2], "hello world");
    assert_eq!(parts[3], "alpha::beta:42");
    parts[4].parse::<u64>().expect("thread id must be numeric");
    assert_eq!(parts[5], "");
}

#[test]
fn datetime_field_is_zero_padded_with_micro_suffix() {
    let content = capture(|logger| {
        logger.emit(LoggerLevel::Info, "f", 1, format_args!("timestamped"));
    });
    let datetime = fields(content.lines().next().unwrap())[0].to_string();
    let (civil, micros) = datetime.split_once('.').expect("date needs a .micros suffix");
    assert_eq!(civil.len(), 19, "civil part must be YYYY-MM-DD HH:MM:SS");
    let bytes = civil.as_bytes();
    assert_eq!(bytes[4], b'-');
    assert_eq!(bytes[7], b'-');
    assert_eq!(bytes[10], b' ');
    assert_eq!(bytes[13], b':');
    assert_eq!(bytes[16], b':');
    let micros: u64 = micros.parse().unwrap();
    assert!(micros < 1_000_000);
}

#[test]
fn level_tags_match_the_fixed_table() {
    let content = capture(|logger| {
        for level in [
            LoggerLevel::Debug,
            LoggerLevel::Info,
            LoggerLevel::Warning,
            LoggerLevel::Error,
            LoggerLevel::Fatal,
        ] {
            logger.emit(level, "f", 1, format_args!("leveled"));
        }
    });
    let tags: Vec<String> = content
        .lines()
        .map(|line| fields(line)[1].to_string())
        .collect();
    assert_eq!(tags, ["DBG", "INFO", "WARN", "ERR", "FATAL"]);
}

#[test]
fn message_is_truncated_at_the_cap() {
    let long = "m".repeat(MESSAGE_BUFFER_MAX_LEN + 1000);
    let content = capture(|logger| {
        logger.emit(LoggerLevel::Info, "f", 1, format_args!("{long}"));
    });
    let message = fields(content.lines().next().unwrap())[2].to_string();
    assert_eq!(message.len(), MESSAGE_BUFFER_MAX_LEN);
    assert!(message.bytes().all(|b| b == b'm'), "truncation must not corrupt");
}

#[test]
fn function_path_is_truncated_at_the_cap() {
    let long_function = "n".repeat(FUNCTION_BUFFER_MAX_LEN + 500);
    let content = capture(|logger| {
        logger.emit(LoggerLevel::Info, &long_function, 7, format_args!("located"));
    });
    let location = fields(content.lines().next().unwrap())[3].to_string();
    let expected = format!("{}:7", "n".repeat(FUNCTION_BUFFER_MAX_LEN));
    assert_eq!(location, expected);
}

struct FailingDisplay;

impl fmt::Display for FailingDisplay {
    fn fmt(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Err(fmt::Error)
    }
}

#[test]
fn failing_display_substitutes_the_placeholder() {
    let content = capture(|logger| {
        logger.emit(
            LoggerLevel::Error,
            "f",
            1,
            format_args!("value: {}", FailingDisplay),
        );
    });
    assert_eq!(fields(content.lines().next().unwrap())[2], "...");
}

#[test]
fn oversized_line_spills_to_heap_uncorrupted() {
    // Message and function caps leave the stack scratch region with spare
    // room; an unbounded context key is what pushes a line past it.
    let huge_key = "k".repeat(8000);
    let content = capture(|logger| {
        set_thread_context_key(&huge_key);
        logger.emit(LoggerLevel::Info, "spill::site", 3, format_args!("spilled"));
        set_thread_context_key("");
    });
    let line = content.lines().next().unwrap();
    let parts = fields(line);
    assert_eq!(parts[2], "spilled");
    assert_eq!(parts[5], huge_key, "spill must preserve the whole line");
}

#[test]
fn multibyte_text_survives_rendering() {
    let content = capture(|logger| {
        logger.emit(
            LoggerLevel::Info,
            "f",
            1,
            format_args!("温度 {}°C über âêî", 25.5),
        );
    });
    assert!(content.contains("温度 25.5°C über âêî"));
}
