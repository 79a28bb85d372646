//! Retiring the live log file into a timestamped archive.
//!
//! Triggered synchronously by the consumer once a write pushes the live
//! file past the configured size threshold: close, rename to a uniquely
//! suffixed temporary path, reopen the canonical path so ingestion resumes,
//! pack the temporary into a fresh `.tar.gz` holding one entry named after
//! the log file, then delete the temporary. Every step is independently
//! fallible; failures are diagnosed through the emergency path and never
//! crash the consumer loop.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use flate2::write::GzEncoder;
use flate2::Compression;
use lazy_static::lazy_static;

use crate::config::{LoggerConfig, ARCHIVE_FILE_EXTENSION};
use crate::logger::emergency_log;

lazy_static! {
    /// Process-start reference for uniqueness tokens. Tokens are strictly
    /// increasing within a process, which guards temp-path collisions when
    /// a prior rotation's cleanup failed.
    static ref TOKEN_EPOCH: Instant = Instant::now();
}

/// Nanoseconds of monotonic clock since first use.
pub(crate) fn monotonic_token() -> u128 {
    TOKEN_EPOCH.elapsed().as_nanos()
}

/// Canonical path of the live log file: `{dir}/{fileName}`.
pub(crate) fn current_log_file_path(config: &LoggerConfig) -> PathBuf {
    config.log_dir_path.join(&config.file_name)
}

/// `{dir}/{fileName}.{token}.tmp`
fn temp_log_file_path(config: &LoggerConfig) -> PathBuf {
    config
        .log_dir_path
        .join(format!("{}.{}.tmp", config.file_name, monotonic_token()))
}

/// `{dir}/{archiveBaseName}.{token}.tar.gz`
fn archive_file_path(config: &LoggerConfig) -> PathBuf {
    config.log_dir_path.join(format!(
        "{}.{}.{}",
        config.archive_file_name,
        monotonic_token(),
        ARCHIVE_FILE_EXTENSION
    ))
}

/// Opens the canonical path for append, creating it if necessary.
pub(crate) fn open_log_file(config: &LoggerConfig) -> io::Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(current_log_file_path(config))
}

/// Runs one full rotation. The caller must have dropped its handle to the
/// live file already.
///
/// Returns the reopened live file, or the reopen error; either way the
/// archive step still runs for a successfully renamed temporary. On a
/// rename failure the archive step is skipped and the canonical file keeps
/// accumulating. A packaging failure leaves the temporary in place for
/// manual recovery; a deletion failure after packaging is diagnosed but
/// otherwise ignored.
pub(crate) fn rotate(config: &LoggerConfig) -> io::Result<File> {
    let current = current_log_file_path(config);
    let temp = temp_log_file_path(config);
    let renamed = match fs::rename(&current, &temp) {
        Ok(()) => true,
        Err(err) => {
            emergency_log(format_args!(
                "failed to rename {} to {}: {err}",
                current.display(),
                temp.display()
            ));
            false
        }
    };

    // Reopen before archiving so ingestion resumes without waiting on
    // compression I/O.
    let reopened = open_log_file(config);

    if renamed {
        let archive = archive_file_path(config);
        match pack_archive(&temp, &archive, &config.file_name) {
            Ok(()) => {
                if let Err(err) = fs::remove_file(&temp) {
                    emergency_log(format_args!(
                        "failed to remove temp file {}: {err}",
                        temp.display()
                    ));
                }
            }
            Err(err) => {
                emergency_log(format_args!(
                    "failed to pack {} into {}: {err}",
                    temp.display(),
                    archive.display()
                ));
            }
        }
    }

    reopened
}

/// Packs `source` into a fresh gzipped tar at `archive_path` as a single
/// entry named `entry_name`.
fn pack_archive(source: &Path, archive_path: &Path, entry_name: &str) -> io::Result<()> {
    let archive = File::create(archive_path)?;
    let encoder = GzEncoder::new(archive, Compression::default());
    let mut builder = tar::Builder::new(encoder);
    builder.append_path_with_name(source, entry_name)?;
    let encoder = builder.into_inner()?;
    encoder.finish()?;
    Ok(())
}
