//! Errors raised by the log sinks
//!
//! These never reach callers of the logging entry points; the dispatcher
//! turns them into a self-reported error line instead.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while writing to a sink
#[derive(Debug, Error)]
pub enum LoggingError {
    /// Appending to the daily log file failed on every attempt
    #[error("{} ({} after {attempts} attempt(s))", friendly_io_error_message(.source), .path.display())]
    FileAppend {
        path: PathBuf,
        attempts: u32,
        #[source]
        source: io::Error,
    },
}

/// Categories of disk errors for user-friendly messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiskErrorKind {
    /// Disk is full or quota exceeded
    DiskFull,
    /// Permission denied, or the file is held by another process
    PermissionDenied,
    /// File or directory not found
    NotFound,
    /// Other IO error
    Other,
}

impl DiskErrorKind {
    /// Get a user-friendly message for this error kind
    pub fn user_message(&self) -> &'static str {
        match self {
            DiskErrorKind::DiskFull => "disk full",
            DiskErrorKind::PermissionDenied => "permission denied or file in use",
            DiskErrorKind::NotFound => "file or directory not found",
            DiskErrorKind::Other => "write failed",
        }
    }
}

/// Categorize an IO error into a user-friendly category
pub fn categorize_io_error(e: &io::Error) -> DiskErrorKind {
    use std::io::ErrorKind;

    match e.kind() {
        ErrorKind::StorageFull | ErrorKind::WriteZero => DiskErrorKind::DiskFull,
        ErrorKind::PermissionDenied => DiskErrorKind::PermissionDenied,
        ErrorKind::NotFound => DiskErrorKind::NotFound,
        _ => {
            #[cfg(unix)]
            {
                // ENOSPC = 28, EDQUOT = 122 (Linux) / 69 (macOS)
                if let Some(os_error) = e.raw_os_error() {
                    if os_error == 28 || os_error == 122 || os_error == 69 {
                        return DiskErrorKind::DiskFull;
                    }
                }
            }
            #[cfg(windows)]
            {
                // ERROR_SHARING_VIOLATION = 32, ERROR_LOCK_VIOLATION = 33
                if let Some(os_error) = e.raw_os_error() {
                    if os_error == 32 || os_error == 33 {
                        return DiskErrorKind::PermissionDenied;
                    }
                }
            }
            DiskErrorKind::Other
        }
    }
}

/// Render an IO error as a short message, keeping the OS text for unknown kinds
pub fn friendly_io_error_message(e: &io::Error) -> String {
    match categorize_io_error(e) {
        DiskErrorKind::Other => e.to_string(),
        kind => kind.user_message().to_string(),
    }
}
