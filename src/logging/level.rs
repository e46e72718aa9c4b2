//! Log severity levels
//!
//! A single ordered enum is used both to tag a message and to configure the
//! minimum severity that gets recorded.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Severity of a log message, or the minimum severity to record
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
#[repr(u8)]
pub enum LogLevel {
    /// Log Trace, Info, Warnings and Errors
    Trace = 1,
    /// Log Info, Warnings and Errors
    #[default]
    Info = 2,
    /// Log Warnings and Errors
    Warning = 3,
    /// Log only Errors
    Error = 4,
    /// Log nothing
    Nothing = 100,
}

impl LogLevel {
    /// Get the display name for this level
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "Trace",
            LogLevel::Info => "Info",
            LogLevel::Warning => "Warning",
            LogLevel::Error => "Error",
            LogLevel::Nothing => "Nothing",
        }
    }

    /// Check if this level is a warning or error (counted and notified)
    pub fn is_alert(&self) -> bool {
        matches!(self, LogLevel::Warning | LogLevel::Error)
    }

    /// Raw discriminant, used for atomic storage
    pub(crate) fn to_u8(self) -> u8 {
        self as u8
    }

    /// Inverse of [`LogLevel::to_u8`]. Unknown values disable logging.
    pub(crate) fn from_u8(value: u8) -> Self {
        match value {
            1 => LogLevel::Trace,
            2 => LogLevel::Info,
            3 => LogLevel::Warning,
            4 => LogLevel::Error,
            _ => LogLevel::Nothing,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string does not name a log level
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown log level '{0}' (expected trace, info, warning, error or nothing)")]
pub struct ParseLogLevelError(pub String);

impl FromStr for LogLevel {
    type Err = ParseLogLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "info" => Ok(LogLevel::Info),
            "warning" | "warn" => Ok(LogLevel::Warning),
            "error" => Ok(LogLevel::Error),
            "nothing" | "none" | "off" => Ok(LogLevel::Nothing),
            _ => Err(ParseLogLevelError(s.to_string())),
        }
    }
}

impl TryFrom<String> for LogLevel {
    type Error = ParseLogLevelError;

    fn try_from(value: String) -> Result<Self, ParseLogLevelError> {
        value.parse()
    }
}

impl From<LogLevel> for String {
    fn from(level: LogLevel) -> Self {
        level.as_str().to_ascii_lowercase()
    }
}
