//! A single log record and its line format

use chrono::NaiveDateTime;

use super::level::LogLevel;

/// Time format used at the start of every line
pub const TIME_FORMAT: &str = "%H:%M:%S";

/// A log message at the moment it is written
#[derive(Debug, Clone, Copy)]
pub struct LogRecord<'a> {
    /// When the message was logged
    pub timestamp: NaiveDateTime,
    /// Application or plugin name the line is attributed to
    pub sender: &'a str,
    /// Severity
    pub level: LogLevel,
    /// Message text
    pub message: &'a str,
}

impl<'a> LogRecord<'a> {
    /// Create a new record
    pub fn new(
        timestamp: NaiveDateTime,
        sender: &'a str,
        level: LogLevel,
        message: &'a str,
    ) -> Self {
        Self {
            timestamp,
            sender,
            level,
            message,
        }
    }

    /// Format as `HH:MM:SS [sender] [Level] >> message`
    pub fn format_line(&self) -> String {
        format!(
            "{} [{}] [{}] >> {}",
            self.timestamp.format(TIME_FORMAT),
            self.sender,
            self.level,
            self.message
        )
    }
}
