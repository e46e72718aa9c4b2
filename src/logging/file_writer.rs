//! Daily log files
//!
//! One file per calendar day (`yyyy-MM-dd.log`) inside the logs directory.
//! Every entry is appended as a line break followed by the formatted line,
//! with a short bounded retry for files briefly held by another process.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use tracing::warn;

use super::error::LoggingError;
use super::retry::RetryPolicy;

/// Line break written before every entry
#[cfg(windows)]
pub const LINE_ENDING: &str = "\r\n";
/// Line break written before every entry
#[cfg(not(windows))]
pub const LINE_ENDING: &str = "\n";

/// Path of the log file for a given day
pub fn log_file_path(logs_dir: &Path, date: NaiveDate) -> PathBuf {
    logs_dir.join(format!("{}.log", date.format("%Y-%m-%d")))
}

/// Appends raw text to a file
///
/// The file sink goes through this trait so tests can simulate locked files.
pub trait LogAppender: Send + Sync {
    /// Append `text` to the file at `path`, creating it if needed
    fn append(&self, path: &Path, text: &str) -> io::Result<()>;
}

/// Appender writing straight to the filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FsAppender;

impl LogAppender for FsAppender {
    fn append(&self, path: &Path, text: &str) -> io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        file.write_all(text.as_bytes())?;
        file.flush()
    }
}

/// File sink writing one file per day
pub struct DailyLogFile {
    logs_dir: PathBuf,
    appender: Box<dyn LogAppender>,
    retry: RetryPolicy,
}

impl DailyLogFile {
    /// Create a file sink for `logs_dir` using the filesystem and default retry
    pub fn new(logs_dir: impl Into<PathBuf>) -> Self {
        Self {
            logs_dir: logs_dir.into(),
            appender: Box::new(FsAppender),
            retry: RetryPolicy::default(),
        }
    }

    /// Replace the appender
    pub fn with_appender(mut self, appender: Box<dyn LogAppender>) -> Self {
        self.appender = appender;
        self
    }

    /// Replace the retry policy
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Directory holding the daily files
    pub fn logs_dir(&self) -> &Path {
        &self.logs_dir
    }

    /// Whether the logs directory currently exists
    pub fn is_available(&self) -> bool {
        self.logs_dir.is_dir()
    }

    /// Path of the file that a write at `now` goes to
    pub fn path_for(&self, now: NaiveDateTime) -> PathBuf {
        log_file_path(&self.logs_dir, now.date())
    }

    /// Append a formatted line to the file for `now`
    ///
    /// Returns the path written to.
    pub fn append_line(&self, now: NaiveDateTime, line: &str) -> Result<PathBuf, LoggingError> {
        let path = self.path_for(now);
        let text = format!("{}{}", LINE_ENDING, line);

        match self.retry.run(|| self.appender.append(&path, &text)) {
            Ok(()) => Ok(path),
            Err(source) => {
                warn!(path = %path.display(), error = %source, "Failed to append to log file");
                Err(LoggingError::FileAppend {
                    path,
                    attempts: self.retry.effective_attempts(),
                    source,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tempfile::TempDir;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Fails the first `failures` appends, then writes to disk
    struct FlakyAppender {
        failures: usize,
        calls: Arc<AtomicUsize>,
    }

    impl LogAppender for FlakyAppender {
        fn append(&self, path: &Path, text: &str) -> io::Result<()> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                return Err(io::Error::new(io::ErrorKind::Other, "file is locked"));
            }
            FsAppender.append(path, text)
        }
    }

    #[test]
    fn test_log_file_path() {
        let path = log_file_path(Path::new("/tmp/host/logs"), day(2026, 1, 5));
        assert_eq!(path, PathBuf::from("/tmp/host/logs/2026-01-05.log"));
    }

    #[test]
    fn test_append_prefixes_line_break() {
        let temp_dir = TempDir::new().unwrap();
        let sink = DailyLogFile::new(temp_dir.path());
        let now = day(2026, 10, 19).and_hms_opt(8, 0, 0).unwrap();

        let path = sink.append_line(now, "first").unwrap();
        sink.append_line(now, "second").unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, format!("{0}first{0}second", LINE_ENDING));
    }

    #[test]
    fn test_append_utf8() {
        let temp_dir = TempDir::new().unwrap();
        let sink = DailyLogFile::new(temp_dir.path());
        let now = day(2026, 10, 19).and_hms_opt(8, 0, 0).unwrap();

        let path = sink.append_line(now, "Grüße ✓").unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert!(String::from_utf8(bytes).unwrap().ends_with("Grüße ✓"));
    }

    #[test]
    fn test_retry_absorbs_transient_failure() {
        let temp_dir = TempDir::new().unwrap();
        let calls = Arc::new(AtomicUsize::new(0));
        let sink = DailyLogFile::new(temp_dir.path())
            .with_retry(RetryPolicy::new(3, Duration::ZERO))
            .with_appender(Box::new(FlakyAppender {
                failures: 2,
                calls: Arc::clone(&calls),
            }));
        let now = day(2026, 10, 19).and_hms_opt(8, 0, 0).unwrap();

        assert!(sink.append_line(now, "eventually").is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_retry_exhausted_reports_error() {
        let temp_dir = TempDir::new().unwrap();
        let calls = Arc::new(AtomicUsize::new(0));
        let sink = DailyLogFile::new(temp_dir.path())
            .with_retry(RetryPolicy::new(3, Duration::ZERO))
            .with_appender(Box::new(FlakyAppender {
                failures: usize::MAX,
                calls: Arc::clone(&calls),
            }));
        let now = day(2026, 10, 19).and_hms_opt(8, 0, 0).unwrap();

        let err = sink.append_line(now, "lost").unwrap_err();
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        match err {
            LoggingError::FileAppend { attempts, path, .. } => {
                assert_eq!(attempts, 3);
                assert!(path.ends_with("2026-10-19.log"));
            }
        }
    }

    #[test]
    fn test_is_available() {
        let temp_dir = TempDir::new().unwrap();
        assert!(DailyLogFile::new(temp_dir.path()).is_available());
        assert!(!DailyLogFile::new(temp_dir.path().join("missing")).is_available());
    }
}
