//! The logging context
//!
//! [`Logger`] owns the level filter, the warning/error counters, the
//! notifier and both sinks. Every entry point funnels into one dispatcher:
//!
//! 1. warnings and errors are counted and notified, unconditionally;
//! 2. messages below the minimum level stop here unless dev mode is on;
//! 3. the formatted line goes to the visible console and the daily file.
//!
//! Logging never fails from the caller's point of view. A file append that
//! keeps failing is reported as one extra error line that skips the file sink.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;

use tracing::debug;

use crate::config::LoggingConfig;

use super::clock::{Clock, SystemClock};
use super::console::{level_color, ConsoleSink, ConsoleSlot, DebugConsole};
use super::file_writer::{DailyLogFile, LogAppender};
use super::level::LogLevel;
use super::notify::{AlertReceiver, Notifier};
use super::record::LogRecord;
use super::DEBUG_OUTPUT_TARGET;

/// Error text logged when a plugin-scoped call gets no plugin
pub const NULL_PLUGIN_MESSAGE: &str = "Plugin logging failed: plugin instance was null";

/// Resolves the display name of a plugin
pub trait PluginHandle {
    /// Name shown as the sender of the plugin's log lines
    fn name(&self) -> &str;
}

impl PluginHandle for str {
    fn name(&self) -> &str {
        self
    }
}

impl PluginHandle for String {
    fn name(&self) -> &str {
        self.as_str()
    }
}

/// Last path segment of a type's name, without generic arguments
///
/// Meant for plain nominal types (`Foo`, `a::b::Foo<T>`). Tuples, references
/// and other structural types give unhelpful prefixes.
pub fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

fn type_scoped<T: ?Sized>(message: &str) -> String {
    format!("{}: {}", short_type_name::<T>(), message)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileRoute {
    Write,
    Skip,
}

/// Process-wide logging context
pub struct Logger {
    app_name: String,
    min_level: AtomicU8,
    file_logging: AtomicBool,
    dev_mode: AtomicBool,
    warnings: AtomicU64,
    errors: AtomicU64,
    notifier: Notifier,
    console: ConsoleSlot,
    console_capacity: usize,
    file: DailyLogFile,
    clock: Arc<dyn Clock>,
}

impl Logger {
    /// Create a logger from configuration, using the system clock and filesystem
    pub fn new(config: &LoggingConfig) -> Self {
        Self {
            app_name: config.app_name.clone(),
            min_level: AtomicU8::new(config.min_level.to_u8()),
            file_logging: AtomicBool::new(config.file_logging),
            dev_mode: AtomicBool::new(config.dev_mode),
            warnings: AtomicU64::new(0),
            errors: AtomicU64::new(0),
            notifier: Notifier::default(),
            console: ConsoleSlot::new(),
            console_capacity: config.console_capacity,
            file: DailyLogFile::new(config.logs_dir.clone()).with_retry(config.retry_policy()),
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the clock
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the file appender
    pub fn with_appender(mut self, appender: Box<dyn LogAppender>) -> Self {
        self.file = self.file.with_appender(appender);
        self
    }

    // === Configuration ===

    /// Sender name used for host messages
    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// Current minimum level
    pub fn level(&self) -> LogLevel {
        LogLevel::from_u8(self.min_level.load(Ordering::SeqCst))
    }

    /// Change the minimum level and log the change
    pub fn set_level(&self, level: LogLevel) {
        self.min_level.store(level.to_u8(), Ordering::SeqCst);
        self.info(&format!("Set log level to {}", level));
    }

    /// Whether lines are appended to the daily file
    pub fn file_logging_enabled(&self) -> bool {
        self.file_logging.load(Ordering::SeqCst)
    }

    /// Enable or disable file logging
    pub fn set_file_logging(&self, enabled: bool) {
        self.file_logging.store(enabled, Ordering::SeqCst);
    }

    /// Whether dev mode (filter bypass and debug output mirroring) is on
    pub fn dev_mode(&self) -> bool {
        self.dev_mode.load(Ordering::SeqCst)
    }

    /// Turn dev mode on or off
    pub fn set_dev_mode(&self, enabled: bool) {
        self.dev_mode.store(enabled, Ordering::SeqCst);
    }

    /// Directory holding the daily log files
    pub fn logs_dir(&self) -> &Path {
        self.file.logs_dir()
    }

    /// Path of the file a write right now would go to
    pub fn current_log_file(&self) -> PathBuf {
        self.file.path_for(self.clock.now())
    }

    // === Counters and notification ===

    /// Number of warnings logged since the logger was created
    pub fn warnings(&self) -> u64 {
        self.warnings.load(Ordering::SeqCst)
    }

    /// Number of errors logged since the logger was created
    pub fn errors(&self) -> u64 {
        self.errors.load(Ordering::SeqCst)
    }

    /// Register a callback fired synchronously for every warning/error
    pub fn on_warning_or_error<F>(&self, observer: F)
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.notifier.add_observer(observer);
    }

    /// Subscribe to warning/error messages
    pub fn subscribe(&self) -> AlertReceiver {
        self.notifier.subscribe()
    }

    // === Debug console ===

    /// Close any existing console, then create, show and return a new one
    pub fn start_debug_console(&self) -> Arc<DebugConsole> {
        let console = Arc::new(DebugConsole::new(self.console_capacity));
        console.show();
        self.attach_console(console.clone());
        console
    }

    /// Install an externally implemented console, closing the existing one
    pub fn attach_console(&self, console: Arc<dyn ConsoleSink>) {
        if self.console.replace(console) {
            debug!("Replaced debug console");
        }
    }

    /// Close the current console, if any
    pub fn close_debug_console(&self) {
        self.console.close();
    }

    // === Dispatcher ===

    /// Log `message` at `level`, attributed to `sender`
    pub fn log(&self, sender: &str, level: LogLevel, message: &str) {
        self.dispatch(sender, level, message, FileRoute::Write);
    }

    fn dispatch(&self, sender: &str, level: LogLevel, message: &str, route: FileRoute) {
        if level == LogLevel::Nothing {
            return;
        }
        if level.is_alert() {
            let counter = if level == LogLevel::Warning {
                &self.warnings
            } else {
                &self.errors
            };
            counter.fetch_add(1, Ordering::SeqCst);
            self.notifier.notify(message);
        }

        let dev_mode = self.dev_mode();
        if level < self.level() && !dev_mode {
            return;
        }

        let now = self.clock.now();
        let line = LogRecord::new(now, sender, level, message).format_line();

        if dev_mode {
            debug!(target: DEBUG_OUTPUT_TARGET, "{}", line);
        }

        if let Some(console) = self.console.visible() {
            console.append_line(&line, sender, level_color(level));
        }

        if route == FileRoute::Write && self.file_logging_enabled() && self.file.is_available() {
            if let Err(e) = self.file.append_line(now, &line) {
                self.dispatch(
                    sender,
                    LogLevel::Error,
                    &format!("File logging failed: {}", e),
                    FileRoute::Skip,
                );
            }
        }
    }

    // === Host messages ===

    /// Debug trace messages for internal debugging
    pub fn trace(&self, message: &str) {
        self.log(&self.app_name, LogLevel::Trace, message);
    }

    /// Information that could be useful
    pub fn info(&self, message: &str) {
        self.log(&self.app_name, LogLevel::Info, message);
    }

    /// Something went wrong
    pub fn warning(&self, message: &str) {
        self.log(&self.app_name, LogLevel::Warning, message);
    }

    /// Something went really wrong
    pub fn error(&self, message: &str) {
        self.log(&self.app_name, LogLevel::Error, message);
    }

    /// [`Logger::trace`] prefixed with the name of `T`
    pub fn trace_in<T: ?Sized>(&self, message: &str) {
        self.trace(&type_scoped::<T>(message));
    }

    /// [`Logger::info`] prefixed with the name of `T`
    pub fn info_in<T: ?Sized>(&self, message: &str) {
        self.info(&type_scoped::<T>(message));
    }

    /// [`Logger::warning`] prefixed with the name of `T`
    pub fn warning_in<T: ?Sized>(&self, message: &str) {
        self.warning(&type_scoped::<T>(message));
    }

    /// [`Logger::error`] prefixed with the name of `T`
    pub fn error_in<T: ?Sized>(&self, message: &str) {
        self.error(&type_scoped::<T>(message));
    }

    // === Plugin messages ===

    /// Log on behalf of a plugin
    ///
    /// Without a plugin the message is dropped and an error is logged instead.
    pub fn plugin_log<P>(&self, plugin: Option<&P>, level: LogLevel, message: &str)
    where
        P: PluginHandle + ?Sized,
    {
        match plugin {
            Some(plugin) => self.log(plugin.name(), level, message),
            None => self.log(&self.app_name, LogLevel::Error, NULL_PLUGIN_MESSAGE),
        }
    }

    /// [`Logger::plugin_log`] with the message prefixed by the name of `T`
    pub fn plugin_log_in<T, P>(&self, plugin: Option<&P>, level: LogLevel, message: &str)
    where
        T: ?Sized,
        P: PluginHandle + ?Sized,
    {
        self.plugin_log(plugin, level, &type_scoped::<T>(message));
    }

    /// Trace message on behalf of a plugin
    pub fn plugin_trace<P: PluginHandle + ?Sized>(&self, plugin: Option<&P>, message: &str) {
        self.plugin_log(plugin, LogLevel::Trace, message);
    }

    /// Info message on behalf of a plugin
    pub fn plugin_info<P: PluginHandle + ?Sized>(&self, plugin: Option<&P>, message: &str) {
        self.plugin_log(plugin, LogLevel::Info, message);
    }

    /// Warning on behalf of a plugin
    pub fn plugin_warning<P: PluginHandle + ?Sized>(&self, plugin: Option<&P>, message: &str) {
        self.plugin_log(plugin, LogLevel::Warning, message);
    }

    /// Error on behalf of a plugin
    pub fn plugin_error<P: PluginHandle + ?Sized>(&self, plugin: Option<&P>, message: &str) {
        self.plugin_log(plugin, LogLevel::Error, message);
    }
}
