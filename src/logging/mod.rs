//! Logging facility for the plugin host
//!
//! Leveled messages go to an optional debug console and to one log file per
//! day. Warnings and errors are counted and broadcast for UI badges.

mod clock;
mod console;
mod error;
mod file_writer;
mod level;
mod logger;
mod notify;
mod record;
mod retry;

pub use clock::{Clock, SystemClock};
pub use console::{
    level_color, ConsoleLine, ConsoleSink, ConsoleSlot, DebugConsole, DEFAULT_CONSOLE_CAPACITY,
    ORANGE,
};
pub use error::{categorize_io_error, friendly_io_error_message, DiskErrorKind, LoggingError};
pub use file_writer::{log_file_path, DailyLogFile, FsAppender, LogAppender, LINE_ENDING};
pub use level::{LogLevel, ParseLogLevelError};
pub use logger::{short_type_name, Logger, PluginHandle, NULL_PLUGIN_MESSAGE};
pub use notify::{AlertReceiver, Notifier, DEFAULT_CHANNEL_BUFFER};
pub use record::{LogRecord, TIME_FORMAT};
pub use retry::{RetryPolicy, DEFAULT_RETRY_ATTEMPTS, DEFAULT_RETRY_DELAY};

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Target that dev-mode lines are mirrored to
pub const DEBUG_OUTPUT_TARGET: &str = "hostlog::debug_output";

/// Filter used when `RUST_LOG` is not set
///
/// Dev-mode mirroring is emitted at DEBUG, so its target is enabled explicitly.
pub const DEFAULT_TRACING_FILTER: &str = "hostlog=info,hostlog::debug_output=debug";

/// Install the process diagnostics subscriber (stderr, filtered by `RUST_LOG`)
///
/// Dev-mode lines are mirrored here under [`DEBUG_OUTPUT_TARGET`].
/// Returns an error if a global subscriber is already set.
pub fn init_tracing() -> anyhow::Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_TRACING_FILTER.into());

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
