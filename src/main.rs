use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};

use hostlog::config::{self, LoggingConfig};
use hostlog::logging::{self, LogLevel, Logger};

/// Split `level: message`; lines without a known level prefix are Info
fn parse_input_line(line: &str) -> (LogLevel, &str) {
    if let Some((prefix, rest)) = line.split_once(':') {
        if let Ok(level) = prefix.parse::<LogLevel>() {
            return (level, rest.trim_start());
        }
    }
    (LogLevel::Info, line)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Before loading config, so home directory warnings are not lost
    logging::init_tracing()?;

    let config = LoggingConfig::load()?;

    // Ensure config and logs directories exist
    config::ensure_directories(&config)?;

    let logger = Arc::new(Logger::new(&config));
    let console = logger.start_debug_console();

    // Badge updates arrive on their own task, like a UI thread would see them
    let mut alerts = logger.subscribe();
    let badge = tokio::spawn(async move {
        let mut seen = 0usize;
        while let Ok(message) = alerts.recv().await {
            seen += 1;
            tracing::debug!(seen, %message, "Warning/error notification");
        }
        seen
    });

    tracing::info!("Logging to: {}", logger.current_log_file().display());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        if line.trim().is_empty() {
            continue;
        }
        let (level, message) = parse_input_line(&line);
        logger.log(logger.app_name(), level, message);
    }

    for line in console.lines() {
        println!("{}", line.text);
    }
    println!(
        "{} warning(s), {} error(s)",
        logger.warnings(),
        logger.errors()
    );

    // Dropping the last logger closes the notification channel
    drop(console);
    drop(logger);
    let notified = badge.await.context("Notification task failed")?;
    tracing::debug!(notified, "Notification task finished");

    Ok(())
}
