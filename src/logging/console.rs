//! Interactive debug console sink
//!
//! Provides the [`ConsoleSink`] seam a UI widget implements, the default
//! in-memory [`DebugConsole`], and the slot that keeps at most one console
//! alive at a time.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use ratatui::style::Color;

use super::level::LogLevel;

/// Orange used for warning lines
pub const ORANGE: Color = Color::Rgb(255, 165, 0);

/// Default number of lines a debug console keeps
pub const DEFAULT_CONSOLE_CAPACITY: usize = 5_000;

/// Display color for a line of the given level
pub fn level_color(level: LogLevel) -> Color {
    match level {
        LogLevel::Info => Color::Cyan,
        LogLevel::Warning => ORANGE,
        LogLevel::Error => Color::Red,
        _ => Color::White,
    }
}

/// Destination for formatted lines shown to the user
pub trait ConsoleSink: Send + Sync {
    /// Whether the console is alive and shown. Lines are only sent when true.
    fn is_visible(&self) -> bool;

    /// Add a formatted line
    fn append_line(&self, line: &str, sender: &str, color: Color);

    /// Dispose of the console. It must not show anything afterwards.
    fn close(&self);
}

/// A line held by the debug console
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleLine {
    /// Fully formatted log line
    pub text: String,
    /// Sender the line is attributed to
    pub sender: String,
    /// Display color
    pub color: Color,
}

/// In-memory debug console backed by a bounded ring buffer
pub struct DebugConsole {
    lines: RwLock<VecDeque<ConsoleLine>>,
    max_lines: usize,
    visible: AtomicBool,
    disposed: AtomicBool,
}

impl DebugConsole {
    /// Create a hidden console keeping at most `max_lines` lines
    pub fn new(max_lines: usize) -> Self {
        let max_lines = max_lines.max(1);
        Self {
            lines: RwLock::new(VecDeque::with_capacity(max_lines.min(1024))),
            max_lines,
            visible: AtomicBool::new(false),
            disposed: AtomicBool::new(false),
        }
    }

    /// Show the console
    pub fn show(&self) {
        self.visible.store(true, Ordering::SeqCst);
    }

    /// Hide the console without disposing it
    pub fn hide(&self) {
        self.visible.store(false, Ordering::SeqCst);
    }

    /// Whether [`ConsoleSink::close`] has been called
    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }

    /// All lines, oldest first
    pub fn lines(&self) -> Vec<ConsoleLine> {
        self.lines
            .read()
            .map(|l| l.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Lines attributed to one sender, oldest first
    pub fn lines_from(&self, sender: &str) -> Vec<ConsoleLine> {
        self.lines
            .read()
            .map(|l| l.iter().filter(|line| line.sender == sender).cloned().collect())
            .unwrap_or_default()
    }

    /// Number of lines held
    pub fn len(&self) -> usize {
        self.lines.read().map(|l| l.len()).unwrap_or(0)
    }

    /// Check if the console is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for DebugConsole {
    fn default() -> Self {
        Self::new(DEFAULT_CONSOLE_CAPACITY)
    }
}

impl ConsoleSink for DebugConsole {
    fn is_visible(&self) -> bool {
        !self.is_disposed() && self.visible.load(Ordering::SeqCst)
    }

    fn append_line(&self, line: &str, sender: &str, color: Color) {
        // Closed concurrently after the visibility check
        if self.is_disposed() {
            return;
        }
        if let Ok(mut lines) = self.lines.write() {
            if lines.len() >= self.max_lines {
                lines.pop_front();
            }
            lines.push_back(ConsoleLine {
                text: line.to_string(),
                sender: sender.to_string(),
                color,
            });
        }
    }

    fn close(&self) {
        self.visible.store(false, Ordering::SeqCst);
        self.disposed.store(true, Ordering::SeqCst);
    }
}

/// Holds the single live console, if any
#[derive(Default)]
pub struct ConsoleSlot {
    current: Mutex<Option<Arc<dyn ConsoleSink>>>,
}

impl ConsoleSlot {
    /// Create an empty slot
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `console`, closing the previous one. Returns true if one was replaced.
    pub fn replace(&self, console: Arc<dyn ConsoleSink>) -> bool {
        let previous = match self.current.lock() {
            Ok(mut current) => current.replace(console),
            Err(_) => return false,
        };
        match previous {
            Some(old) => {
                old.close();
                true
            }
            None => false,
        }
    }

    /// Close and remove the current console
    pub fn close(&self) {
        let previous = self.current.lock().ok().and_then(|mut c| c.take());
        if let Some(old) = previous {
            old.close();
        }
    }

    /// The current console, if it is visible
    pub fn visible(&self) -> Option<Arc<dyn ConsoleSink>> {
        let current = self.current.lock().ok()?.clone()?;
        current.is_visible().then_some(current)
    }
}
