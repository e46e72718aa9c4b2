//! hostlog - logging facility for a desktop plugin host
//!
//! Records leveled messages from the host and its plugins to a debug console
//! and to daily log files, and keeps warning/error counters for the UI.

pub mod config;
pub mod logging;
