//! Real-time log streaming via Server-Sent Events (SSE).
//!
//! Import runs are driven from a browser, so pipeline progress is published
//! on a broadcast channel that `GET /api/logs` streams to connected clients.
//! Every entry is mirrored to stdout as well.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Log level for client display.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A single log entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
}

impl LogEntry {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self { level, message: message.into() }
    }
}

/// Global log broadcaster.
pub static LOG_BROADCASTER: Lazy<LogBroadcaster> = Lazy::new(LogBroadcaster::new);

/// Broadcasts log entries to all connected SSE clients.
pub struct LogBroadcaster {
    sender: broadcast::Sender<LogEntry>,
}

impl LogBroadcaster {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(100);
        Self { sender }
    }

    /// Send an entry to all subscribers, mirroring it to stdout.
    pub fn log(&self, entry: LogEntry) {
        let prefix = match entry.level {
            LogLevel::Info => " ",
            LogLevel::Success => "✓",
            LogLevel::Warning => "⚠",
            LogLevel::Error => "✗",
        };
        println!(" {} {}", prefix, entry.message);

        // No receivers is fine; entries are fire-and-forget.
        let _ = self.sender.send(entry);
    }

    /// Get a receiver for SSE streaming.
    pub fn subscribe(&self) -> broadcast::Receiver<LogEntry> {
        self.sender.subscribe()
    }
}

impl Default for LogBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

pub fn log_info(message: impl Into<String>) {
    LOG_BROADCASTER.log(LogEntry::new(LogLevel::Info, message));
}

pub fn log_success(message: impl Into<String>) {
    LOG_BROADCASTER.log(LogEntry::new(LogLevel::Success, message));
}

pub fn log_warning(message: impl Into<String>) {
    LOG_BROADCASTER.log(LogEntry::new(LogLevel::Warning, message));
}

pub fn log_error(message: impl Into<String>) {
    LOG_BROADCASTER.log(LogEntry::new(LogLevel::Error, message));
}
