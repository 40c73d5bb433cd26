//! Pipeline logging.
//!
//! Log entries are printed to the console and broadcast on a channel.
//! The `run` command subscribes before the batch starts and drains the
//! channel afterwards into a [`ProblemSummary`], which it prints as a
//! recap of every warning and error once the progress lines have
//! scrolled by.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast::{self, error::TryRecvError};

/// Log level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A single log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    /// Log level
    pub level: LogLevel,
    /// Log message
    pub message: String,
    /// Optional indentation level (for nested logs)
    #[serde(default)]
    pub indent: u8,
}

impl LogEntry {
    pub fn info(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Info, message: message.into(), indent: 0 }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Success, message: message.into(), indent: 0 }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Warning, message: message.into(), indent: 0 }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: LogLevel::Error, message: message.into(), indent: 0 }
    }

    pub fn with_indent(mut self, indent: u8) -> Self {
        self.indent = indent;
        self
    }

    /// Console rendering of the entry.
    pub fn render(&self) -> String {
        let prefix = match self.level {
            LogLevel::Info => "   ",
            LogLevel::Success => "✅",
            LogLevel::Warning => "⚠️ ",
            LogLevel::Error => "❌",
        };
        let indent = "   ".repeat(self.indent as usize);
        format!("{}{} {}", indent, prefix, self.message)
    }
}

/// Global log broadcaster
pub static LOG_BROADCASTER: Lazy<LogBroadcaster> = Lazy::new(LogBroadcaster::new);

/// Prints log entries and fans them out to subscribers
pub struct LogBroadcaster {
    sender: broadcast::Sender<LogEntry>,
}

impl LogBroadcaster {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(256);
        Self { sender }
    }

    /// Print an entry and send it to all subscribers
    pub fn log(&self, entry: LogEntry) {
        match entry.level {
            LogLevel::Error => eprintln!("{}", entry.render()),
            _ => println!("{}", entry.render()),
        }

        // No subscribers is fine
        let _ = self.sender.send(entry);
    }

    /// Get a receiver for log entries sent from now on
    pub fn subscribe(&self) -> broadcast::Receiver<LogEntry> {
        self.sender.subscribe()
    }
}

impl Default for LogBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

/// Warnings and errors collected from a subscription.
#[derive(Debug, Default)]
pub struct ProblemSummary {
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
    /// Entries lost because the subscriber fell behind the channel.
    pub missed: u64,
}

impl ProblemSummary {
    /// Take every entry currently queued on `rx`.
    pub fn drain(rx: &mut broadcast::Receiver<LogEntry>) -> Self {
        let mut summary = Self::default();
        loop {
            match rx.try_recv() {
                Ok(entry) => match entry.level {
                    LogLevel::Warning => summary.warnings.push(entry.message),
                    LogLevel::Error => summary.errors.push(entry.message),
                    LogLevel::Info | LogLevel::Success => {}
                },
                Err(TryRecvError::Lagged(n)) => summary.missed += n,
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }
        summary
    }

    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty() && self.errors.is_empty()
    }

    /// Console recap, one line per problem.
    pub fn render(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if self.is_clean() {
            return lines;
        }
        lines.push(format!(
            "📋 {} warning(s), {} error(s)",
            self.warnings.len(),
            self.errors.len()
        ));
        for warning in &self.warnings {
            lines.push(LogEntry::warning(warning.as_str()).with_indent(1).render());
        }
        for error in &self.errors {
            lines.push(LogEntry::error(error.as_str()).with_indent(1).render());
        }
        if self.missed > 0 {
            lines.push(format!("   ({} earlier entries not captured)", self.missed));
        }
        lines
    }
}

/// Convenient logging functions
pub fn log_info(msg: impl Into<String>) {
    LOG_BROADCASTER.log(LogEntry::info(msg));
}

pub fn log_success(msg: impl Into<String>) {
    LOG_BROADCASTER.log(LogEntry::success(msg));
}

pub fn log_warning(msg: impl Into<String>) {
    LOG_BROADCASTER.log(LogEntry::warning(msg));
}

pub fn log_error(msg: impl Into<String>) {
    LOG_BROADCASTER.log(LogEntry::error(msg));
}

pub fn log_info_indent(msg: impl Into<String>, indent: u8) {
    LOG_BROADCASTER.log(LogEntry::info(msg).with_indent(indent));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_prefix_and_indent() {
        let entry = LogEntry::success("Saved: out.xlsx").with_indent(1);
        assert_eq!(entry.render(), "   ✅ Saved: out.xlsx");

        let entry = LogEntry::error("boom");
        assert!(entry.render().starts_with("❌"));
    }

    #[test]
    fn test_subscriber_receives_entries() {
        let broadcaster = LogBroadcaster::new();
        let mut rx = broadcaster.subscribe();

        broadcaster.log(LogEntry::warning("careful"));

        let entry = rx.try_recv().unwrap();
        assert_eq!(entry.level, LogLevel::Warning);
        assert_eq!(entry.message, "careful");
    }

    #[test]
    fn test_problem_summary_keeps_warnings_and_errors() {
        let broadcaster = LogBroadcaster::new();
        let mut rx = broadcaster.subscribe();

        broadcaster.log(LogEntry::info("📄 [1] Processing a.csv"));
        broadcaster.log(LogEntry::error("Error processing a.csv: CSV file is empty"));
        broadcaster.log(LogEntry::success("Saved: b_output.xlsx"));
        broadcaster.log(LogEntry::warning("skipped entry"));

        let summary = ProblemSummary::drain(&mut rx);
        assert_eq!(summary.warnings, vec!["skipped entry"]);
        assert_eq!(summary.errors, vec!["Error processing a.csv: CSV file is empty"]);
        assert_eq!(summary.missed, 0);

        let lines = summary.render();
        assert_eq!(lines[0], "📋 1 warning(s), 1 error(s)");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_problem_summary_counts_lagged_entries() {
        let broadcaster = LogBroadcaster::new();
        let mut rx = broadcaster.subscribe();

        for i in 0..300 {
            broadcaster.log(LogEntry::info(format!("entry {}", i)));
        }
        broadcaster.log(LogEntry::warning("late"));

        let summary = ProblemSummary::drain(&mut rx);
        assert!(summary.missed > 0);
        assert_eq!(summary.warnings, vec!["late"]);
    }

    #[test]
    fn test_clean_summary_renders_nothing() {
        let broadcaster = LogBroadcaster::new();
        let mut rx = broadcaster.subscribe();
        broadcaster.log(LogEntry::success("Saved"));

        let summary = ProblemSummary::drain(&mut rx);
        assert!(summary.is_clean());
        assert!(summary.render().is_empty());
    }

    #[test]
    fn test_entry_serialization() {
        let json = serde_json::to_value(LogEntry::info("hello")).unwrap();
        assert_eq!(json["level"], "info");
        assert_eq!(json["message"], "hello");
        assert_eq!(json["indent"], 0);
    }
}
