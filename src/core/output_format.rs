//! Output format for console-style sinks
//!
//! - Text: `[timestamp] LEVEL [component] message data=... error=...`
//! - Json: one JSON object per line, same shape as the persisted entry

use super::log_entry::LogEntry;
use super::timestamp::TimestampFormat;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text format (default)
    ///
    /// Example: `[2025-01-08T10:30:45.123Z] WARN [Reactor] Temperature high data={"reactor":3}`
    #[default]
    Text,

    /// Single-line JSON
    Json,
}

impl OutputFormat {
    pub fn format(&self, entry: &LogEntry, timestamp_format: &TimestampFormat) -> String {
        match self {
            OutputFormat::Text => format_text(entry, timestamp_format, entry.level.to_str()),
            OutputFormat::Json => format_json(entry),
        }
    }
}

/// Text line with a caller-rendered level name (plain or colored)
pub(crate) fn format_text(entry: &LogEntry, timestamp_format: &TimestampFormat, level: &str) -> String {
    let mut line = format!(
        "[{}] {} [{}] {}",
        timestamp_format.format(&entry.timestamp),
        level,
        escape_control(&entry.component),
        escape_control(&entry.message)
    );

    if let Some(ref data) = entry.data {
        line.push_str(" data=");
        line.push_str(&data.to_string());
    }

    if let Some(ref error) = entry.error {
        line.push_str(" error=");
        line.push_str(&escape_control(&error.message));
        if let Some(ref trace) = error.trace {
            line.push_str(" trace=");
            line.push_str(&escape_control(trace));
        }
    }

    line
}

fn format_json(entry: &LogEntry) -> String {
    serde_json::to_string(entry).unwrap_or_else(|e| {
        format!(
            "{{\"level\":\"{}\",\"message\":\"unserializable entry: {}\"}}",
            entry.level,
            escape_control(&e.to_string()).replace('"', "'")
        )
    })
}

/// Keep one entry on one line so injected newlines cannot forge entries
fn escape_control(text: &str) -> String {
    text.replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}
