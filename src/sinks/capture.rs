//! In-memory console sink

use crate::core::{LogEntry, LogLevel, OutputFormat, Result, Sink, TimestampFormat};
use parking_lot::Mutex;
use std::sync::Arc;

/// One line written by a [`CaptureSink`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedLine {
    pub level: LogLevel,
    pub text: String,
}

impl CapturedLine {
    /// Whether a real console would have put this line on stderr
    pub fn is_error_stream(&self) -> bool {
        self.level.is_error_class()
    }
}

/// Records formatted lines instead of printing them.
///
/// Clones share the same buffer, so the host keeps one handle and gives the
/// other to the logger.
#[derive(Debug, Clone, Default)]
pub struct CaptureSink {
    lines: Arc<Mutex<Vec<CapturedLine>>>,
    output_format: OutputFormat,
}

impl CaptureSink {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    pub fn lines(&self) -> Vec<CapturedLine> {
        self.lines.lock().clone()
    }

    pub fn texts(&self) -> Vec<String> {
        self.lines.lock().iter().map(|line| line.text.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.lines.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lines.lock().clear();
    }
}

impl Sink for CaptureSink {
    fn append(&mut self, entry: &LogEntry) -> Result<()> {
        let text = self.output_format.format(entry, &TimestampFormat::Iso8601);
        self.lines.lock().push(CapturedLine {
            level: entry.level,
            text,
        });
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "capture"
    }
}
