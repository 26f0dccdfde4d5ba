//! Log entry structure and construction

use super::log_context::{ContextProvider, EntryContext};
use super::log_level::LogLevel;
use super::timestamp::{sortable, MonotonicClock};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

/// Opaque structured payload attached to an entry; stored and re-serialized,
/// never interpreted.
pub type LogData = serde_json::Value;

/// Captured description of a failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace: Option<String>,
}

impl ErrorInfo {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            trace: None,
        }
    }

    #[must_use]
    pub fn with_trace(mut self, trace: impl Into<String>) -> Self {
        self.trace = Some(trace.into());
        self
    }

    /// Capture an error and its `source()` chain as the trace text
    pub fn from_error(error: &(dyn std::error::Error + 'static)) -> Self {
        let mut chain = Vec::new();
        let mut source = error.source();
        while let Some(cause) = source {
            chain.push(format!("caused by: {}", cause));
            source = cause.source();
        }

        Self {
            message: error.to_string(),
            trace: (!chain.is_empty()).then(|| chain.join("\n")),
        }
    }
}

impl fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// One immutable log record.
///
/// The serialized form is the persisted and exported format: sortable
/// timestamp text, level name, component, message, optional `data`/`error`
/// and the captured context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    #[serde(with = "sortable")]
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub component: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<LogData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
    #[serde(default)]
    pub context: EntryContext,
}

impl LogEntry {
    /// Entry stamped with the current wall clock and an empty context
    pub fn new(level: LogLevel, component: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            timestamp: MonotonicClock::new().now(),
            level,
            component: component.into(),
            message: message.into(),
            data: None,
            error: None,
            context: EntryContext::default(),
        }
    }

    #[must_use]
    pub fn with_data(mut self, data: LogData) -> Self {
        self.data = Some(data);
        self
    }

    #[must_use]
    pub fn with_error(mut self, error: ErrorInfo) -> Self {
        self.error = Some(error);
        self
    }

    #[must_use]
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

/// Builds entries from caller input plus the clock and the host context.
///
/// This is the only place context is read. A provider that panics leaves the
/// entry with an empty context and bumps [`context_failures`](Self::context_failures).
pub struct EntryFactory {
    clock: MonotonicClock,
    context: Box<dyn ContextProvider>,
    context_failures: u64,
}

impl EntryFactory {
    pub fn new(clock: MonotonicClock, context: Box<dyn ContextProvider>) -> Self {
        Self {
            clock,
            context,
            context_failures: 0,
        }
    }

    /// Captures that panicked since the factory was created
    pub fn context_failures(&self) -> u64 {
        self.context_failures
    }

    pub fn build(
        &mut self,
        level: LogLevel,
        component: impl Into<String>,
        message: impl Into<String>,
        data: Option<LogData>,
        error: Option<ErrorInfo>,
    ) -> LogEntry {
        LogEntry {
            timestamp: self.clock.now(),
            level,
            component: component.into(),
            message: message.into(),
            data,
            error,
            context: self.capture_context(),
        }
    }

    fn capture_context(&mut self) -> EntryContext {
        let provider = &self.context;
        match panic::catch_unwind(AssertUnwindSafe(|| provider.capture())) {
            Ok(context) => context,
            Err(panic_info) => {
                self.context_failures += 1;
                let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = panic_info.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "Unknown panic".to_string()
                };
                eprintln!("[LOGGER ERROR] Context provider panicked: {}", panic_msg);
                EntryContext::default()
            }
        }
    }

    /// Keep later entries ordered after previously loaded ones
    pub fn resume_after(&mut self, timestamp: DateTime<Utc>) {
        self.clock.advance_to(timestamp);
    }
}

impl fmt::Debug for EntryFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntryFactory")
            .field("clock", &self.clock)
            .field("context_failures", &self.context_failures)
            .finish_non_exhaustive()
    }
}
