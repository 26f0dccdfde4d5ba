//! Error types for the diagnostic logger

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// Durable slot could not be read, written or cleared
    #[error("Durable slot '{key}' failed: {message}")]
    SlotError { key: String, message: String },

    /// Durable slot refused a write that does not fit its quota
    #[error("Storage quota exceeded for '{key}': {needed} bytes needed, {limit} bytes allowed")]
    QuotaExceeded {
        key: String,
        needed: usize,
        limit: usize,
    },

    /// Export could not be produced
    #[error("Export failed: {0}")]
    ExportError(String),

    /// Background persistence worker is gone
    #[error("Persistence worker stopped")]
    WorkerStopped,

    /// Sink error (generic)
    #[error("Sink error: {0}")]
    SinkError(String),
}

impl LoggerError {
    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a durable slot error
    pub fn slot(key: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::SlotError {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Create a quota exceeded error
    pub fn quota_exceeded(key: impl Into<String>, needed: usize, limit: usize) -> Self {
        LoggerError::QuotaExceeded {
            key: key.into(),
            needed,
            limit,
        }
    }

    /// Create an export error
    pub fn export<S: Into<String>>(msg: S) -> Self {
        LoggerError::ExportError(msg.into())
    }

    /// Create a sink error
    pub fn sink<S: Into<String>>(msg: S) -> Self {
        LoggerError::SinkError(msg.into())
    }
}
