//! Logging macros for ergonomic log message formatting.
//!
//! Each macro takes the logger, a component name and `format!` arguments.
//! The message is only formatted when the level passes the threshold.
//!
//! # Examples
//!
//! ```
//! use factory_diagnostics::prelude::*;
//! use factory_diagnostics::info;
//!
//! let logger = Logger::builder().console_sink(CaptureSink::new()).build();
//!
//! // Basic logging
//! info!(logger, "Batch", "Batch started");
//!
//! // With format arguments
//! let batch = 17;
//! info!(logger, "Batch", "Batch {} finished in {}s", batch, 42);
//! assert_eq!(logger.get_stats().component("Batch"), 2);
//! ```

/// Log a message at an explicit level.
///
/// # Examples
///
/// ```
/// # use factory_diagnostics::prelude::*;
/// # let logger = Logger::builder().console_sink(CaptureSink::new()).build();
/// use factory_diagnostics::log;
/// log!(logger, LogLevel::Info, "Inventory", "Simple message");
/// log!(logger, LogLevel::Error, "Inventory", "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $component:expr, $($arg:tt)+) => {{
        let logger = &$logger;
        let level = $level;
        if logger.is_enabled(level) {
            logger.log(level, $component, format!($($arg)+));
        } else {
            logger.metrics().record_rejected();
        }
    }};
}

/// Log a debug-level message.
///
/// # Examples
///
/// ```
/// # use factory_diagnostics::prelude::*;
/// # let logger = Logger::builder().threshold(LogLevel::Debug).console_sink(CaptureSink::new()).build();
/// use factory_diagnostics::debug;
/// debug!(logger, "Sensor", "Counter value: {}", 10);
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, $component:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $component, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $component:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $component, $($arg)+)
    };
}

/// Log a warning-level message.
///
/// # Examples
///
/// ```
/// # use factory_diagnostics::prelude::*;
/// # let logger = Logger::builder().console_sink(CaptureSink::new()).build();
/// use factory_diagnostics::warn;
/// warn!(logger, "Supplier", "Retry {} of {}", 1, 3);
/// ```
#[macro_export]
macro_rules! warn {
    ($logger:expr, $component:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $component, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $component:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $component, $($arg)+)
    };
}

/// Log a critical-level message.
#[macro_export]
macro_rules! critical {
    ($logger:expr, $component:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Critical, $component, $($arg)+)
    };
}
