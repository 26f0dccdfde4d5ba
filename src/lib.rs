//! # Factory Diagnostics
//!
//! Centralized diagnostic logging for a factory-operations dashboard.
//!
//! Every subsystem reports through one [`Logger`]. Calls below the current
//! threshold are discarded up front; accepted entries go to the console, a
//! bounded in-memory window, a durable slot and an optional live overlay.
//!
//! ## Features
//!
//! - **Bounded memory**: the newest `max_retained` entries, with per-level and
//!   per-component counts kept in step
//! - **Survives restarts**: the newest `max_persisted` entries are mirrored to
//!   a durable slot and reloaded on startup
//! - **Isolated sinks**: a failing console or slot never reaches the caller
//! - **Export**: the retained window as JSON, plain or gzip-compressed
//!
//! ## Example
//!
//! ```
//! use factory_diagnostics::prelude::*;
//!
//! let logger = Logger::builder()
//!     .threshold(LogLevel::Info)
//!     .console_sink(CaptureSink::new())
//!     .build();
//!
//! logger.debug("Sensor", "filtered");
//! logger.warn("Reactor", "Temperature high");
//!
//! let warnings = logger.get_logs(Some(&LogFilter::new().min_level(LogLevel::Warn)));
//! assert_eq!(warnings.len(), 1);
//! ```

pub mod core;
pub mod macros;
pub mod sinks;
pub mod slots;

pub mod prelude {
    pub use crate::core::{
        BuildMode, ComponentLogger, ContextProvider, DispatchMetrics, DurableSlot, EntryContext,
        ErrorInfo, LevelPolicy, LogData, LogEntry, LogFilter, LogLevel, LogStats, Logger,
        LoggerBuilder, LoggerConfig, LoggerError, OutputFormat, Result, Sink, TimestampFormat,
    };
    pub use crate::sinks::{CaptureSink, ConsoleSink};
    #[cfg(feature = "file")]
    pub use crate::slots::FileSlot;
    pub use crate::slots::{BackgroundSlot, MemorySlot};
}

pub use core::{
    BuildMode, ComponentLogger, ContextProvider, DispatchMetrics, DurableSlot, EntryContext,
    ErrorInfo, LevelPolicy, LogData, LogEntry, LogFilter, LogLevel, LogStats, Logger,
    LoggerBuilder, LoggerConfig, LoggerError, MonotonicClock, OutputFormat, ProcessContext,
    Result, Sink, StaticContext, TimestampFormat, DEFAULT_SLOT_KEY, FlushTicket, LOGGER_COMPONENT,
};
#[cfg(feature = "file")]
pub use slots::FileSlot;
pub use sinks::{CaptureSink, ConsoleSink};
pub use slots::{BackgroundSlot, MemorySlot};
