//! Core logger types and traits

pub mod config;
pub mod durable_slot;
pub mod error;
pub mod log_context;
pub mod log_entry;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod output_format;
pub mod overlay;
pub mod persistence;
pub mod ring_store;
pub mod sink;
pub mod stats;
pub mod timestamp;

pub use config::{BuildMode, LoggerConfig};
pub use durable_slot::{DurableSlot, FlushTicket, DEFAULT_SLOT_KEY};
pub use error::{LoggerError, Result};
pub use log_context::{ContextProvider, EntryContext, ProcessContext, StaticContext};
pub use log_entry::{EntryFactory, ErrorInfo, LogData, LogEntry};
pub use log_level::{LevelPolicy, LogLevel};
pub use logger::{ComponentLogger, Logger, LoggerBuilder, LOGGER_COMPONENT};
pub use metrics::DispatchMetrics;
pub use output_format::OutputFormat;
pub use overlay::{OverlayFeed, DEFAULT_OVERLAY_CAPACITY};
pub use persistence::PersistenceAdapter;
pub use ring_store::{LogFilter, RingStore};
pub use sink::Sink;
pub use stats::{LogStats, StatsAggregator};
pub use timestamp::{MonotonicClock, TimestampFormat};
