//! Sink trait for console-style log output

use super::{error::Result, log_entry::LogEntry};

pub trait Sink: Send + Sync {
    fn append(&mut self, entry: &LogEntry) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}
