//! Durable key-value slot the host provides for snapshots

use super::error::{LoggerError, Result};
use crossbeam_channel::Receiver;

/// A single named slot in the host's durable key-value namespace.
///
/// Implementations decide where the text lives (browser storage, a file, an
/// embedded store); the logger only reads, replaces and clears it.
pub trait DurableSlot: Send {
    fn key(&self) -> &str;

    /// `Ok(None)` when nothing has been stored yet
    fn read(&self) -> Result<Option<String>>;

    /// Replace the slot contents
    fn write(&mut self, payload: &str) -> Result<()>;

    fn clear(&mut self) -> Result<()>;

    /// Block until accepted writes are visible to `read`
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    /// Start a flush without waiting for it.
    ///
    /// Slots that finish writes on another thread return a pending ticket so
    /// the caller can wait without holding its own locks.
    fn begin_flush(&mut self) -> FlushTicket {
        FlushTicket::ready(self.flush())
    }
}

/// Completion handle for [`DurableSlot::begin_flush`]
#[must_use = "a flush ticket must be waited on to observe the result"]
pub struct FlushTicket(TicketState);

enum TicketState {
    Ready(Result<()>),
    Pending(Receiver<Result<()>>),
}

impl FlushTicket {
    pub fn ready(result: Result<()>) -> Self {
        FlushTicket(TicketState::Ready(result))
    }

    /// Resolves with whatever the worker sends, or `WorkerStopped` if it
    /// hangs up first
    pub fn pending(receiver: Receiver<Result<()>>) -> Self {
        FlushTicket(TicketState::Pending(receiver))
    }

    pub fn wait(self) -> Result<()> {
        match self.0 {
            TicketState::Ready(result) => result,
            TicketState::Pending(receiver) => receiver.recv().unwrap_or(Err(LoggerError::WorkerStopped)),
        }
    }
}

/// Well-known slot key used when none is configured
pub const DEFAULT_SLOT_KEY: &str = "factory-dashboard-logs";
