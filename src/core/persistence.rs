//! Mirrors the newest part of the retained window into a durable slot

use super::durable_slot::{DurableSlot, FlushTicket};
use super::error::Result;
use super::log_entry::LogEntry;

/// Serializes the persisted suffix into a [`DurableSlot`].
///
/// The slot holds a flat JSON array of entries, oldest first, capped at
/// `max_persisted`. Errors are returned to the dispatcher, which reports and
/// swallows them.
pub struct PersistenceAdapter {
    slot: Box<dyn DurableSlot>,
    max_persisted: usize,
}

impl PersistenceAdapter {
    pub fn new(slot: Box<dyn DurableSlot>, max_persisted: usize) -> Self {
        Self { slot, max_persisted }
    }

    pub fn slot_key(&self) -> &str {
        self.slot.key()
    }

    /// Replace the slot with `entries`, keeping only the newest `max_persisted`
    pub fn sync<'a, I>(&mut self, entries: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a LogEntry>,
        I::IntoIter: ExactSizeIterator,
    {
        let entries = entries.into_iter();
        let skip = entries.len().saturating_sub(self.max_persisted);
        let suffix: Vec<&LogEntry> = entries.skip(skip).collect();
        let payload = encode(&suffix)?;
        self.slot.write(&payload)
    }

    /// Stored entries; empty if the slot is absent or blank, an error if the
    /// stored text is unreadable
    pub fn try_load(&self) -> Result<Vec<LogEntry>> {
        match self.slot.read()? {
            Some(payload) if !payload.trim().is_empty() => decode(&payload),
            _ => Ok(Vec::new()),
        }
    }

    pub fn clear(&mut self) -> Result<()> {
        self.slot.clear()
    }

    pub fn begin_flush(&mut self) -> FlushTicket {
        self.slot.begin_flush()
    }
}

/// Compact slot encoding
pub fn encode(entries: &[&LogEntry]) -> Result<String> {
    Ok(serde_json::to_string(entries)?)
}

/// Parses slot text or an export produced by `Logger::export_logs`
pub fn decode(payload: &str) -> Result<Vec<LogEntry>> {
    Ok(serde_json::from_str(payload)?)
}
