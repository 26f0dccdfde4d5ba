//! In-process durable slot

use crate::core::{DurableSlot, LoggerError, Result};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Slot backed by shared memory.
///
/// Clones share the same storage, so a test or host can keep a handle and
/// inspect what the logger wrote. An optional byte quota makes oversized
/// writes fail the way a browser storage quota does.
#[derive(Debug, Clone)]
pub struct MemorySlot {
    key: String,
    contents: Arc<Mutex<Option<String>>>,
    quota: Option<usize>,
    unavailable: Arc<AtomicBool>,
}

impl MemorySlot {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            contents: Arc::new(Mutex::new(None)),
            quota: None,
            unavailable: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Slot pre-seeded with `payload`, as if written by an earlier run
    pub fn with_contents(key: impl Into<String>, payload: impl Into<String>) -> Self {
        let slot = Self::new(key);
        *slot.contents.lock() = Some(payload.into());
        slot
    }

    #[must_use]
    pub fn with_quota(mut self, max_bytes: usize) -> Self {
        self.quota = Some(max_bytes);
        self
    }

    /// Make every operation fail until switched back
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn contents(&self) -> Option<String> {
        self.contents.lock().clone()
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(LoggerError::slot(&self.key, "storage unavailable"));
        }
        Ok(())
    }
}

impl DurableSlot for MemorySlot {
    fn key(&self) -> &str {
        &self.key
    }

    fn read(&self) -> Result<Option<String>> {
        self.check_available()?;
        Ok(self.contents.lock().clone())
    }

    fn write(&mut self, payload: &str) -> Result<()> {
        self.check_available()?;
        if let Some(limit) = self.quota {
            if payload.len() > limit {
                return Err(LoggerError::quota_exceeded(&self.key, payload.len(), limit));
            }
        }
        *self.contents.lock() = Some(payload.to_string());
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.check_available()?;
        *self.contents.lock() = None;
        Ok(())
    }
}
