//! Live feed of recent entries for a visual debug overlay
//!
//! The feed is advisory: it keeps its own small buffer and pushes to
//! subscribers without blocking. Nothing here is read by export or stats.

use super::log_entry::LogEntry;
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Default number of entries the overlay keeps for inspection
pub const DEFAULT_OVERLAY_CAPACITY: usize = 50;

#[derive(Debug)]
pub struct OverlayFeed {
    enabled: AtomicBool,
    capacity: usize,
    buffer: Mutex<VecDeque<LogEntry>>,
    subscribers: Mutex<Vec<Sender<LogEntry>>>,
    dropped: AtomicU64,
}

impl OverlayFeed {
    pub fn new(capacity: usize, enabled: bool) -> Self {
        let capacity = capacity.max(1);
        Self {
            enabled: AtomicBool::new(enabled),
            capacity,
            buffer: Mutex::new(VecDeque::with_capacity(capacity)),
            subscribers: Mutex::new(Vec::new()),
            dropped: AtomicU64::new(0),
        }
    }

    pub fn toggle(&self, on: bool) {
        self.enabled.store(on, Ordering::Relaxed);
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    /// Buffer `entry` and offer it to every live subscriber.
    ///
    /// A subscriber whose queue is full misses the entry; one whose receiver
    /// was dropped is forgotten.
    pub fn push(&self, entry: &LogEntry) {
        {
            let mut buffer = self.buffer.lock();
            if buffer.len() >= self.capacity {
                buffer.pop_front();
            }
            buffer.push_back(entry.clone());
        }

        let mut subscribers = self.subscribers.lock();
        subscribers.retain(|subscriber| match subscriber.try_send(entry.clone()) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                true
            }
            Err(TrySendError::Disconnected(_)) => false,
        });
    }

    /// Receive every entry pushed from now on, up to `capacity` unread
    pub fn subscribe(&self, capacity: usize) -> Receiver<LogEntry> {
        let (sender, receiver) = bounded(capacity.max(1));
        self.subscribers.lock().push(sender);
        receiver
    }

    /// Take the buffered entries, oldest first
    pub fn drain(&self) -> Vec<LogEntry> {
        self.buffer.lock().drain(..).collect()
    }

    /// Copy of the buffered entries without consuming them
    pub fn recent(&self) -> Vec<LogEntry> {
        self.buffer.lock().iter().cloned().collect()
    }

    pub fn clear(&self) {
        self.buffer.lock().clear();
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().len()
    }

    /// Entries subscribers missed because their queue was full
    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl Default for OverlayFeed {
    fn default() -> Self {
        Self::new(DEFAULT_OVERLAY_CAPACITY, false)
    }
}
