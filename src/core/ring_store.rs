//! Bounded in-memory window of retained entries

use super::log_entry::LogEntry;
use super::log_level::LogLevel;
use super::timestamp::sortable;
use chrono::{DateTime, Utc};
use std::collections::VecDeque;

/// Query over the retained window; set dimensions combine with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogFilter {
    pub min_level: Option<LogLevel>,
    pub component: Option<String>,
    pub since: Option<DateTime<Utc>>,
}

impl LogFilter {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn min_level(mut self, level: LogLevel) -> Self {
        self.min_level = Some(level);
        self
    }

    #[must_use]
    pub fn component(mut self, component: impl Into<String>) -> Self {
        self.component = Some(component.into());
        self
    }

    #[must_use]
    pub fn since(mut self, since: DateTime<Utc>) -> Self {
        self.since = Some(since);
        self
    }

    /// Build a filter from loosely typed input.
    ///
    /// An unrecognised level, a blank component or an unparsable timestamp
    /// leaves that dimension unfiltered instead of failing.
    pub fn from_query(min_level: Option<&str>, component: Option<&str>, since: Option<&str>) -> Self {
        Self {
            min_level: min_level.and_then(|level| level.parse().ok()),
            component: component
                .filter(|name| !name.trim().is_empty())
                .map(str::to_string),
            since: since.and_then(sortable::parse),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min_level.is_none() && self.component.is_none() && self.since.is_none()
    }

    pub fn matches(&self, entry: &LogEntry) -> bool {
        if let Some(min_level) = self.min_level {
            if entry.level < min_level {
                return false;
            }
        }
        if let Some(ref component) = self.component {
            if entry.component != *component {
                return false;
            }
        }
        if let Some(since) = self.since {
            if entry.timestamp < since {
                return false;
            }
        }
        true
    }
}

/// FIFO ring of at most `capacity` entries.
#[derive(Debug)]
pub struct RingStore {
    entries: VecDeque<LogEntry>,
    capacity: usize,
}

impl RingStore {
    /// `capacity` is raised to 1 if zero
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
        }
    }

    /// Append and return the evicted oldest entry, if the ring was full
    pub fn append(&mut self, entry: LogEntry) -> Option<LogEntry> {
        let evicted = if self.entries.len() >= self.capacity {
            self.entries.pop_front()
        } else {
            None
        };
        self.entries.push_back(entry);
        evicted
    }

    /// Entries in insertion order, optionally filtered
    pub fn snapshot(&self, filter: Option<&LogFilter>) -> Vec<LogEntry> {
        match filter {
            Some(filter) if !filter.is_empty() => self
                .entries
                .iter()
                .filter(|entry| filter.matches(entry))
                .cloned()
                .collect(),
            _ => self.entries.iter().cloned().collect(),
        }
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn entry_at(level: LogLevel, component: &str, message: &str, offset_ms: i64) -> LogEntry {
        let base = Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).single().unwrap();
        LogEntry::new(level, component, message).with_timestamp(base + Duration::milliseconds(offset_ms))
    }

    fn messages(entries: &[LogEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.message.as_str()).collect()
    }

    #[test]
    fn test_fifo_eviction() {
        let mut ring = RingStore::new(3);
        assert!(ring.append(entry_at(LogLevel::Info, "A", "A", 0)).is_none());
        ring.append(entry_at(LogLevel::Info, "A", "B", 1));
        ring.append(entry_at(LogLevel::Info, "A", "C", 2));
        let evicted = ring.append(entry_at(LogLevel::Info, "A", "D", 3));

        assert_eq!(evicted.map(|e| e.message), Some("A".to_string()));
        assert_eq!(messages(&ring.snapshot(None)), vec!["B", "C", "D"]);
    }

    #[test]
    fn test_zero_capacity_is_raised() {
        let mut ring = RingStore::new(0);
        ring.append(entry_at(LogLevel::Info, "A", "only", 0));
        ring.append(entry_at(LogLevel::Info, "A", "newer", 1));
        assert_eq!(ring.capacity(), 1);
        assert_eq!(messages(&ring.snapshot(None)), vec!["newer"]);
    }

    #[test]
    fn test_filters_compose_with_and() {
        let mut ring = RingStore::new(10);
        ring.append(entry_at(LogLevel::Debug, "Reactor", "r-debug", 0));
        ring.append(entry_at(LogLevel::Warn, "Reactor", "r-warn", 10));
        ring.append(entry_at(LogLevel::Error, "Batch", "b-error", 20));
        ring.append(entry_at(LogLevel::Error, "Reactor", "r-error", 30));

        let filter = LogFilter::new().min_level(LogLevel::Warn).component("Reactor");
        assert_eq!(messages(&ring.snapshot(Some(&filter))), vec!["r-warn", "r-error"]);

        let since = ring.snapshot(None)[2].timestamp;
        let filter = LogFilter::new().component("Reactor").since(since);
        assert_eq!(messages(&ring.snapshot(Some(&filter))), vec!["r-error"]);
    }

    #[test]
    fn test_since_is_inclusive_suffix() {
        let mut ring = RingStore::new(10);
        for i in 0..5 {
            ring.append(entry_at(LogLevel::Info, "A", &format!("m{}", i), i * 100));
        }
        let cut = ring.snapshot(None)[2].timestamp;
        let result = ring.snapshot(Some(&LogFilter::new().since(cut)));
        assert_eq!(messages(&result), vec!["m2", "m3", "m4"]);
    }

    #[test]
    fn test_from_query_ignores_invalid_dimensions() {
        let filter = LogFilter::from_query(Some("LOUD"), Some("Batch"), Some("not-a-time"));
        assert_eq!(filter.min_level, None);
        assert_eq!(filter.component.as_deref(), Some("Batch"));
        assert_eq!(filter.since, None);

        let filter = LogFilter::from_query(Some("error"), None, Some("2025-03-01T08:00:00.000000Z"));
        assert_eq!(filter.min_level, Some(LogLevel::Error));
        assert!(filter.since.is_some());
    }

    #[test]
    fn test_from_query_blank_component_matches_everything() {
        let entry = entry_at(LogLevel::Info, "Reactor", "online", 0);
        for blank in ["", "   ", "\t"] {
            let filter = LogFilter::from_query(None, Some(blank), None);
            assert!(filter.component.is_none());
            assert!(filter.is_empty());
            assert!(filter.matches(&entry));
        }
    }
}
