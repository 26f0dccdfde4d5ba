//! Per-level and per-component counts over the retained window
//!
//! Counters follow the current contents of the ring, not all-time totals:
//! an evicted entry is subtracted again.

use super::log_entry::LogEntry;
use super::log_level::LogLevel;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Point-in-time view of the counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogStats {
    pub total: usize,
    pub by_level: BTreeMap<String, usize>,
    pub by_component: BTreeMap<String, usize>,
}

impl LogStats {
    pub fn level(&self, level: LogLevel) -> usize {
        self.by_level.get(level.to_str()).copied().unwrap_or(0)
    }

    pub fn component(&self, component: &str) -> usize {
        self.by_component.get(component).copied().unwrap_or(0)
    }
}

#[derive(Debug, Default)]
pub struct StatsAggregator {
    total: usize,
    by_level: BTreeMap<LogLevel, usize>,
    by_component: BTreeMap<String, usize>,
}

impl StatsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_append(&mut self, entry: &LogEntry) {
        self.total += 1;
        *self.by_level.entry(entry.level).or_insert(0) += 1;
        *self.by_component.entry(entry.component.clone()).or_insert(0) += 1;
    }

    /// Counters stop at zero; a key whose count reaches zero is removed.
    pub fn on_evict(&mut self, entry: &LogEntry) {
        self.total = self.total.saturating_sub(1);

        if let Some(count) = self.by_level.get_mut(&entry.level) {
            *count -= 1;
            if *count == 0 {
                self.by_level.remove(&entry.level);
            }
        }

        if let Some(count) = self.by_component.get_mut(&entry.component) {
            *count -= 1;
            if *count == 0 {
                self.by_component.remove(&entry.component);
            }
        }
    }

    pub fn snapshot(&self) -> LogStats {
        LogStats {
            total: self.total,
            by_level: self
                .by_level
                .iter()
                .map(|(level, count)| (level.to_str().to_string(), *count))
                .collect(),
            by_component: self.by_component.clone(),
        }
    }

    pub fn clear(&mut self) {
        self.total = 0;
        self.by_level.clear();
        self.by_component.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(level: LogLevel, component: &str) -> LogEntry {
        LogEntry::new(level, component, "m")
    }

    #[test]
    fn test_append_and_evict_pairs() {
        let mut stats = StatsAggregator::new();
        let a = entry(LogLevel::Info, "Reactor");
        let b = entry(LogLevel::Warn, "Reactor");
        let c = entry(LogLevel::Warn, "Batch");
        stats.on_append(&a);
        stats.on_append(&b);
        stats.on_append(&c);
        stats.on_evict(&a);

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.total, 2);
        assert_eq!(snapshot.level(LogLevel::Warn), 2);
        assert_eq!(snapshot.level(LogLevel::Info), 0);
        assert!(!snapshot.by_level.contains_key("INFO"));
        assert_eq!(snapshot.component("Reactor"), 1);
        assert_eq!(snapshot.component("Batch"), 1);
    }

    #[test]
    fn test_evict_unknown_never_goes_negative() {
        let mut stats = StatsAggregator::new();
        stats.on_evict(&entry(LogLevel::Error, "Ghost"));
        let snapshot = stats.snapshot();
        assert_eq!(snapshot.total, 0);
        assert!(snapshot.by_level.is_empty());
        assert!(snapshot.by_component.is_empty());
    }

    #[test]
    fn test_snapshot_json_shape() {
        let mut stats = StatsAggregator::new();
        stats.on_append(&entry(LogLevel::Critical, "Supplier"));
        let json = serde_json::to_value(stats.snapshot()).unwrap();
        assert_eq!(json["total"], 1);
        assert_eq!(json["byLevel"]["CRITICAL"], 1);
        assert_eq!(json["byComponent"]["Supplier"], 1);
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut stats = StatsAggregator::new();
        stats.on_append(&entry(LogLevel::Info, "A"));
        stats.clear();
        assert_eq!(stats.snapshot(), LogStats::default());
    }
}
