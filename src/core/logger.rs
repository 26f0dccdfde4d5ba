//! Main logger implementation
//!
//! [`Logger`] is the sink dispatcher: an accepted call is built into an entry,
//! written to the console sink, appended to the ring (with stats and durable
//! mirroring) and, when enabled, pushed to the overlay feed. A failing sink
//! never stops the others and never reaches the caller.

use super::{
    config::LoggerConfig,
    durable_slot::DurableSlot,
    error::{LoggerError, Result},
    log_context::{ContextProvider, ProcessContext},
    log_entry::{EntryFactory, ErrorInfo, LogData, LogEntry},
    log_level::{LevelPolicy, LogLevel},
    metrics::DispatchMetrics,
    overlay::OverlayFeed,
    persistence::PersistenceAdapter,
    ring_store::{LogFilter, RingStore},
    sink::Sink,
    stats::{LogStats, StatsAggregator},
    timestamp::MonotonicClock,
};
use crate::sinks::ConsoleSink;
use crate::slots::MemorySlot;
use chrono::Utc;
use crossbeam_channel::Receiver;
use parking_lot::Mutex;
use serde_json::json;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::panic::AssertUnwindSafe;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Component name used for entries the logger writes about itself
pub const LOGGER_COMPONENT: &str = "Logger";

/// Run a sink call, turning a panic into an error
fn guarded<F>(operation: &str, f: F) -> Result<()>
where
    F: FnOnce() -> Result<()>,
{
    match std::panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(panic_info) => {
            let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                s.to_string()
            } else if let Some(s) = panic_info.downcast_ref::<String>() {
                s.clone()
            } else {
                "Unknown panic".to_string()
            };
            Err(LoggerError::sink(format!("{} panicked: {}", operation, panic_msg)))
        }
    }
}

/// Everything an accepted entry touches, kept behind one lock so append,
/// eviction, the stats pair and the durable mirror happen together.
struct Dispatcher {
    factory: EntryFactory,
    console: Box<dyn Sink>,
    console_enabled: bool,
    ring: RingStore,
    stats: StatsAggregator,
    persistence: PersistenceAdapter,
    persistence_enabled: bool,
}

impl Dispatcher {
    /// A context provider panic is counted as a sink failure
    fn build_entry(
        &mut self,
        metrics: &DispatchMetrics,
        level: LogLevel,
        component: impl Into<String>,
        message: impl Into<String>,
        data: Option<LogData>,
        error: Option<ErrorInfo>,
    ) -> LogEntry {
        let failures = self.factory.context_failures();
        let entry = self.factory.build(level, component, message, data, error);
        if self.factory.context_failures() > failures {
            metrics.record_sink_failure();
        }
        entry
    }

    /// Console, then ring and slot. Returns a copy for the overlay when asked.
    fn deliver(&mut self, entry: LogEntry, metrics: &DispatchMetrics, keep_copy: bool) -> Option<LogEntry> {
        self.write_console(&entry, metrics);
        let copy = keep_copy.then(|| entry.clone());
        self.retain(entry, metrics);
        copy
    }

    fn write_console(&mut self, entry: &LogEntry, metrics: &DispatchMetrics) {
        if !self.console_enabled {
            return;
        }

        let console = &mut self.console;
        if let Err(e) = guarded("console sink", || console.append(entry)) {
            metrics.record_sink_failure();
            eprintln!("[LOGGER ERROR] Sink '{}' failed: {}", self.console.name(), e);
        }
    }

    fn retain(&mut self, entry: LogEntry, metrics: &DispatchMetrics) {
        self.stats.on_append(&entry);
        if let Some(evicted) = self.ring.append(entry) {
            self.stats.on_evict(&evicted);
        }

        if self.persistence_enabled {
            self.sync_persistence(metrics);
        }
    }

    fn sync_persistence(&mut self, metrics: &DispatchMetrics) {
        let Dispatcher {
            persistence, ring, ..
        } = self;
        let result = guarded("durable slot", || persistence.sync(ring.iter()));

        if let Err(e) = result {
            metrics.record_persistence_failure();
            let key = self.persistence.slot_key().to_string();
            self.report(
                metrics,
                LogLevel::Warn,
                "Failed to persist logs",
                json!({ "error": e.to_string(), "slot": key }),
            );
        }
    }

    /// Console-only self-log; never retained, so a failing slot cannot
    /// trigger another persistence attempt.
    fn report(&mut self, metrics: &DispatchMetrics, level: LogLevel, message: &str, data: LogData) {
        let entry = self.build_entry(metrics, level, LOGGER_COMPONENT, message, Some(data), None);
        self.write_console(&entry, metrics);
    }

    /// Fill the ring from the slot; returns the error if a stored snapshot
    /// could not be read.
    fn hydrate(&mut self) -> Option<LoggerError> {
        let loaded = match guarded_load(&self.persistence) {
            Ok(entries) => entries,
            Err(e) => return Some(e),
        };
        if loaded.is_empty() {
            return None;
        }

        if let Some(newest) = loaded.iter().map(|entry| entry.timestamp).max() {
            self.factory.resume_after(newest);
        }

        let skip = loaded.len().saturating_sub(self.ring.capacity());
        for entry in loaded.into_iter().skip(skip) {
            self.stats.on_append(&entry);
            if let Some(evicted) = self.ring.append(entry) {
                self.stats.on_evict(&evicted);
            }
        }
        None
    }

    fn clear(&mut self, metrics: &DispatchMetrics) {
        self.ring.clear();
        self.stats.clear();

        let persistence = &mut self.persistence;
        if let Err(e) = guarded("durable slot", || persistence.clear()) {
            metrics.record_persistence_failure();
            let key = self.persistence.slot_key().to_string();
            self.report(
                metrics,
                LogLevel::Warn,
                "Failed to clear persisted logs",
                json!({ "error": e.to_string(), "slot": key }),
            );
        }
    }
}

fn guarded_load(persistence: &PersistenceAdapter) -> Result<Vec<LogEntry>> {
    let mut loaded = Ok(Vec::new());
    let outcome = guarded("durable slot", || {
        loaded = persistence.try_load();
        Ok(())
    });
    outcome.and(loaded)
}

pub struct Logger {
    policy: LevelPolicy,
    dispatcher: Mutex<Dispatcher>,
    overlay: OverlayFeed,
    /// Metrics for observability (accepted, rejected, sink failures)
    metrics: DispatchMetrics,
    max_retained: usize,
    max_persisted: usize,
    slot_key: String,
}

impl Logger {
    /// Logger with `config`, console output, process context and an
    /// in-memory slot. Use [`Logger::builder`] to plug in other capabilities.
    #[must_use]
    pub fn new(config: LoggerConfig) -> Self {
        Self::builder().config(config).build()
    }

    /// Create a builder for Logger
    ///
    /// # Example
    /// ```
    /// use factory_diagnostics::prelude::*;
    ///
    /// let logger = Logger::builder()
    ///     .threshold(LogLevel::Debug)
    ///     .max_retained(500)
    ///     .console_sink(CaptureSink::new())
    ///     .build();
    /// logger.debug("Reactor", "Pressure sampled");
    /// assert_eq!(logger.get_stats().total, 1);
    /// ```
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    /// Filter, build and fan out one entry.
    ///
    /// A call below the threshold returns before anything is allocated.
    pub fn emit(
        &self,
        level: LogLevel,
        component: impl Into<String>,
        message: impl Into<String>,
        data: Option<LogData>,
        error: Option<ErrorInfo>,
    ) {
        if !self.policy.should_accept(level) {
            self.metrics.record_rejected();
            return;
        }
        self.metrics.record_accepted();

        let overlay_copy = {
            let mut dispatcher = self.dispatcher.lock();
            let entry = dispatcher.build_entry(&self.metrics, level, component, message, data, error);
            dispatcher.deliver(entry, &self.metrics, self.overlay.is_enabled())
        };

        if let Some(entry) = overlay_copy {
            self.overlay.push(&entry);
        }
    }

    #[inline]
    pub fn log(&self, level: LogLevel, component: impl Into<String>, message: impl Into<String>) {
        self.emit(level, component, message, None, None);
    }

    #[inline]
    pub fn debug(&self, component: impl Into<String>, message: impl Into<String>) {
        self.emit(LogLevel::Debug, component, message, None, None);
    }

    #[inline]
    pub fn info(&self, component: impl Into<String>, message: impl Into<String>) {
        self.emit(LogLevel::Info, component, message, None, None);
    }

    #[inline]
    pub fn warn(&self, component: impl Into<String>, message: impl Into<String>) {
        self.emit(LogLevel::Warn, component, message, None, None);
    }

    #[inline]
    pub fn error(&self, component: impl Into<String>, message: impl Into<String>) {
        self.emit(LogLevel::Error, component, message, None, None);
    }

    #[inline]
    pub fn critical(&self, component: impl Into<String>, message: impl Into<String>) {
        self.emit(LogLevel::Critical, component, message, None, None);
    }

    pub fn debug_with(&self, component: impl Into<String>, message: impl Into<String>, data: LogData) {
        self.emit(LogLevel::Debug, component, message, Some(data), None);
    }

    pub fn info_with(&self, component: impl Into<String>, message: impl Into<String>, data: LogData) {
        self.emit(LogLevel::Info, component, message, Some(data), None);
    }

    pub fn warn_with(&self, component: impl Into<String>, message: impl Into<String>, data: LogData) {
        self.emit(LogLevel::Warn, component, message, Some(data), None);
    }

    pub fn error_with(
        &self,
        component: impl Into<String>,
        message: impl Into<String>,
        data: Option<LogData>,
        error: Option<ErrorInfo>,
    ) {
        self.emit(LogLevel::Error, component, message, data, error);
    }

    pub fn critical_with(
        &self,
        component: impl Into<String>,
        message: impl Into<String>,
        data: Option<LogData>,
        error: Option<ErrorInfo>,
    ) {
        self.emit(LogLevel::Critical, component, message, data, error);
    }

    /// Handle that fills in `component` on every call
    pub fn component(self: &Arc<Self>, component: impl Into<String>) -> ComponentLogger {
        ComponentLogger {
            logger: Arc::clone(self),
            component: component.into(),
        }
    }

    /// Retained entries in insertion order, optionally filtered
    pub fn get_logs(&self, filter: Option<&LogFilter>) -> Vec<LogEntry> {
        self.dispatcher.lock().ring.snapshot(filter)
    }

    /// Counts over the retained window
    pub fn get_stats(&self) -> LogStats {
        self.dispatcher.lock().stats.snapshot()
    }

    /// Pretty JSON array of the whole retained window.
    ///
    /// The text is accepted by the durable-slot load path, so seeding a slot
    /// with it re-imports the entries.
    pub fn export_logs(&self) -> Result<String> {
        let entries = self.get_logs(None);
        Ok(serde_json::to_string_pretty(&entries)?)
    }

    /// Write the export to `factory-logs-<date>.json` (or `.json.gz`) in `dir`
    pub fn export_to_file(&self, dir: impl AsRef<Path>, compress: bool) -> Result<PathBuf> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(LoggerError::export(format!(
                "export directory does not exist: {}",
                dir.display()
            )));
        }

        let text = self.export_logs()?;
        let date = Utc::now().format("%Y-%m-%d");
        let path = if compress {
            dir.join(format!("factory-logs-{}.json.gz", date))
        } else {
            dir.join(format!("factory-logs-{}.json", date))
        };

        let file = File::create(&path).map_err(|e| {
            LoggerError::io_operation("exporting logs", path.display().to_string(), e)
        })?;
        let mut writer = BufWriter::new(file);

        if compress {
            let mut encoder = flate2::write::GzEncoder::new(writer, flate2::Compression::default());
            encoder.write_all(text.as_bytes())?;
            encoder.finish()?.flush()?;
        } else {
            writer.write_all(text.as_bytes())?;
            writer.flush()?;
        }

        Ok(path)
    }

    /// Empty the ring, stats, durable slot and overlay, then record the clear.
    ///
    /// The confirmation is an INFO entry and, like any other, is subject to
    /// the current threshold.
    pub fn clear_logs(&self) {
        let overlay_copy = {
            let mut dispatcher = self.dispatcher.lock();
            dispatcher.clear(&self.metrics);
            self.overlay.clear();

            if self.policy.should_accept(LogLevel::Info) {
                self.metrics.record_accepted();
                let entry = dispatcher.build_entry(
                    &self.metrics,
                    LogLevel::Info,
                    LOGGER_COMPONENT,
                    "Logs cleared",
                    None,
                    None,
                );
                dispatcher.deliver(entry, &self.metrics, self.overlay.is_enabled())
            } else {
                self.metrics.record_rejected();
                None
            }
        };

        if let Some(entry) = overlay_copy {
            self.overlay.push(&entry);
        }
    }

    /// Whether a call at `level` would currently be accepted
    #[inline]
    pub fn is_enabled(&self, level: LogLevel) -> bool {
        self.policy.should_accept(level)
    }

    pub fn set_level(&self, level: LogLevel) {
        self.policy.set_threshold(level);
    }

    pub fn level(&self) -> LogLevel {
        self.policy.threshold()
    }

    pub fn enable_overlay(&self) {
        self.overlay.toggle(true);
    }

    pub fn disable_overlay(&self) {
        self.overlay.toggle(false);
    }

    pub fn set_console_enabled(&self, enabled: bool) {
        self.dispatcher.lock().console_enabled = enabled;
    }

    /// Turning persistence on mirrors the current window right away
    pub fn set_persistence_enabled(&self, enabled: bool) {
        let mut dispatcher = self.dispatcher.lock();
        let was_enabled = dispatcher.persistence_enabled;
        dispatcher.persistence_enabled = enabled;
        if enabled && !was_enabled {
            dispatcher.sync_persistence(&self.metrics);
        }
    }

    /// Current settings
    pub fn config(&self) -> LoggerConfig {
        let dispatcher = self.dispatcher.lock();
        LoggerConfig {
            threshold: self.policy.threshold(),
            console_enabled: dispatcher.console_enabled,
            persistence_enabled: dispatcher.persistence_enabled,
            overlay_enabled: self.overlay.is_enabled(),
            max_retained: self.max_retained,
            max_persisted: self.max_persisted,
            overlay_capacity: self.overlay.capacity(),
            slot_key: self.slot_key.clone(),
        }
    }

    pub fn overlay(&self) -> &OverlayFeed {
        &self.overlay
    }

    /// Live stream of entries pushed to the overlay while it is enabled
    pub fn subscribe_overlay(&self, capacity: usize) -> Receiver<LogEntry> {
        self.overlay.subscribe(capacity)
    }

    pub fn drain_overlay(&self) -> Vec<LogEntry> {
        self.overlay.drain()
    }

    /// Get the dispatcher metrics
    ///
    /// # Example
    ///
    /// ```
    /// use factory_diagnostics::prelude::*;
    ///
    /// let logger = Logger::builder().console_sink(CaptureSink::new()).build();
    /// logger.debug("Reactor", "filtered out at INFO");
    /// assert_eq!(logger.metrics().rejected_count(), 1);
    /// ```
    pub fn metrics(&self) -> &DispatchMetrics {
        &self.metrics
    }

    /// Flush the console sink and wait for pending slot writes.
    ///
    /// The wait happens after the dispatcher lock is released, so emits from
    /// other threads keep going while a background slot catches up. Failures
    /// and panics are counted in [`metrics`](Self::metrics); the first one is
    /// returned.
    pub fn flush(&self) -> Result<()> {
        let (console_result, ticket) = {
            let mut dispatcher = self.dispatcher.lock();
            let console = &mut dispatcher.console;
            let console_result = guarded("console sink", || console.flush());

            let mut ticket = None;
            let persistence = &mut dispatcher.persistence;
            let started = guarded("durable slot", || {
                ticket = Some(persistence.begin_flush());
                Ok(())
            });
            (console_result, started.map(|()| ticket))
        };

        if console_result.is_err() {
            self.metrics.record_sink_failure();
        }

        let slot_result = match ticket {
            Ok(Some(ticket)) => ticket.wait(),
            Ok(None) => Ok(()),
            Err(e) => Err(e),
        };
        if slot_result.is_err() {
            self.metrics.record_persistence_failure();
        }

        console_result.and(slot_result)
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(LoggerConfig::default())
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            eprintln!("[LOGGER ERROR] Failed to flush during shutdown: {}", e);
        }
    }
}

/// Logger handle bound to one component name
#[derive(Clone)]
pub struct ComponentLogger {
    logger: Arc<Logger>,
    component: String,
}

impl ComponentLogger {
    pub fn name(&self) -> &str {
        &self.component
    }

    pub fn logger(&self) -> &Arc<Logger> {
        &self.logger
    }

    pub fn emit(
        &self,
        level: LogLevel,
        message: impl Into<String>,
        data: Option<LogData>,
        error: Option<ErrorInfo>,
    ) {
        self.logger
            .emit(level, self.component.as_str(), message, data, error);
    }

    pub fn debug(&self, message: impl Into<String>) {
        self.emit(LogLevel::Debug, message, None, None);
    }

    pub fn info(&self, message: impl Into<String>) {
        self.emit(LogLevel::Info, message, None, None);
    }

    pub fn warn(&self, message: impl Into<String>) {
        self.emit(LogLevel::Warn, message, None, None);
    }

    pub fn error(&self, message: impl Into<String>, error: Option<ErrorInfo>) {
        self.emit(LogLevel::Error, message, None, error);
    }

    pub fn critical(&self, message: impl Into<String>, error: Option<ErrorInfo>) {
        self.emit(LogLevel::Critical, message, None, error);
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use factory_diagnostics::prelude::*;
///
/// let slot = MemorySlot::new("factory-dashboard-logs");
/// let logger = Logger::builder()
///     .threshold(LogLevel::Info)
///     .max_retained(2)
///     .max_persisted(1)
///     .durable_slot(slot.clone())
///     .console_sink(CaptureSink::new())
///     .build();
///
/// logger.warn("B", "m3");
/// logger.error("C", "m4");
/// assert!(slot.contents().unwrap().contains("m4"));
/// assert!(!slot.contents().unwrap().contains("m3"));
/// ```
pub struct LoggerBuilder {
    config: LoggerConfig,
    console: Option<Box<dyn Sink>>,
    context: Option<Box<dyn ContextProvider>>,
    slot: Option<Box<dyn DurableSlot>>,
    clock: Option<MonotonicClock>,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            config: LoggerConfig::default(),
            console: None,
            context: None,
            slot: None,
            clock: None,
        }
    }

    /// Replace the whole configuration
    #[must_use = "builder methods return a new value"]
    pub fn config(mut self, config: LoggerConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn threshold(mut self, level: LogLevel) -> Self {
        self.config.threshold = level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn console_enabled(mut self, enabled: bool) -> Self {
        self.config.console_enabled = enabled;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn persistence_enabled(mut self, enabled: bool) -> Self {
        self.config.persistence_enabled = enabled;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn overlay_enabled(mut self, enabled: bool) -> Self {
        self.config.overlay_enabled = enabled;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn max_retained(mut self, count: usize) -> Self {
        self.config.max_retained = count;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn max_persisted(mut self, count: usize) -> Self {
        self.config.max_persisted = count;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn overlay_capacity(mut self, count: usize) -> Self {
        self.config.overlay_capacity = count;
        self
    }

    /// Key for the default in-memory slot; ignored when a slot is supplied
    #[must_use = "builder methods return a new value"]
    pub fn slot_key(mut self, key: impl Into<String>) -> Self {
        self.config.slot_key = key.into();
        self
    }

    /// Console-style sink (defaults to [`ConsoleSink`])
    #[must_use = "builder methods return a new value"]
    pub fn console_sink<S: Sink + 'static>(mut self, sink: S) -> Self {
        self.console = Some(Box::new(sink));
        self
    }

    /// Environment capture (defaults to [`ProcessContext`])
    #[must_use = "builder methods return a new value"]
    pub fn context_provider<P: ContextProvider + 'static>(mut self, provider: P) -> Self {
        self.context = Some(Box::new(provider));
        self
    }

    /// Durable slot to hydrate from and mirror into (defaults to an
    /// in-memory slot, which lives only as long as the process)
    #[must_use = "builder methods return a new value"]
    pub fn durable_slot<S: DurableSlot + 'static>(mut self, slot: S) -> Self {
        self.slot = Some(Box::new(slot));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn clock(mut self, clock: MonotonicClock) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Build the Logger.
    ///
    /// Out-of-range sizes are clamped. A missing or unreadable snapshot
    /// yields an empty window; an unreadable one is reported on the console.
    pub fn build(self) -> Logger {
        let config = self.config.normalized();
        let slot = self
            .slot
            .unwrap_or_else(|| Box::new(MemorySlot::new(config.slot_key.clone())));
        let slot_key = slot.key().to_string();

        let mut dispatcher = Dispatcher {
            factory: EntryFactory::new(
                self.clock.unwrap_or_default(),
                self.context.unwrap_or_else(|| Box::new(ProcessContext::new())),
            ),
            console: self.console.unwrap_or_else(|| Box::new(ConsoleSink::new())),
            console_enabled: config.console_enabled,
            ring: RingStore::new(config.max_retained),
            stats: StatsAggregator::new(),
            persistence: PersistenceAdapter::new(slot, config.max_persisted),
            persistence_enabled: config.persistence_enabled,
        };

        let metrics = DispatchMetrics::new();
        match dispatcher.hydrate() {
            Some(e) => {
                metrics.record_persistence_failure();
                dispatcher.report(
                    &metrics,
                    LogLevel::Warn,
                    "Discarded unreadable persisted logs",
                    json!({ "error": e.to_string(), "slot": slot_key }),
                );
            }
            None if dispatcher.persistence_enabled && !dispatcher.ring.is_empty() => {
                dispatcher.sync_persistence(&metrics);
            }
            None => {}
        }

        Logger {
            policy: LevelPolicy::new(config.threshold),
            dispatcher: Mutex::new(dispatcher),
            overlay: OverlayFeed::new(config.overlay_capacity, config.overlay_enabled),
            metrics,
            max_retained: config.max_retained,
            max_persisted: config.max_persisted,
            slot_key,
        }
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::persistence::decode;
    use crate::core::EntryContext;
    use crate::sinks::CaptureSink;

    struct PanickingSink;

    impl Sink for PanickingSink {
        fn append(&mut self, _entry: &LogEntry) -> Result<()> {
            panic!("console exploded");
        }

        fn flush(&mut self) -> Result<()> {
            Ok(())
        }

        fn name(&self) -> &str {
            "panicking"
        }
    }

    struct FlushPanickingSink;

    impl Sink for FlushPanickingSink {
        fn append(&mut self, _entry: &LogEntry) -> Result<()> {
            Ok(())
        }

        fn flush(&mut self) -> Result<()> {
            panic!("stdout closed");
        }

        fn name(&self) -> &str {
            "flush-panicking"
        }
    }

    struct FlushPanickingSlot;

    impl DurableSlot for FlushPanickingSlot {
        fn key(&self) -> &str {
            "logs"
        }

        fn read(&self) -> Result<Option<String>> {
            Ok(None)
        }

        fn write(&mut self, _payload: &str) -> Result<()> {
            Ok(())
        }

        fn clear(&mut self) -> Result<()> {
            Ok(())
        }

        fn flush(&mut self) -> Result<()> {
            panic!("storage gone");
        }
    }

    /// Slot whose flush announces itself, then waits for the gate to open
    struct GatedSlot {
        entered: crossbeam_channel::Sender<()>,
        gate: Receiver<()>,
    }

    impl DurableSlot for GatedSlot {
        fn key(&self) -> &str {
            "gated"
        }

        fn read(&self) -> Result<Option<String>> {
            Ok(None)
        }

        fn write(&mut self, _payload: &str) -> Result<()> {
            Ok(())
        }

        fn clear(&mut self) -> Result<()> {
            Ok(())
        }

        fn flush(&mut self) -> Result<()> {
            let _ = self.entered.try_send(());
            let _ = self.gate.recv();
            Ok(())
        }
    }

    fn quiet_builder() -> (LoggerBuilder, CaptureSink, MemorySlot) {
        let capture = CaptureSink::new();
        let slot = MemorySlot::new("test-logs");
        let builder = Logger::builder()
            .console_sink(capture.clone())
            .durable_slot(slot.clone())
            .context_provider(|| EntryContext::new().with_origin("/test"));
        (builder, capture, slot)
    }

    fn persisted_messages(slot: &MemorySlot) -> Vec<String> {
        slot.contents()
            .map(|text| decode(&text).unwrap())
            .unwrap_or_default()
            .into_iter()
            .map(|entry| entry.message)
            .collect()
    }

    #[test]
    fn test_builder_defaults() {
        let (builder, _, _) = quiet_builder();
        let logger = builder.build();
        let config = logger.config();
        assert_eq!(config.threshold, LogLevel::Info);
        assert_eq!(config.max_retained, 1000);
        assert_eq!(config.slot_key, "test-logs");
        assert!(logger.get_logs(None).is_empty());
    }

    #[test]
    fn test_builder_clamps_persisted_to_retained() {
        let (builder, _, _) = quiet_builder();
        let logger = builder.max_retained(3).max_persisted(10).build();
        assert_eq!(logger.config().max_persisted, 3);
    }

    #[test]
    fn test_rejected_call_touches_nothing() {
        let (builder, capture, slot) = quiet_builder();
        let logger = builder.threshold(LogLevel::Error).build();

        logger.debug("Reactor", "noise");
        logger.warn("Reactor", "noise");

        assert!(capture.is_empty());
        assert!(slot.contents().is_none());
        assert_eq!(logger.get_stats(), LogStats::default());
        assert_eq!(logger.metrics().rejected_count(), 2);
    }

    #[test]
    fn test_console_line_and_context() {
        let (builder, capture, _) = quiet_builder();
        let logger = builder.build();
        logger.warn_with("Reactor", "Temperature high", json!({"celsius": 412}));

        let lines = capture.texts();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("WARN [Reactor] Temperature high data={\"celsius\":412}"));
        assert_eq!(logger.get_logs(None)[0].context.origin.as_deref(), Some("/test"));
    }

    #[test]
    fn test_console_disabled_still_retains() {
        let (builder, capture, _) = quiet_builder();
        let logger = builder.console_enabled(false).build();
        logger.info("Batch", "started");
        assert!(capture.is_empty());
        assert_eq!(logger.get_logs(None).len(), 1);
    }

    #[test]
    fn test_panicking_console_does_not_stop_other_sinks() {
        let slot = MemorySlot::new("logs");
        let logger = Logger::builder()
            .console_sink(PanickingSink)
            .durable_slot(slot.clone())
            .overlay_enabled(true)
            .build();

        logger.error("Pump", "still recorded");

        assert_eq!(logger.get_logs(None).len(), 1);
        assert_eq!(persisted_messages(&slot), vec!["still recorded"]);
        assert_eq!(logger.overlay().recent().len(), 1);
        assert_eq!(logger.metrics().sink_failures(), 1);
    }

    #[test]
    fn test_persistence_failure_reported_once_on_console_only() {
        let capture = CaptureSink::new();
        let slot = MemorySlot::new("logs").with_quota(10);
        let logger = Logger::builder()
            .console_sink(capture.clone())
            .durable_slot(slot)
            .build();

        logger.info("Inventory", "stock level low for bolts");

        let lines = capture.lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].level, LogLevel::Warn);
        assert!(lines[1].text.contains("[Logger] Failed to persist logs"));
        assert!(lines[1].text.contains("Storage quota exceeded"));

        // The warning is not retained, so it cannot re-trigger persistence
        let logs = logger.get_logs(None);
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].component, "Inventory");
        assert_eq!(logger.metrics().persistence_failures(), 1);
    }

    #[test]
    fn test_persistence_disabled_leaves_slot_untouched() {
        let (builder, _, slot) = quiet_builder();
        let logger = builder.persistence_enabled(false).build();
        logger.info("A", "one");
        assert!(slot.contents().is_none());

        logger.set_persistence_enabled(true);
        assert_eq!(persisted_messages(&slot), vec!["one"]);
    }

    #[test]
    fn test_hydrates_from_slot_and_truncates() {
        let (builder, _, slot) = quiet_builder();
        let seeded = builder.max_persisted(10).build();
        for i in 0..5 {
            seeded.info("Seed", format!("m{}", i));
        }
        drop(seeded);

        let logger = Logger::builder()
            .console_sink(CaptureSink::new())
            .durable_slot(slot.clone())
            .max_retained(3)
            .build();

        let messages: Vec<_> = logger.get_logs(None).into_iter().map(|e| e.message).collect();
        assert_eq!(messages, vec!["m2", "m3", "m4"]);
        assert_eq!(logger.get_stats().total, 3);
        assert_eq!(persisted_messages(&slot), vec!["m2", "m3", "m4"]);
    }

    #[test]
    fn test_malformed_slot_yields_empty_window_and_warning() {
        let capture = CaptureSink::new();
        let logger = Logger::builder()
            .console_sink(capture.clone())
            .durable_slot(MemorySlot::with_contents("logs", "[{\"broken\":"))
            .build();

        assert!(logger.get_logs(None).is_empty());
        let lines = capture.lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].level, LogLevel::Warn);
        assert!(lines[0].text.contains("Discarded unreadable persisted logs"));
    }

    #[test]
    fn test_entries_after_hydration_sort_after_loaded() {
        let (builder, _, slot) = quiet_builder();
        let first = builder.build();
        first.info("A", "before restart");
        let loaded_ts = first.get_logs(None)[0].timestamp;
        drop(first);

        let past = loaded_ts - chrono::Duration::hours(1);
        let logger = Logger::builder()
            .console_sink(CaptureSink::new())
            .durable_slot(slot)
            .clock(MonotonicClock::with_source(move || past))
            .build();
        logger.info("A", "after restart");

        let logs = logger.get_logs(None);
        assert!(logs[1].timestamp >= logs[0].timestamp);
    }

    #[test]
    fn test_clear_logs_leaves_only_confirmation() {
        let (builder, _, slot) = quiet_builder();
        let logger = builder.overlay_enabled(true).build();
        logger.warn("A", "one");
        logger.error("B", "two");

        logger.clear_logs();

        let logs = logger.get_logs(None);
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].component, LOGGER_COMPONENT);
        assert_eq!(logs[0].level, LogLevel::Info);
        assert_eq!(logger.get_stats().total, 1);
        assert_eq!(persisted_messages(&slot), vec!["Logs cleared"]);
        let overlay: Vec<_> = logger.drain_overlay().into_iter().map(|e| e.message).collect();
        assert_eq!(overlay, vec!["Logs cleared"]);
    }

    #[test]
    fn test_overlay_toggle_takes_effect_on_next_emit() {
        let (builder, _, _) = quiet_builder();
        let logger = builder.build();
        let feed = logger.subscribe_overlay(8);

        logger.info("A", "hidden");
        logger.enable_overlay();
        logger.info("A", "shown");
        logger.disable_overlay();
        logger.info("A", "hidden again");

        assert_eq!(feed.try_recv().unwrap().message, "shown");
        assert!(feed.try_recv().is_err());
        assert_eq!(logger.get_logs(None).len(), 3);
    }

    #[test]
    fn test_component_logger() {
        let (builder, _, _) = quiet_builder();
        let logger = Arc::new(builder.build());
        let reactor = logger.component("Reactor-3");
        reactor.info("online");
        reactor.error("offline", Some(ErrorInfo::new("coolant leak")));

        let logs = logger.get_logs(Some(&LogFilter::new().component("Reactor-3")));
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[1].error.as_ref().unwrap().message, "coolant leak");
        assert_eq!(reactor.name(), "Reactor-3");
    }

    #[test]
    fn test_export_to_file_plain_and_compressed() -> Result<()> {
        use flate2::read::GzDecoder;
        use std::io::Read;

        let (builder, _, _) = quiet_builder();
        let logger = builder.build();
        logger.info("Supplier", "delivery received");
        let dir = tempfile::tempdir()?;

        let plain = logger.export_to_file(dir.path(), false)?;
        let text = std::fs::read_to_string(&plain)?;
        assert_eq!(decode(&text)?, logger.get_logs(None));

        let gz = logger.export_to_file(dir.path(), true)?;
        assert!(gz.to_string_lossy().ends_with(".json.gz"));
        let mut unpacked = String::new();
        GzDecoder::new(File::open(&gz)?).read_to_string(&mut unpacked)?;
        assert_eq!(unpacked, text);

        let missing = dir.path().join("missing");
        assert!(matches!(
            logger.export_to_file(&missing, false),
            Err(LoggerError::ExportError(_))
        ));
        Ok(())
    }

    #[test]
    fn test_panicking_console_flush_is_contained() {
        let logger = Logger::builder()
            .console_sink(FlushPanickingSink)
            .durable_slot(MemorySlot::new("logs"))
            .build();
        logger.info("Reactor", "online");

        let result = std::panic::catch_unwind(AssertUnwindSafe(|| logger.flush()));
        let flushed = result.expect("flush must not unwind");
        assert!(matches!(flushed, Err(LoggerError::SinkError(_))));
        assert_eq!(logger.metrics().sink_failures(), 1);

        assert!(std::panic::catch_unwind(AssertUnwindSafe(|| drop(logger))).is_ok());
    }

    #[test]
    fn test_panicking_slot_flush_is_contained() {
        let logger = Logger::builder()
            .console_sink(CaptureSink::new())
            .durable_slot(FlushPanickingSlot)
            .build();

        let result = std::panic::catch_unwind(AssertUnwindSafe(|| logger.flush()));
        assert!(result.expect("flush must not unwind").is_err());
        assert_eq!(logger.metrics().persistence_failures(), 1);
        assert_eq!(logger.metrics().sink_failures(), 0);

        assert!(std::panic::catch_unwind(AssertUnwindSafe(|| drop(logger))).is_ok());
    }

    #[test]
    fn test_panicking_context_provider_still_records_entry() {
        let capture = CaptureSink::new();
        let logger = Logger::builder()
            .console_sink(capture.clone())
            .durable_slot(MemorySlot::new("logs"))
            .context_provider(|| -> EntryContext { panic!("no page location") })
            .build();

        let result = std::panic::catch_unwind(AssertUnwindSafe(|| logger.info("A", "m")));
        assert!(result.is_ok());

        let logs = logger.get_logs(None);
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].message, "m");
        assert_eq!(logs[0].context, EntryContext::default());
        assert_eq!(capture.len(), 1);
        assert_eq!(logger.metrics().sink_failures(), 1);
    }

    #[test]
    fn test_emits_proceed_while_flush_waits_on_slot() {
        use crate::slots::BackgroundSlot;
        use std::time::Duration;

        let (entered_tx, entered_rx) = crossbeam_channel::bounded(1);
        let (gate_tx, gate_rx) = crossbeam_channel::bounded(1);
        let slot = GatedSlot {
            entered: entered_tx,
            gate: gate_rx,
        };
        let logger = Arc::new(
            Logger::builder()
                .console_sink(CaptureSink::new())
                .durable_slot(BackgroundSlot::new(slot))
                .build(),
        );

        let flusher = {
            let logger = Arc::clone(&logger);
            std::thread::spawn(move || logger.flush())
        };
        entered_rx
            .recv_timeout(Duration::from_secs(5))
            .expect("slot flush never started");

        logger.info("Reactor", "emitted during flush");
        assert_eq!(logger.get_logs(None).len(), 1);

        gate_tx.send(()).unwrap();
        drop(gate_tx);
        assert!(flusher.join().expect("flush thread panicked").is_ok());
    }
}
