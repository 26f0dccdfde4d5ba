//! Timestamp formatting and the entry clock
//!
//! Provides the console timestamp formats, the fixed-width sortable form used
//! in durable snapshots and exports, and a clock whose readings never go
//! backwards.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Timestamp rendering options for console output
///
/// # Examples
///
/// ```
/// use factory_diagnostics::core::TimestampFormat;
/// use chrono::Utc;
///
/// let format = TimestampFormat::Iso8601;
/// let timestamp = format.format(&Utc::now());
/// assert!(timestamp.ends_with('Z'));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// ISO 8601 with milliseconds: `2025-01-08T10:30:45.123Z`
    #[default]
    Iso8601,

    /// ISO 8601 with microseconds: `2025-01-08T10:30:45.123456Z`
    ///
    /// Same text as the persisted form, so it sorts lexically.
    Iso8601Micros,

    /// RFC 3339 format: `2025-01-08T10:30:45.123456+00:00`
    Rfc3339,

    /// Unix timestamp in milliseconds: `1736332245123`
    UnixMillis,

    /// Custom strftime format
    Custom(String),
}

impl TimestampFormat {
    #[must_use]
    pub fn format(&self, datetime: &DateTime<Utc>) -> String {
        match self {
            TimestampFormat::Iso8601 => datetime.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
            TimestampFormat::Iso8601Micros => sortable::to_text(datetime),
            TimestampFormat::Rfc3339 => datetime.to_rfc3339(),
            TimestampFormat::UnixMillis => datetime.timestamp_millis().to_string(),
            TimestampFormat::Custom(format_str) => datetime.format(format_str).to_string(),
        }
    }
}

/// Serde adapter for the fixed-width `YYYY-MM-DDTHH:MM:SS.ffffffZ` form.
///
/// Any RFC 3339 timestamp is accepted on input.
pub mod sortable {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";

    pub fn to_text(datetime: &DateTime<Utc>) -> String {
        datetime.format(FORMAT).to_string()
    }

    pub fn parse(text: &str) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(text.trim())
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    pub fn serialize<S: Serializer>(datetime: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&to_text(datetime))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let text = String::deserialize(deserializer)?;
        parse(&text).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: '{}'", text)))
    }
}

type TimeSource = Box<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Wall clock clamped to be non-decreasing.
///
/// Readings are truncated to microseconds so they survive the persisted text
/// form unchanged.
pub struct MonotonicClock {
    source: TimeSource,
    last: Option<DateTime<Utc>>,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self::with_source(Utc::now)
    }

    /// Clock reading from a caller-supplied source (fixed or simulated time)
    pub fn with_source<F>(source: F) -> Self
    where
        F: Fn() -> DateTime<Utc> + Send + Sync + 'static,
    {
        Self {
            source: Box::new(source),
            last: None,
        }
    }

    pub fn now(&mut self) -> DateTime<Utc> {
        let reading = (self.source)().trunc_subsecs(6);
        let stamped = match self.last {
            Some(last) if reading < last => last,
            _ => reading,
        };
        self.last = Some(stamped);
        stamped
    }

    /// Raise the floor so later readings are not older than `floor`
    pub fn advance_to(&mut self, floor: DateTime<Utc>) {
        if self.last.is_none_or(|last| last < floor) {
            self.last = Some(floor);
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MonotonicClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MonotonicClock").field("last", &self.last).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use std::sync::atomic::{AtomicI64, Ordering};
    use std::sync::Arc;

    fn fixed_datetime() -> DateTime<Utc> {
        // 2025-01-08 10:30:45.123456 UTC
        Utc.with_ymd_and_hms(2025, 1, 8, 10, 30, 45)
            .single()
            .expect("valid datetime")
            + Duration::microseconds(123456)
    }

    #[test]
    fn test_iso8601_format() {
        let result = TimestampFormat::Iso8601.format(&fixed_datetime());
        assert_eq!(result, "2025-01-08T10:30:45.123Z");
    }

    #[test]
    fn test_iso8601_micros_format() {
        let result = TimestampFormat::Iso8601Micros.format(&fixed_datetime());
        assert_eq!(result, "2025-01-08T10:30:45.123456Z");
    }

    #[test]
    fn test_custom_format() {
        let format = TimestampFormat::Custom("%Y/%m/%d %H:%M".to_string());
        assert_eq!(format.format(&fixed_datetime()), "2025/01/08 10:30");
    }

    #[test]
    fn test_sortable_text_orders_lexically() {
        let earlier = fixed_datetime();
        let later = earlier + Duration::milliseconds(900);
        let a = sortable::to_text(&earlier);
        let b = sortable::to_text(&later);
        assert_eq!(a.len(), b.len());
        assert!(a < b);
    }

    #[test]
    fn test_sortable_parse_accepts_rfc3339() {
        let parsed = sortable::parse("2025-01-08T10:30:45.123456+00:00").expect("parse");
        assert_eq!(parsed, fixed_datetime());
        assert!(sortable::parse("yesterday").is_none());
    }

    #[test]
    fn test_clock_never_goes_backwards() {
        let offset = Arc::new(AtomicI64::new(0));
        let source_offset = Arc::clone(&offset);
        let base = fixed_datetime();
        let mut clock = MonotonicClock::with_source(move || {
            base + Duration::milliseconds(source_offset.load(Ordering::SeqCst))
        });

        offset.store(500, Ordering::SeqCst);
        let first = clock.now();
        offset.store(-2_000, Ordering::SeqCst);
        let second = clock.now();
        assert_eq!(second, first);

        offset.store(1_000, Ordering::SeqCst);
        assert!(clock.now() > first);
    }

    #[test]
    fn test_clock_truncates_to_micros() {
        let base = fixed_datetime() + Duration::nanoseconds(789);
        let mut clock = MonotonicClock::with_source(move || base);
        assert_eq!(clock.now(), fixed_datetime());
    }

    #[test]
    fn test_clock_advance_to_floor() {
        let base = fixed_datetime();
        let mut clock = MonotonicClock::with_source(move || base);
        let floor = base + Duration::seconds(10);
        clock.advance_to(floor);
        assert_eq!(clock.now(), floor);
    }
}
