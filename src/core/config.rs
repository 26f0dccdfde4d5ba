//! Logger configuration

use super::durable_slot::DEFAULT_SLOT_KEY;
use super::error::{LoggerError, Result};
use super::log_level::LogLevel;
use super::overlay::DEFAULT_OVERLAY_CAPACITY;
use serde::{Deserialize, Serialize};

/// Deployment flavour the host was built for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    Development,
    Production,
}

impl BuildMode {
    /// Debug builds count as development
    pub fn detect() -> Self {
        if cfg!(debug_assertions) {
            BuildMode::Development
        } else {
            BuildMode::Production
        }
    }
}

/// Sink toggles and capacities for one logger instance.
///
/// Every field has a default, so a partial JSON document is a valid config.
///
/// # Example
///
/// ```
/// use factory_diagnostics::{LoggerConfig, LogLevel};
///
/// let config = LoggerConfig::from_json_str(r#"{"threshold": "WARN", "maxRetained": 200}"#).unwrap();
/// assert_eq!(config.threshold, LogLevel::Warn);
/// assert_eq!(config.max_retained, 200);
/// assert!(config.console_enabled);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoggerConfig {
    pub threshold: LogLevel,
    pub console_enabled: bool,
    pub persistence_enabled: bool,
    pub overlay_enabled: bool,
    /// Ring capacity in entries
    pub max_retained: usize,
    /// Newest entries mirrored into the durable slot
    pub max_persisted: usize,
    pub overlay_capacity: usize,
    pub slot_key: String,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            threshold: LogLevel::Info,
            console_enabled: true,
            persistence_enabled: true,
            overlay_enabled: false,
            max_retained: 1000,
            max_persisted: 100,
            overlay_capacity: DEFAULT_OVERLAY_CAPACITY,
            slot_key: DEFAULT_SLOT_KEY.to_string(),
        }
    }
}

impl LoggerConfig {
    /// Development logs everything and shows the overlay; production starts
    /// at INFO with the overlay hidden.
    pub fn for_mode(mode: BuildMode) -> Self {
        match mode {
            BuildMode::Development => Self {
                threshold: LogLevel::Debug,
                overlay_enabled: true,
                ..Self::default()
            },
            BuildMode::Production => Self::default(),
        }
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_retained == 0 {
            return Err(LoggerError::config("LoggerConfig", "maxRetained must be at least 1"));
        }
        if self.max_persisted > self.max_retained {
            return Err(LoggerError::config(
                "LoggerConfig",
                format!(
                    "maxPersisted ({}) must not exceed maxRetained ({})",
                    self.max_persisted, self.max_retained
                ),
            ));
        }
        if self.overlay_capacity == 0 {
            return Err(LoggerError::config("LoggerConfig", "overlayCapacity must be at least 1"));
        }
        if self.slot_key.trim().is_empty() {
            return Err(LoggerError::config("LoggerConfig", "slotKey must not be empty"));
        }
        Ok(())
    }

    /// Clamp out-of-range values instead of rejecting them
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.max_retained = self.max_retained.max(1);
        self.max_persisted = self.max_persisted.min(self.max_retained);
        self.overlay_capacity = self.overlay_capacity.max(1);
        if self.slot_key.trim().is_empty() {
            self.slot_key = DEFAULT_SLOT_KEY.to_string();
        }
        self
    }
}
