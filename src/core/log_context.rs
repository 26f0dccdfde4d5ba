//! Environment snapshot attached to every entry
//!
//! This module provides:
//! - `EntryContext`: the snapshot stored on an entry
//! - `ContextProvider`: capability the host supplies to capture it
//! - `StaticContext` / `ProcessContext`: ready-made providers

use serde::{Deserialize, Serialize};

/// Where and by what an entry was produced, captured once at creation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryContext {
    /// Current origin identifier (page, route, executable + working dir)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    /// Agent string of the producing runtime
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,
}

impl EntryContext {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    #[must_use]
    pub fn with_agent(mut self, agent: impl Into<String>) -> Self {
        self.agent = Some(agent.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.origin.is_none() && self.agent.is_none()
    }
}

/// Capability that reads the host environment at entry-creation time.
///
/// Any `Fn() -> EntryContext` closure is a provider.
///
/// # Example
///
/// ```
/// use factory_diagnostics::core::{ContextProvider, EntryContext};
///
/// let provider = || EntryContext::new().with_origin("/reactors/7");
/// assert_eq!(provider.capture().origin.as_deref(), Some("/reactors/7"));
/// ```
pub trait ContextProvider: Send + Sync {
    fn capture(&self) -> EntryContext;
}

impl<F> ContextProvider for F
where
    F: Fn() -> EntryContext + Send + Sync,
{
    fn capture(&self) -> EntryContext {
        self()
    }
}

/// Provider that hands out the same snapshot every time
#[derive(Debug, Clone, Default)]
pub struct StaticContext(pub EntryContext);

impl ContextProvider for StaticContext {
    fn capture(&self) -> EntryContext {
        self.0.clone()
    }
}

/// Provider describing the running process.
///
/// Origin is the executable name plus the working directory at capture time;
/// agent names this crate, its version and the target platform.
#[derive(Debug, Clone)]
pub struct ProcessContext {
    agent: String,
}

impl ProcessContext {
    pub fn new() -> Self {
        Self {
            agent: format!(
                "{}/{} ({}; {})",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION"),
                std::env::consts::OS,
                std::env::consts::ARCH
            ),
        }
    }

    fn origin() -> Option<String> {
        let exe = std::env::current_exe()
            .ok()
            .and_then(|path| path.file_name().map(|name| name.to_string_lossy().into_owned()));
        let cwd = std::env::current_dir()
            .ok()
            .map(|dir| dir.display().to_string());

        match (exe, cwd) {
            (Some(exe), Some(cwd)) => Some(format!("{}@{}", exe, cwd)),
            (Some(exe), None) => Some(exe),
            (None, Some(cwd)) => Some(cwd),
            (None, None) => None,
        }
    }
}

impl Default for ProcessContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ContextProvider for ProcessContext {
    fn capture(&self) -> EntryContext {
        EntryContext {
            origin: Self::origin(),
            agent: Some(self.agent.clone()),
        }
    }
}
