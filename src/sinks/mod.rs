//! Console-style sink implementations

pub mod capture;
pub mod console;

pub use capture::CaptureSink;
pub use console::ConsoleSink;

// Re-export the trait next to its implementations
pub use crate::core::Sink;
