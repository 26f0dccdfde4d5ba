//! Durable slot implementations

pub mod background;
pub mod memory;

#[cfg(feature = "file")]
pub mod file;

pub use background::BackgroundSlot;
pub use memory::MemorySlot;

#[cfg(feature = "file")]
pub use file::FileSlot;

// Re-export the trait next to its implementations
pub use crate::core::{DurableSlot, DEFAULT_SLOT_KEY};
