//! Storage Module
//!
//! Synchronous string-keyed slot storage for the serialized catalog.
//!
//! ## Responsibilities
//! - Hold one string value per named slot
//! - Report backend failures as `CatalogError::Storage`
//! - Report unverifiable stored bytes as `CatalogError::Corrupt` (file backend)
//! - Move a slot aside without reading it, so damaged data can be kept
//!
//! ## Slot File Format (FileStore)
//! ```text
//! ┌──────────┬───────────┬──────────┬──────────┬───────────────────┐
//! │Magic (4) │Version (2)│  Len (4) │ CRC32 (4)│  Payload (UTF-8)  │
//! └──────────┴───────────┴──────────┴──────────┴───────────────────┘
//! ```
//! All integers little-endian. The CRC covers the payload only.

mod file;
mod memory;

pub use file::{FileStore, HEADER_SIZE, MAGIC};
pub use memory::MemoryStore;

use crate::error::{CatalogError, Result};

/// A synchronous key-value store of string slots
pub trait SlotStore {
    /// Read a slot; `None` if nothing was ever saved there
    fn load(&self, slot: &str) -> Result<Option<String>>;

    /// Replace the contents of a slot
    fn save(&self, slot: &str, data: &str) -> Result<()>;

    /// Clear a slot; clearing an empty slot succeeds
    fn remove(&self, slot: &str) -> Result<()>;

    /// Move the contents of `from` into `to`, replacing `to`
    ///
    /// Moving an empty slot succeeds and leaves `to` as it was.
    fn rename(&self, from: &str, to: &str) -> Result<()>;
}

impl<S: SlotStore + ?Sized> SlotStore for &S {
    fn load(&self, slot: &str) -> Result<Option<String>> {
        (**self).load(slot)
    }

    fn save(&self, slot: &str, data: &str) -> Result<()> {
        (**self).save(slot, data)
    }

    fn remove(&self, slot: &str) -> Result<()> {
        (**self).remove(slot)
    }

    fn rename(&self, from: &str, to: &str) -> Result<()> {
        (**self).rename(from, to)
    }
}

impl<S: SlotStore + ?Sized> SlotStore for Box<S> {
    fn load(&self, slot: &str) -> Result<Option<String>> {
        (**self).load(slot)
    }

    fn save(&self, slot: &str, data: &str) -> Result<()> {
        (**self).save(slot, data)
    }

    fn remove(&self, slot: &str) -> Result<()> {
        (**self).remove(slot)
    }

    fn rename(&self, from: &str, to: &str) -> Result<()> {
        (**self).rename(from, to)
    }
}

/// Slot names: non-empty, `[A-Za-z0-9_.-]`, no leading dot
pub fn validate_slot_name(slot: &str) -> Result<()> {
    let valid = !slot.is_empty()
        && !slot.starts_with('.')
        && slot
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));

    if valid {
        Ok(())
    } else {
        Err(CatalogError::Storage(format!("invalid slot name {:?}", slot)))
    }
}
