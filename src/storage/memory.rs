//! In-memory slot store
//!
//! Process-local slots with an optional byte quota, in the manner of a
//! browser's local storage.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;

use crate::error::{CatalogError, Result};
use super::{validate_slot_name, SlotStore};

/// Slot store kept entirely in memory
///
/// ## Concurrency:
/// - `slots`: Protected by RwLock so the store works through `&self`
/// - `available`: Atomic flag, checked before every operation
pub struct MemoryStore {
    /// Slot name → stored text
    slots: RwLock<HashMap<String, String>>,

    /// Upper bound on the summed byte length of all stored values
    quota: Option<usize>,

    /// When false every operation fails with a storage error
    available: AtomicBool,
}

impl MemoryStore {
    /// Create an empty store without a quota
    pub fn new() -> Self {
        Self {
            slots: RwLock::new(HashMap::new()),
            quota: None,
            available: AtomicBool::new(true),
        }
    }

    /// Create an empty store holding at most `bytes` of slot data
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            quota: Some(bytes),
            ..Self::new()
        }
    }

    /// Switch the backend on or off
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Summed byte length of all stored values
    pub fn used_bytes(&self) -> usize {
        self.slots.read().values().map(String::len).sum()
    }

    /// Number of non-empty slots
    pub fn slot_count(&self) -> usize {
        self.slots.read().len()
    }

    fn check_available(&self) -> Result<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(CatalogError::Storage("storage backend unavailable".to_string()))
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SlotStore for MemoryStore {
    fn load(&self, slot: &str) -> Result<Option<String>> {
        self.check_available()?;
        validate_slot_name(slot)?;
        Ok(self.slots.read().get(slot).cloned())
    }

    fn save(&self, slot: &str, data: &str) -> Result<()> {
        self.check_available()?;
        validate_slot_name(slot)?;

        let mut slots = self.slots.write();

        if let Some(quota) = self.quota {
            let used: usize = slots.values().map(String::len).sum();
            let replaced = slots.get(slot).map(String::len).unwrap_or(0);
            let needed = used - replaced + data.len();
            if needed > quota {
                return Err(CatalogError::Storage(format!(
                    "quota exceeded: slot {} needs {} bytes, quota is {}",
                    slot, needed, quota
                )));
            }
        }

        slots.insert(slot.to_string(), data.to_string());
        Ok(())
    }

    fn remove(&self, slot: &str) -> Result<()> {
        self.check_available()?;
        validate_slot_name(slot)?;
        self.slots.write().remove(slot);
        Ok(())
    }

    fn rename(&self, from: &str, to: &str) -> Result<()> {
        self.check_available()?;
        validate_slot_name(from)?;
        validate_slot_name(to)?;

        let mut slots = self.slots.write();
        if let Some(value) = slots.remove(from) {
            slots.insert(to.to_string(), value);
        }
        Ok(())
    }
}
