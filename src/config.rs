//! Configuration for Bookshelf
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::error::{CatalogError, Result};
use crate::storage::validate_slot_name;

/// Main configuration for a Bookshelf library
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Root directory for slot files (used by `FileStore`)
    /// Internal structure:
    ///   {data_dir}/
    ///     ├── {slot_name}.slot          (serialized catalog)
    ///     └── {slot_name}.corrupt.slot  (quarantined unreadable catalog, if any)
    pub data_dir: PathBuf,

    /// Name of the storage slot holding the serialized catalog
    pub slot_name: String,

    /// fsync every slot write before it replaces the previous one
    pub sync_writes: bool,

    // -------------------------------------------------------------------------
    // Load Configuration
    // -------------------------------------------------------------------------
    /// Move undecodable slot contents aside before they can be overwritten
    pub quarantine_corrupt: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./bookshelf_data"),
            slot_name: "library_catalog".to_string(),
            sync_writes: true,
            quarantine_corrupt: true,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check that the configured values are usable
    pub fn validate(&self) -> Result<()> {
        validate_slot_name(&self.slot_name)
            .map_err(|_| CatalogError::Config(format!("invalid slot name {:?}", self.slot_name)))
    }

    /// Slot that receives undecodable contents of `slot_name`
    pub fn quarantine_slot(&self) -> String {
        format!("{}.corrupt", self.slot_name)
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the data directory (root for slot files)
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_dir = path.into();
        self
    }

    /// Set the slot name
    pub fn slot_name(mut self, name: impl Into<String>) -> Self {
        self.config.slot_name = name.into();
        self
    }

    /// Enable or disable fsync on every write
    pub fn sync_writes(mut self, enabled: bool) -> Self {
        self.config.sync_writes = enabled;
        self
    }

    /// Enable or disable quarantining of undecodable slots
    pub fn quarantine_corrupt(mut self, enabled: bool) -> Self {
        self.config.quarantine_corrupt = enabled;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
