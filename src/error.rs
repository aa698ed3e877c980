//! Error types for Bookshelf
//!
//! Provides a unified error type for catalog, codec and storage operations.

use thiserror::Error;

/// Result type alias using CatalogError
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Unified error type for Bookshelf operations
#[derive(Debug, Error)]
pub enum CatalogError {
    // -------------------------------------------------------------------------
    // Catalog Errors
    // -------------------------------------------------------------------------
    #[error("Duplicate ISBN: {0}")]
    DuplicateKey(String),

    #[error("Book not found: {0}")]
    NotFound(String),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    // -------------------------------------------------------------------------
    // Codec Errors
    // -------------------------------------------------------------------------
    #[error("Parse error: {0}")]
    Parse(String),

    // -------------------------------------------------------------------------
    // Storage Errors
    // -------------------------------------------------------------------------
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Corrupt slot: {0}")]
    Corrupt(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CatalogError {
    /// True for a lookup on an isbn that is not in the catalog
    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::NotFound(_))
    }

    /// True for an insert whose isbn already exists
    pub fn is_duplicate(&self) -> bool {
        matches!(self, CatalogError::DuplicateKey(_))
    }

    /// True when the persistence backend failed (including raw I/O)
    pub fn is_storage(&self) -> bool {
        matches!(self, CatalogError::Storage(_) | CatalogError::Io(_))
    }

    /// True when stored data could be read but not trusted or decoded
    pub fn is_corrupt_data(&self) -> bool {
        matches!(self, CatalogError::Parse(_) | CatalogError::Corrupt(_))
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::Parse(err.to_string())
    }
}
