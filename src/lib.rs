//! # Bookshelf
//!
//! A small library catalog manager with:
//! - ISBN-keyed catalog with stable insertion order
//! - Case-insensitive title and author search
//! - Loan status toggling
//! - Single-slot persistence with checksummed files
//! - Rollback of in-memory changes when a write fails
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     View (CLI, GUI, ...)                    │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ Intent / Outcome
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                         Library                             │
//! │             (load on open, save after mutation)             │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │   Catalog   │          │  SlotStore  │
//!   │ (IndexMap)  │          │ (file/mem)  │
//!   └──────┬──────┘          └─────────────┘
//!          │ serialize / deserialize
//!          ▼
//!   ┌─────────────┐
//!   │    Codec    │
//!   │   (JSON)    │
//!   └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod catalog;
pub mod storage;
pub mod intent;
pub mod library;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{CatalogError, Result};
pub use config::Config;
pub use catalog::{BookRecord, Catalog, NewBook, SearchField};
pub use intent::{Intent, Outcome};
pub use library::{Library, LoadReport};
pub use storage::{FileStore, MemoryStore, SlotStore};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of Bookshelf
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
