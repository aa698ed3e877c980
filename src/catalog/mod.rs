//! Catalog Module
//!
//! In-memory collection of book records keyed by ISBN.
//!
//! ## Responsibilities
//! - Enforce ISBN uniqueness on insert
//! - O(1) lookup by ISBN
//! - Linear, case-insensitive search over title and author
//! - Stable listing in insertion order
//! - Conversion to and from the persisted text form (see `codec`)
//!
//! ## Data Structure Choice
//! `IndexMap<String, BookRecord>`:
//! - Hash lookup by key
//! - Iteration follows insertion order
//! - `shift_remove` keeps the order of the remaining records

mod codec;
mod table;

pub use codec::{decode, encode};
pub use table::Catalog;

use serde::{Deserialize, Serialize};

/// A single catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BookRecord {
    /// Unique identifier, never empty
    pub isbn: String,

    pub title: String,

    pub author: String,

    /// Publication year
    pub year: i32,

    /// False while the book is on loan
    pub available: bool,
}

impl BookRecord {
    /// Create a record that is available for loan
    pub fn new(
        isbn: impl Into<String>,
        title: impl Into<String>,
        author: impl Into<String>,
        year: i32,
    ) -> Self {
        Self {
            isbn: isbn.into(),
            title: title.into(),
            author: author.into(),
            year,
            available: true,
        }
    }
}

/// Fields a view supplies when registering a book
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub year: i32,
}

impl NewBook {
    pub fn new(
        isbn: impl Into<String>,
        title: impl Into<String>,
        author: impl Into<String>,
        year: i32,
    ) -> Self {
        Self {
            isbn: isbn.into(),
            title: title.into(),
            author: author.into(),
            year,
        }
    }

    /// Build the record to insert (text fields trimmed, available)
    pub fn into_record(self) -> BookRecord {
        BookRecord::new(
            self.isbn.trim(),
            self.title.trim(),
            self.author.trim(),
            self.year,
        )
    }
}

/// Which field a search matches against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    /// Exact ISBN lookup
    Id,

    /// Case-insensitive substring of the title
    Title,

    /// Case-insensitive substring of the author
    Author,
}
