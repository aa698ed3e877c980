//! Intent definitions
//!
//! User actions a view hands to the library, and what comes back.

use crate::catalog::{BookRecord, NewBook, SearchField};

/// A user action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Register a book
    Add(NewBook),

    /// Delete a book by ISBN
    Remove { isbn: String },

    /// Lend or return a book
    Toggle { isbn: String },

    /// Search by one field
    Search { field: SearchField, term: String },

    /// Look up one book by ISBN
    Get { isbn: String },

    /// List every book
    ListAll,
}

impl Intent {
    /// True for intents that change the catalog
    pub fn is_mutation(&self) -> bool {
        matches!(self, Intent::Add(_) | Intent::Remove { .. } | Intent::Toggle { .. })
    }
}

/// The result of a successfully handled intent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The record as inserted
    Added(BookRecord),

    /// The record that was deleted
    Removed(BookRecord),

    /// The record after its status flipped
    Toggled(BookRecord),

    /// Search or listing results, in catalog order
    Records(Vec<BookRecord>),

    /// Single lookup result
    Record(Option<BookRecord>),
}

impl Outcome {
    /// Records to render for this outcome
    pub fn into_records(self) -> Vec<BookRecord> {
        match self {
            Outcome::Added(record) | Outcome::Removed(record) | Outcome::Toggled(record) => {
                vec![record]
            }
            Outcome::Records(records) => records,
            Outcome::Record(record) => record.into_iter().collect(),
        }
    }
}
