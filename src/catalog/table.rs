//! Catalog implementation
//!
//! IndexMap-based catalog keyed by ISBN.

use indexmap::IndexMap;

use crate::error::{CatalogError, Result};
use super::{codec, BookRecord, SearchField};

/// Ordered collection of book records, unique by ISBN
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: IndexMap<String, BookRecord>,
}

impl Catalog {
    /// Create a new empty Catalog
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Insert a record
    ///
    /// Fails without touching the catalog when the ISBN is empty or already present.
    pub fn add(&mut self, record: BookRecord) -> Result<()> {
        if record.isbn.trim().is_empty() {
            return Err(CatalogError::InvalidRecord("isbn must not be empty".to_string()));
        }
        if self.records.contains_key(&record.isbn) {
            return Err(CatalogError::DuplicateKey(record.isbn));
        }

        self.records.insert(record.isbn.clone(), record);
        Ok(())
    }

    /// Remove a record and return it
    ///
    /// Remaining records keep their relative order.
    pub fn remove(&mut self, isbn: &str) -> Result<BookRecord> {
        self.records
            .shift_remove(isbn)
            .ok_or_else(|| CatalogError::NotFound(isbn.to_string()))
    }

    /// Flip the loan status of a record and return the updated record
    pub fn toggle_availability(&mut self, isbn: &str) -> Result<BookRecord> {
        let record = self
            .records
            .get_mut(isbn)
            .ok_or_else(|| CatalogError::NotFound(isbn.to_string()))?;

        record.available = !record.available;
        Ok(record.clone())
    }

    /// Put a previously removed record back at its former position
    pub(crate) fn restore(&mut self, index: usize, record: BookRecord) {
        let index = index.min(self.records.len());
        self.records.shift_insert(index, record.isbn.clone(), record);
    }

    /// Position of a record in iteration order
    pub(crate) fn position(&self, isbn: &str) -> Option<usize> {
        self.records.get_index_of(isbn)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Lookup by ISBN
    pub fn get_by_id(&self, isbn: &str) -> Option<BookRecord> {
        self.records.get(isbn).cloned()
    }

    /// Records whose title contains `term`, ignoring case
    pub fn search_by_title(&self, term: &str) -> Vec<BookRecord> {
        self.filter_text(term, |record| &record.title)
    }

    /// Records whose author contains `term`, ignoring case
    pub fn search_by_author(&self, term: &str) -> Vec<BookRecord> {
        self.filter_text(term, |record| &record.author)
    }

    /// Search by the given field
    pub fn search(&self, field: SearchField, term: &str) -> Vec<BookRecord> {
        match field {
            SearchField::Id => self.get_by_id(term).into_iter().collect(),
            SearchField::Title => self.search_by_title(term),
            SearchField::Author => self.search_by_author(term),
        }
    }

    /// Every record in iteration order
    pub fn list_all(&self) -> Vec<BookRecord> {
        self.records.values().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BookRecord> {
        self.records.values()
    }

    pub fn contains(&self, isbn: &str) -> bool {
        self.records.contains_key(isbn)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn filter_text<F>(&self, term: &str, field: F) -> Vec<BookRecord>
    where
        F: Fn(&BookRecord) -> &String,
    {
        let needle = term.to_lowercase();
        self.records
            .values()
            .filter(|record| field(*record).to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// Encode as the persisted text form
    pub fn serialize(&self) -> Result<String> {
        codec::encode(self)
    }

    /// Rebuild a catalog from its persisted text form
    pub fn deserialize(data: &str) -> Result<Catalog> {
        codec::decode(data)
    }
}

// IndexMap equality ignores order; two catalogs are equal only with the same order.
impl PartialEq for Catalog {
    fn eq(&self, other: &Self) -> bool {
        self.records.len() == other.records.len()
            && self.records.iter().eq(other.records.iter())
    }
}

impl Eq for Catalog {}

impl FromIterator<BookRecord> for Catalog {
    /// Records with an empty ISBN, and later duplicates of an ISBN, are dropped
    fn from_iter<I: IntoIterator<Item = BookRecord>>(iter: I) -> Self {
        let mut catalog = Catalog::new();
        for record in iter {
            if !catalog.contains(&record.isbn) && !record.isbn.trim().is_empty() {
                catalog.records.insert(record.isbn.clone(), record);
            }
        }
        catalog
    }
}
