//! Catalog codec
//!
//! Encoding and decoding of the persisted catalog text.
//!
//! ## Format
//! A JSON array of `[isbn, record]` pairs, in catalog order:
//! ```text
//! [
//!   ["978-1", {"isbn":"978-1","title":"Dune","author":"Frank Herbert","year":1965,"available":true}],
//!   ...
//! ]
//! ```
//!
//! ## Decode Policy
//! The whole payload is rejected on the first bad entry:
//! - not JSON, or not an array of two-element `[string, object]` arrays
//! - record missing a field, carrying an unknown field, or a field of the wrong type
//! - pair key different from the record's `isbn`
//! - empty or repeated `isbn`

use serde_json::Value;

use crate::error::{CatalogError, Result};
use super::{BookRecord, Catalog};

/// Encode a catalog as JSON text
pub fn encode(catalog: &Catalog) -> Result<String> {
    let pairs: Vec<(&str, &BookRecord)> = catalog
        .iter()
        .map(|record| (record.isbn.as_str(), record))
        .collect();

    Ok(serde_json::to_string(&pairs)?)
}

/// Decode JSON text produced by `encode`
pub fn decode(data: &str) -> Result<Catalog> {
    let entries: Vec<Value> = serde_json::from_str(data)
        .map_err(|e| CatalogError::Parse(format!("catalog is not a JSON array: {}", e)))?;

    let mut catalog = Catalog::new();

    for (index, entry) in entries.into_iter().enumerate() {
        let (key, record): (String, BookRecord) = serde_json::from_value(entry)
            .map_err(|e| CatalogError::Parse(format!("entry {}: {}", index, e)))?;

        if key != record.isbn {
            return Err(CatalogError::Parse(format!(
                "entry {}: key {:?} does not match isbn {:?}",
                index, key, record.isbn
            )));
        }

        catalog.add(record).map_err(|e| match e {
            CatalogError::DuplicateKey(isbn) => {
                CatalogError::Parse(format!("entry {}: duplicate isbn {:?}", index, isbn))
            }
            CatalogError::InvalidRecord(msg) => {
                CatalogError::Parse(format!("entry {}: {}", index, msg))
            }
            other => other,
        })?;
    }

    Ok(catalog)
}
