//! Library Module
//!
//! Controller that owns one catalog and the store it persists to.
//!
//! ## Responsibilities
//! - Load the catalog from its slot on startup
//! - Apply user intents to the catalog
//! - Write the catalog back after every mutation
//! - Keep memory and storage consistent when a write fails

use crate::catalog::{BookRecord, Catalog, NewBook, SearchField};
use crate::config::Config;
use crate::error::{CatalogError, Result};
use crate::intent::{Intent, Outcome};
use crate::storage::SlotStore;

/// What happened when the catalog slot was read at startup
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Number of records in the catalog after loading
    pub records_loaded: usize,

    /// Why the stored catalog was discarded, if it was
    pub rejected: Option<CatalogError>,

    /// Whether the discarded slot was moved to the quarantine slot
    pub quarantined: bool,
}

/// A catalog bound to its persistence slot
///
/// ## Write Path
/// Every mutation runs: catalog change → serialize → store save.
/// If the save fails the catalog change is undone before the error is
/// returned, so the in-memory catalog always matches the last successful write.
pub struct Library<S: SlotStore> {
    /// Library configuration
    config: Config,

    /// In-memory catalog
    catalog: Catalog,

    /// Persistence backend
    store: S,

    /// Outcome of the startup load
    load_report: LoadReport,
}

impl<S: SlotStore> Library<S> {
    /// Open the library stored in `config.slot_name`
    ///
    /// On startup:
    /// 1. Validate config
    /// 2. Read the slot (a backend failure aborts with a storage error)
    /// 3. Decode it; a slot that fails verification or decoding is discarded
    ///    in favour of an empty catalog, reported in `load_report()`, and
    ///    optionally moved to the quarantine slot
    pub fn open(store: S, config: Config) -> Result<Self> {
        config.validate()?;

        let mut load_report = LoadReport::default();

        let loaded = match store.load(&config.slot_name) {
            Ok(None) => {
                tracing::info!("Slot {} is empty, starting a new catalog", config.slot_name);
                Ok(Catalog::new())
            }
            Ok(Some(text)) => Catalog::deserialize(&text),
            Err(e) => Err(e),
        };

        let catalog = match loaded {
            Ok(catalog) => catalog,
            Err(e) if e.is_corrupt_data() => {
                tracing::warn!(
                    "Discarding unreadable catalog in slot {}: {}",
                    config.slot_name,
                    e
                );
                if config.quarantine_corrupt {
                    load_report.quarantined = Self::quarantine(&store, &config);
                }
                load_report.rejected = Some(e);
                Catalog::new()
            }
            Err(e) => return Err(e),
        };

        load_report.records_loaded = catalog.len();
        tracing::info!(
            "Opened catalog from slot {}: {} records",
            config.slot_name,
            load_report.records_loaded
        );

        Ok(Self {
            config,
            catalog,
            store,
            load_report,
        })
    }

    fn quarantine(store: &S, config: &Config) -> bool {
        let target = config.quarantine_slot();
        match store.rename(&config.slot_name, &target) {
            Ok(()) => {
                tracing::warn!("Moved unreadable catalog to slot {}", target);
                true
            }
            Err(e) => {
                tracing::warn!("Could not quarantine unreadable catalog to {}: {}", target, e);
                false
            }
        }
    }

    /// Handle an intent
    pub fn execute(&mut self, intent: Intent) -> Result<Outcome> {
        tracing::trace!("Executing intent {:?}", intent);

        match intent {
            Intent::Add(book) => self.add(book).map(Outcome::Added),
            Intent::Remove { isbn } => self.remove(&isbn).map(Outcome::Removed),
            Intent::Toggle { isbn } => self.toggle_availability(&isbn).map(Outcome::Toggled),
            Intent::Search { field, term } => Ok(Outcome::Records(self.search(field, &term))),
            Intent::Get { isbn } => Ok(Outcome::Record(self.get_by_id(&isbn))),
            Intent::ListAll => Ok(Outcome::Records(self.list_all())),
        }
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Register a book and persist
    pub fn add(&mut self, book: NewBook) -> Result<BookRecord> {
        let record = book.into_record();
        self.catalog.add(record.clone())?;

        if let Err(e) = self.save() {
            let _ = self.catalog.remove(&record.isbn);
            tracing::warn!("Rolled back add of {}: {}", record.isbn, e);
            return Err(e);
        }

        tracing::debug!("Added {} ({})", record.isbn, record.title);
        Ok(record)
    }

    /// Delete a book and persist
    pub fn remove(&mut self, isbn: &str) -> Result<BookRecord> {
        let index = self.catalog.position(isbn);
        let removed = self.catalog.remove(isbn)?;

        if let Err(e) = self.save() {
            let index = index.unwrap_or_else(|| self.catalog.len());
            self.catalog.restore(index, removed);
            tracing::warn!("Rolled back removal of {}: {}", isbn, e);
            return Err(e);
        }

        tracing::debug!("Removed {}", isbn);
        Ok(removed)
    }

    /// Lend or return a book and persist
    pub fn toggle_availability(&mut self, isbn: &str) -> Result<BookRecord> {
        let updated = self.catalog.toggle_availability(isbn)?;

        if let Err(e) = self.save() {
            let _ = self.catalog.toggle_availability(isbn);
            tracing::warn!("Rolled back status change of {}: {}", isbn, e);
            return Err(e);
        }

        tracing::debug!("Toggled {} (available={})", isbn, updated.available);
        Ok(updated)
    }

    /// Write the current catalog to its slot
    pub fn save(&self) -> Result<()> {
        let data = self.catalog.serialize()?;
        self.store.save(&self.config.slot_name, &data)?;
        tracing::debug!(
            "Persisted {} records to slot {}",
            self.catalog.len(),
            self.config.slot_name
        );
        Ok(())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn get_by_id(&self, isbn: &str) -> Option<BookRecord> {
        self.catalog.get_by_id(isbn)
    }

    pub fn search_by_title(&self, term: &str) -> Vec<BookRecord> {
        self.catalog.search_by_title(term)
    }

    pub fn search_by_author(&self, term: &str) -> Vec<BookRecord> {
        self.catalog.search_by_author(term)
    }

    pub fn search(&self, field: SearchField, term: &str) -> Vec<BookRecord> {
        self.catalog.search(field, term)
    }

    pub fn list_all(&self) -> Vec<BookRecord> {
        self.catalog.list_all()
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The in-memory catalog
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The persistence backend
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// How the startup load went
    pub fn load_report(&self) -> &LoadReport {
        &self.load_report
    }

    /// Split into catalog and store
    pub fn into_parts(self) -> (Catalog, S) {
        (self.catalog, self.store)
    }
}
