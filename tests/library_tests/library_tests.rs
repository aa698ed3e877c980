//! Tests for Library
//!
//! These tests verify:
//! - Startup load from an empty, valid or corrupt slot
//! - Write-back after every mutation
//! - Rollback when the store rejects a write
//! - Persistence across reopen with a file store

use bookshelf::storage::{FileStore, MemoryStore, SlotStore};
use bookshelf::{BookRecord, Catalog, CatalogError, Config, Library, NewBook};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn memory_config() -> Config {
    Config::builder().slot_name("test_catalog").build()
}

fn setup_temp_library() -> (TempDir, Library<FileStore>) {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder()
        .data_dir(temp_dir.path())
        .sync_writes(true)
        .build();
    let store = FileStore::from_config(&config).unwrap();
    let library = Library::open(store, config).unwrap();
    (temp_dir, library)
}

fn reopen(temp_dir: &TempDir) -> Library<FileStore> {
    let config = Config::builder().data_dir(temp_dir.path()).build();
    let store = FileStore::from_config(&config).unwrap();
    Library::open(store, config).unwrap()
}

fn dune() -> NewBook {
    NewBook::new("978-1", "Dune", "Frank Herbert", 1965)
}

fn stored_catalog(store: &MemoryStore) -> Catalog {
    let text = store.load("test_catalog").unwrap().unwrap();
    Catalog::deserialize(&text).unwrap()
}

// =============================================================================
// Open Tests
// =============================================================================

#[test]
fn test_open_empty_slot() {
    let store = MemoryStore::new();
    let library = Library::open(&store, memory_config()).unwrap();

    assert!(library.catalog().is_empty());
    assert_eq!(library.load_report().records_loaded, 0);
    assert!(library.load_report().rejected.is_none());
    // Opening alone does not write anything.
    assert_eq!(store.slot_count(), 0);
}

#[test]
fn test_open_loads_existing_catalog() {
    let mut catalog = Catalog::new();
    catalog.add(BookRecord::new("1", "The Hobbit", "J.R.R. Tolkien", 1937)).unwrap();
    catalog.add(BookRecord::new("2", "Dune", "Frank Herbert", 1965)).unwrap();

    let store = MemoryStore::new();
    store.save("test_catalog", &catalog.serialize().unwrap()).unwrap();

    let library = Library::open(&store, memory_config()).unwrap();

    assert_eq!(library.catalog(), &catalog);
    assert_eq!(library.load_report().records_loaded, 2);
}

#[test]
fn test_open_corrupt_slot_starts_empty_and_quarantines() {
    let store = MemoryStore::new();
    store.save("test_catalog", "{not valid").unwrap();

    let library = Library::open(&store, memory_config()).unwrap();

    let report = library.load_report();
    assert!(library.catalog().is_empty());
    assert!(matches!(report.rejected, Some(CatalogError::Parse(_))));
    assert!(report.quarantined);
    assert_eq!(
        store.load("test_catalog.corrupt").unwrap(),
        Some("{not valid".to_string())
    );
    assert_eq!(store.load("test_catalog").unwrap(), None);
}

#[test]
fn test_open_corrupt_slot_without_quarantine() {
    let store = MemoryStore::new();
    store.save("test_catalog", "[[\"1\",{\"isbn\":\"1\"}]]").unwrap();

    let config = Config::builder()
        .slot_name("test_catalog")
        .quarantine_corrupt(false)
        .build();
    let library = Library::open(&store, config).unwrap();

    assert!(library.load_report().rejected.is_some());
    assert!(!library.load_report().quarantined);
    assert_eq!(store.load("test_catalog.corrupt").unwrap(), None);
    // Without quarantine the slot stays until the next mutation replaces it.
    assert!(store.load("test_catalog").unwrap().is_some());
}

#[test]
fn test_open_fails_when_store_unavailable() {
    let store = MemoryStore::new();
    store.set_available(false);

    let result = Library::open(&store, memory_config());

    assert!(matches!(result, Err(CatalogError::Storage(_))));
}

#[test]
fn test_open_rejects_invalid_config() {
    let store = MemoryStore::new();
    let config = Config::builder().slot_name("bad/slot").build();

    assert!(matches!(Library::open(&store, config), Err(CatalogError::Config(_))));
}

#[test]
fn test_mutation_after_corrupt_load_overwrites_slot() {
    let store = MemoryStore::new();
    store.save("test_catalog", "garbage").unwrap();

    let mut library = Library::open(&store, memory_config()).unwrap();
    library.add(dune()).unwrap();

    assert_eq!(stored_catalog(&store).len(), 1);
    assert_eq!(store.load("test_catalog.corrupt").unwrap(), Some("garbage".to_string()));
}

// =============================================================================
// Write-Back Tests
// =============================================================================

#[test]
fn test_add_persists() {
    let store = MemoryStore::new();
    let mut library = Library::open(&store, memory_config()).unwrap();

    let record = library.add(dune()).unwrap();

    assert!(record.available);
    assert_eq!(stored_catalog(&store), *library.catalog());
}

#[test]
fn test_remove_persists() {
    let store = MemoryStore::new();
    let mut library = Library::open(&store, memory_config()).unwrap();
    library.add(dune()).unwrap();

    let removed = library.remove("978-1").unwrap();

    assert_eq!(removed.title, "Dune");
    assert!(stored_catalog(&store).is_empty());
}

#[test]
fn test_toggle_persists() {
    let store = MemoryStore::new();
    let mut library = Library::open(&store, memory_config()).unwrap();
    library.add(dune()).unwrap();

    library.toggle_availability("978-1").unwrap();

    assert!(!stored_catalog(&store).get_by_id("978-1").unwrap().available);
}

#[test]
fn test_failed_catalog_operation_does_not_write() {
    let store = MemoryStore::new();
    let mut library = Library::open(&store, memory_config()).unwrap();
    library.add(dune()).unwrap();
    let before = store.load("test_catalog").unwrap();

    assert!(library.add(dune()).unwrap_err().is_duplicate());
    assert!(library.remove("missing").unwrap_err().is_not_found());
    assert!(library.toggle_availability("missing").unwrap_err().is_not_found());

    assert_eq!(store.load("test_catalog").unwrap(), before);
}

#[test]
fn test_add_trims_input() {
    let store = MemoryStore::new();
    let mut library = Library::open(&store, memory_config()).unwrap();

    library.add(NewBook::new(" 978-1 ", "  Dune ", "Frank Herbert", 1965)).unwrap();

    let record = library.get_by_id("978-1").unwrap();
    assert_eq!(record.title, "Dune");
}

#[test]
fn test_add_blank_isbn_rejected() {
    let store = MemoryStore::new();
    let mut library = Library::open(&store, memory_config()).unwrap();

    let result = library.add(NewBook::new("   ", "Dune", "Frank Herbert", 1965));

    assert!(matches!(result, Err(CatalogError::InvalidRecord(_))));
    assert_eq!(store.slot_count(), 0);
}

// =============================================================================
// Rollback Tests
// =============================================================================

#[test]
fn test_add_rolls_back_when_store_fails() {
    let store = MemoryStore::new();
    let mut library = Library::open(&store, memory_config()).unwrap();

    store.set_available(false);
    let result = library.add(dune());

    assert!(matches!(result, Err(CatalogError::Storage(_))));
    assert!(library.catalog().is_empty());

    // Once storage is back the same add succeeds.
    store.set_available(true);
    library.add(dune()).unwrap();
    assert_eq!(library.catalog().len(), 1);
}

#[test]
fn test_remove_rolls_back_in_place() {
    let store = MemoryStore::new();
    let mut library = Library::open(&store, memory_config()).unwrap();
    library.add(NewBook::new("a", "A", "X", 1)).unwrap();
    library.add(NewBook::new("b", "B", "Y", 2)).unwrap();
    library.add(NewBook::new("c", "C", "Z", 3)).unwrap();
    let before = library.catalog().clone();

    store.set_available(false);
    assert!(library.remove("b").unwrap_err().is_storage());

    assert_eq!(library.catalog(), &before);
}

#[test]
fn test_toggle_rolls_back() {
    let store = MemoryStore::new();
    let mut library = Library::open(&store, memory_config()).unwrap();
    library.add(dune()).unwrap();

    store.set_available(false);
    assert!(library.toggle_availability("978-1").is_err());

    assert!(library.get_by_id("978-1").unwrap().available);
}

#[test]
fn test_quota_rollback_keeps_memory_and_storage_in_sync() {
    let store = MemoryStore::with_quota(200);
    let mut library = Library::open(&store, memory_config()).unwrap();
    library.add(dune()).unwrap();

    let long_title = "x".repeat(500);
    let result = library.add(NewBook::new("978-2", long_title, "Someone", 2000));

    assert!(result.unwrap_err().is_storage());
    assert_eq!(stored_catalog(&store), *library.catalog());
    assert_eq!(library.catalog().len(), 1);
}

// =============================================================================
// File Store Lifecycle Tests
// =============================================================================

#[test]
fn test_state_survives_reopen() {
    let (temp_dir, mut library) = setup_temp_library();
    library.add(dune()).unwrap();
    library.add(NewBook::new("978-2", "The Hobbit", "J.R.R. Tolkien", 1937)).unwrap();
    library.toggle_availability("978-2").unwrap();
    let expected = library.catalog().clone();
    drop(library);

    let library = reopen(&temp_dir);

    assert_eq!(library.catalog(), &expected);
    assert_eq!(library.load_report().records_loaded, 2);
}

#[test]
fn test_checksum_failure_starts_empty_and_moves_file_aside() {
    let (temp_dir, mut library) = setup_temp_library();
    library.add(dune()).unwrap();
    let path = library.store().slot_path("library_catalog");
    drop(library);

    let mut bytes = std::fs::read(&path).unwrap();
    let last = bytes.len() - 2;
    bytes[last] ^= 0x20;
    std::fs::write(&path, &bytes).unwrap();

    let library = reopen(&temp_dir);

    assert!(library.catalog().is_empty());
    assert!(matches!(library.load_report().rejected, Some(CatalogError::Corrupt(_))));
    assert!(library.load_report().quarantined);
    assert!(!path.exists());
    let moved = library.store().slot_path("library_catalog.corrupt");
    assert_eq!(std::fs::read(moved).unwrap(), bytes);
}

#[test]
fn test_unreadable_data_dir_entry_fails_open() {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder().data_dir(temp_dir.path()).build();
    let store = FileStore::from_config(&config).unwrap();
    // A directory where the slot file should be cannot be read as a slot.
    std::fs::create_dir(store.slot_path("library_catalog")).unwrap();

    assert!(matches!(Library::open(store, config), Err(CatalogError::Storage(_))));
}

#[test]
fn test_explicit_save_and_into_parts() {
    let (_temp, mut library) = setup_temp_library();
    library.add(dune()).unwrap();
    library.save().unwrap();

    let (catalog, store) = library.into_parts();

    let text = store.load("library_catalog").unwrap().unwrap();
    assert_eq!(Catalog::deserialize(&text).unwrap(), catalog);
}
