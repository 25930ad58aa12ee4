//! Holocron
//!
//! A read-only Star Wars character catalog with local edits layered on top.
//! Remote pages come from a SWAPI-compatible server; edits are kept in a
//! local overlay store and win over remote data when a single character is
//! looked up.

pub mod catalog;
pub mod error;
pub mod models;
pub mod navigation;
pub mod remote;
pub mod store;

pub use catalog::{Catalog, CharacterListing, CharacterView, EditMode, EditSession, ListEntry};
pub use error::{CatalogError, Resource, StorageError};
pub use models::{
    extract_id, is_character_id, CharacterField, CharacterRecord, LocalCharacterRecord, Page,
    PAGE_SIZE,
};
pub use navigation::{ListQuery, NavigationGuard, Route, Ticket};
pub use remote::{CharacterSource, SwapiClient, DEFAULT_API_URL};
pub use store::{FileStorage, KeyValueStorage, MemoryStorage, OverlayMap, OverlayStore};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
