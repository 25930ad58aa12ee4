//! Local overlay storage.
//!
//! Edited characters live in a single JSON object keyed by character id,
//! persisted under one fixed key of a [`KeyValueStorage`]. The whole mapping
//! is read and rewritten on every save.
//!
//! Two storage backends are provided:
//! - [`FileStorage`]: one `<key>.json` file per key in the data directory
//! - [`MemoryStorage`]: in-process map, used by tests

mod file;
mod memory;
mod overlay;

pub use file::FileStorage;
pub use memory::MemoryStorage;
pub use overlay::{OverlayMap, OverlayStore, OVERLAY_KEY};

use crate::error::StorageError;

/// String key-value storage with whole-value reads and writes.
pub trait KeyValueStorage {
    /// Returns the value stored under `key`, or `Ok(None)` if there is none.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
}
