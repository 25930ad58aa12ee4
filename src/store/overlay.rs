use std::collections::BTreeMap;
use std::sync::Mutex;

use serde_json::Value;
use tracing::{debug, warn};

use super::KeyValueStorage;
use crate::error::{CatalogError, StorageError};
use crate::models::{is_character_id, CharacterRecord, LocalCharacterRecord};

/// Storage key holding the serialized overlay mapping.
pub const OVERLAY_KEY: &str = "starwars_characters";

/// Character id to locally edited record.
pub type OverlayMap = BTreeMap<String, LocalCharacterRecord>;

/// The stored mapping with entries left undecoded.
type RawOverlay = BTreeMap<String, Value>;

/// Persistent mapping from character id to the user's local edit.
///
/// Every record that enters the store is marked edited, whatever its flag was
/// on the way in. Reads are fail-soft: a missing or unparseable blob reads as
/// an empty mapping, and an entry that does not decode is skipped. Saves carry
/// such entries over untouched.
#[derive(Debug)]
pub struct OverlayStore<S> {
    storage: S,
    write_lock: Mutex<()>,
}

impl<S: KeyValueStorage> OverlayStore<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            write_lock: Mutex::new(()),
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Returns the stored edit for `id`, if any.
    pub fn get(&self, id: &str) -> Option<LocalCharacterRecord> {
        self.get_all().remove(id)
    }

    /// Returns the whole overlay mapping.
    pub fn get_all(&self) -> OverlayMap {
        let raw = match self.storage.get_item(OVERLAY_KEY) {
            Ok(Some(blob)) => Self::parse(&blob),
            Ok(None) => RawOverlay::new(),
            Err(e) => {
                warn!("overlay unreadable, treating as empty: {}", e);
                RawOverlay::new()
            }
        };

        raw.into_iter()
            .filter_map(|(id, entry)| match serde_json::from_value::<LocalCharacterRecord>(entry) {
                Ok(character) => Some((id, character)),
                Err(e) => {
                    warn!("skipping malformed overlay entry {}: {}", id, e);
                    None
                }
            })
            .collect()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get_all().contains_key(id)
    }

    /// Saves `record` as the edit for `id`, replacing any earlier edit in full.
    ///
    /// The read and the write happen under one lock with no suspension point
    /// in between, so concurrent saves within this process never interleave.
    /// Other entries are written back exactly as they were read, including
    /// ones [`OverlayStore::get_all`] skips.
    pub fn put(&self, id: &str, record: impl AsRef<CharacterRecord>) -> Result<(), CatalogError> {
        if !is_character_id(id) {
            return Err(CatalogError::MissingIdentifier);
        }

        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());

        let mut characters = match self.storage.get_item(OVERLAY_KEY)? {
            Some(blob) => Self::parse(&blob),
            None => RawOverlay::new(),
        };
        let entry = LocalCharacterRecord::edited(record.as_ref().clone());
        characters.insert(
            id.to_string(),
            serde_json::to_value(entry).map_err(StorageError::from)?,
        );

        let blob = serde_json::to_string(&characters).map_err(StorageError::from)?;
        self.storage.set_item(OVERLAY_KEY, &blob)?;
        debug!("saved overlay entry {} ({} total)", id, characters.len());

        Ok(())
    }

    /// Parses the blob as a JSON object; anything else reads as empty.
    fn parse(blob: &str) -> RawOverlay {
        match serde_json::from_str::<RawOverlay>(blob) {
            Ok(characters) => characters,
            Err(e) => {
                warn!("overlay is malformed, treating as empty: {}", e);
                RawOverlay::new()
            }
        }
    }
}
