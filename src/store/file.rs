use std::fs;
use std::io;
use std::path::PathBuf;

use tracing::debug;

use super::KeyValueStorage;
use crate::error::StorageError;

/// Key-value storage backed by one JSON file per key.
#[derive(Clone, Debug)]
pub struct FileStorage {
    data_dir: PathBuf,
}

impl FileStorage {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    /// Returns the file path holding `key`.
    pub fn path(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!("{}.json", key))
    }
}

impl KeyValueStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path(key);

        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }

    /// Creates the data directory if it doesn't exist.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.data_dir).map_err(|source| StorageError::Io {
            path: self.data_dir.clone(),
            source,
        })?;

        let path = self.path(key);
        fs::write(&path, value).map_err(|source| StorageError::Io {
            path: path.clone(),
            source,
        })?;
        debug!("wrote {} bytes to {}", value.len(), path.display());

        Ok(())
    }
}
