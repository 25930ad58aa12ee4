//! Error types for the catalog data layer.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// What a failed remote request was asking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    /// A page of the character listing
    Characters,
    /// A single character by id
    Character,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Characters => write!(f, "characters"),
            Resource::Character => write!(f, "character"),
        }
    }
}

/// Errors surfaced to the presentation layer.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The remote catalog answered with a non-success status.
    #[error("Failed to fetch {resource} (status {status})")]
    FetchFailure {
        resource: Resource,
        status: reqwest::StatusCode,
    },

    /// A by-id operation was invoked without a usable id.
    #[error("Character ID is missing")]
    MissingIdentifier,

    /// Transport fault or undecodable response body.
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Storage(#[from] StorageError),

    /// A field edit or save was attempted outside an edit session.
    #[error("Character is not being edited")]
    NotEditing,
}

impl CatalogError {
    pub fn is_fetch_failure(&self) -> bool {
        matches!(self, CatalogError::FetchFailure { .. })
    }
}

/// Errors from the persistent key-value storage backing the overlay.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error for {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to serialize overlay: {0}")]
    Serialize(#[from] serde_json::Error),
}
