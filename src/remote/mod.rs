//! Read-only access to the remote character catalog.

mod client;

pub use client::{SwapiClient, DEFAULT_API_URL};

use std::future::Future;

use crate::error::CatalogError;
use crate::models::{CharacterRecord, Page};

/// A paginated, searchable, read-only source of characters.
///
/// Implementations never retry and never cache.
pub trait CharacterSource {
    /// Fetches one page of characters. `page` is 1-based; `search` is applied
    /// only when non-empty.
    fn list_characters(
        &self,
        page: u32,
        search: Option<&str>,
    ) -> impl Future<Output = Result<Page, CatalogError>> + Send;

    /// Fetches a single character by catalog id.
    fn get_character_by_id(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<CharacterRecord, CatalogError>> + Send;
}
