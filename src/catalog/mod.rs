//! The merged character view.
//!
//! [`Catalog`] combines a remote [`CharacterSource`] with the local
//! [`OverlayStore`]:
//! - single character: a local edit wins and the remote is not consulted
//! - listing: the remote decides membership, order and pagination; the
//!   overlay only decides each entry's "edited" badge

mod session;

pub use session::{EditMode, EditSession};

use serde::Serialize;
use tracing::debug;

use crate::error::CatalogError;
use crate::models::{is_character_id, CharacterRecord, LocalCharacterRecord, Page};
use crate::navigation::{ListQuery, NavigationGuard, Ticket};
use crate::remote::CharacterSource;
use crate::store::{KeyValueStorage, OverlayStore};

/// A character as the presentation layer should show it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CharacterView {
    /// The user's saved edit
    Edited(LocalCharacterRecord),
    /// Untouched remote data
    Remote(CharacterRecord),
}

impl CharacterView {
    pub fn record(&self) -> &CharacterRecord {
        match self {
            CharacterView::Edited(local) => &local.character,
            CharacterView::Remote(record) => record,
        }
    }

    pub fn is_edited(&self) -> bool {
        match self {
            CharacterView::Edited(local) => local.is_edited,
            CharacterView::Remote(_) => false,
        }
    }

    pub fn into_record(self) -> CharacterRecord {
        match self {
            CharacterView::Edited(local) => local.character,
            CharacterView::Remote(record) => record,
        }
    }
}

/// One row of a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListEntry {
    /// `None` when the record's url carries no usable id
    pub id: Option<String>,
    pub edited: bool,
    pub character: CharacterRecord,
}

/// One page of the listing with its navigation state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CharacterListing {
    pub query: ListQuery,
    pub count: u32,
    pub total_pages: u32,
    pub entries: Vec<ListEntry>,
}

impl CharacterListing {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Merged read access over a remote source and a local overlay.
pub struct Catalog<R, S> {
    remote: R,
    overlay: OverlayStore<S>,
    navigation: NavigationGuard,
}

impl<R: CharacterSource, S: KeyValueStorage> Catalog<R, S> {
    pub fn new(remote: R, overlay: OverlayStore<S>) -> Self {
        Self {
            remote,
            overlay,
            navigation: NavigationGuard::new(),
        }
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    pub fn overlay(&self) -> &OverlayStore<S> {
        &self.overlay
    }

    /// Looks up one character, preferring the local edit.
    ///
    /// The remote result is returned as-is and is not written to the overlay.
    /// Ids other than a run of digits are rejected with `MissingIdentifier`.
    pub async fn character(&self, id: &str) -> Result<CharacterView, CatalogError> {
        let id = id.trim();
        if !is_character_id(id) {
            return Err(CatalogError::MissingIdentifier);
        }

        if let Some(local) = self.overlay.get(id) {
            debug!("character {} served from overlay", id);
            return Ok(CharacterView::Edited(local));
        }

        let record = self.remote.get_character_by_id(id).await?;
        Ok(CharacterView::Remote(record))
    }

    /// Fetches one page of the listing and badges the entries edited locally.
    pub async fn list(&self, query: &ListQuery) -> Result<CharacterListing, CatalogError> {
        let page = self
            .remote
            .list_characters(query.page, query.search())
            .await?;
        Ok(self.badge(query, page))
    }

    fn badge(&self, query: &ListQuery, page: Page) -> CharacterListing {
        let edited = self.overlay.get_all();
        let total_pages = page.total_pages();

        let entries = page
            .results
            .into_iter()
            .map(|character| {
                let id = character.id();
                let edited = id.as_ref().is_some_and(|id| edited.contains_key(id));
                ListEntry {
                    id,
                    edited,
                    character,
                }
            })
            .collect();

        CharacterListing {
            query: query.clone(),
            count: page.count,
            total_pages,
            entries,
        }
    }

    /// Starts a navigation. Results fetched under older tickets are dropped by
    /// [`Catalog::list_latest`] and [`Catalog::character_latest`].
    pub fn begin_navigation(&self) -> Ticket {
        self.navigation.begin()
    }

    /// Like [`Catalog::list`], but yields `Ok(None)` if `ticket` was
    /// superseded before the response arrived.
    pub async fn list_latest(
        &self,
        ticket: Ticket,
        query: &ListQuery,
    ) -> Result<Option<CharacterListing>, CatalogError> {
        let listing = self.list(query).await;
        self.unless_stale(ticket, listing)
    }

    /// Like [`Catalog::character`], but yields `Ok(None)` if `ticket` was
    /// superseded before the response arrived.
    pub async fn character_latest(
        &self,
        ticket: Ticket,
        id: &str,
    ) -> Result<Option<CharacterView>, CatalogError> {
        let view = self.character(id).await;
        self.unless_stale(ticket, view)
    }

    fn unless_stale<T>(
        &self,
        ticket: Ticket,
        result: Result<T, CatalogError>,
    ) -> Result<Option<T>, CatalogError> {
        if !self.navigation.is_current(ticket) {
            debug!("discarding stale response for {:?}", ticket);
            return Ok(None);
        }
        result.map(Some)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::Resource;
    use crate::models::luke;
    use crate::store::MemoryStorage;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// In-process character source that counts calls.
    #[derive(Default)]
    pub(crate) struct FakeSource {
        pub characters: Vec<CharacterRecord>,
        pub fail_with: Option<reqwest::StatusCode>,
        pub list_calls: AtomicUsize,
        pub get_calls: AtomicUsize,
    }

    impl FakeSource {
        pub fn with(characters: Vec<CharacterRecord>) -> Self {
            Self {
                characters,
                ..Self::default()
            }
        }

        pub fn failing(status: reqwest::StatusCode) -> Self {
            Self {
                fail_with: Some(status),
                ..Self::default()
            }
        }
    }

    impl CharacterSource for FakeSource {
        async fn list_characters(
            &self,
            page: u32,
            search: Option<&str>,
        ) -> Result<Page, CatalogError> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(status) = self.fail_with {
                return Err(CatalogError::FetchFailure {
                    resource: Resource::Characters,
                    status,
                });
            }

            let matching: Vec<CharacterRecord> = self
                .characters
                .iter()
                .filter(|c| {
                    search.map_or(true, |s| c.name.to_lowercase().contains(&s.to_lowercase()))
                })
                .cloned()
                .collect();
            let start = ((page.max(1) - 1) * crate::models::PAGE_SIZE) as usize;
            let results = matching
                .iter()
                .skip(start)
                .take(crate::models::PAGE_SIZE as usize)
                .cloned()
                .collect();

            Ok(Page {
                count: matching.len() as u32,
                next: None,
                previous: None,
                results,
            })
        }

        async fn get_character_by_id(&self, id: &str) -> Result<CharacterRecord, CatalogError> {
            self.get_calls.fetch_add(1, Ordering::SeqCst);
            let found = self
                .characters
                .iter()
                .find(|c| c.id().as_deref() == Some(id));
            match (self.fail_with, found) {
                (None, Some(character)) => Ok(character.clone()),
                (status, _) => Err(CatalogError::FetchFailure {
                    resource: Resource::Character,
                    status: status.unwrap_or(reqwest::StatusCode::NOT_FOUND),
                }),
            }
        }
    }

    pub(crate) fn person(id: u32, name: &str) -> CharacterRecord {
        CharacterRecord::new(name, format!("https://swapi.py4e.com/api/people/{}/", id))
    }

    fn roster(n: u32) -> Vec<CharacterRecord> {
        (1..=n).map(|i| person(i, &format!("Trooper {}", i))).collect()
    }

    fn catalog(source: FakeSource) -> Catalog<FakeSource, MemoryStorage> {
        Catalog::new(source, OverlayStore::new(MemoryStorage::new()))
    }

    #[tokio::test]
    async fn test_overlay_wins_without_remote_call() {
        let catalog = catalog(FakeSource::with(vec![luke()]));
        let edited = luke().with_field(crate::models::CharacterField::Name, "Red Five");
        catalog.overlay().put("1", &edited).unwrap();

        let view = catalog.character("1").await.unwrap();

        assert!(view.is_edited());
        assert_eq!(view.record().name, "Red Five");
        assert_eq!(catalog.remote().get_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_remote_fallback_is_unedited_and_not_cached() {
        let catalog = catalog(FakeSource::with(vec![luke()]));

        let view = catalog.character("1").await.unwrap();

        assert_eq!(view, CharacterView::Remote(luke()));
        assert!(!view.is_edited());
        assert_eq!(catalog.remote().get_calls.load(Ordering::SeqCst), 1);
        assert!(catalog.overlay().get_all().is_empty());

        catalog.character("1").await.unwrap();
        assert_eq!(catalog.remote().get_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_missing_identifier() {
        let catalog = catalog(FakeSource::with(vec![luke()]));

        for id in ["", "   ", "1/../../planets/1", "luke"] {
            let err = catalog.character(id).await.unwrap_err();
            assert!(matches!(err, CatalogError::MissingIdentifier));
        }
        assert_eq!(catalog.remote().get_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unknown_character_is_fetch_failure() {
        let catalog = catalog(FakeSource::with(vec![luke()]));

        let err = catalog.character("999").await.unwrap_err();

        assert!(err.is_fetch_failure());
        assert!(err.to_string().starts_with("Failed to fetch character "));
    }

    #[tokio::test]
    async fn test_list_total_pages() {
        let catalog = catalog(FakeSource::with(roster(82)));

        let listing = catalog.list(&ListQuery::default()).await.unwrap();

        assert_eq!(listing.count, 82);
        assert_eq!(listing.total_pages, 9);
        assert_eq!(listing.entries.len(), 10);

        let last = catalog.list(&ListQuery::new(9, "")).await.unwrap();
        assert_eq!(last.entries.len(), 2);
        assert_eq!(last.entries[0].id.as_deref(), Some("81"));
    }

    #[tokio::test]
    async fn test_list_badges_edited_entries_without_substituting_fields() {
        let catalog = catalog(FakeSource::with(roster(3)));
        catalog.overlay().put("2", person(2, "Renamed")).unwrap();
        catalog.overlay().put("77", person(77, "Not On Page")).unwrap();

        let listing = catalog.list(&ListQuery::default()).await.unwrap();

        assert_eq!(listing.entries.len(), 3);
        let badges: Vec<bool> = listing.entries.iter().map(|e| e.edited).collect();
        assert_eq!(badges, vec![false, true, false]);
        assert_eq!(listing.entries[1].character.name, "Trooper 2");
    }

    #[tokio::test]
    async fn test_list_unidentifiable_entries_are_never_badged() {
        let mut broken = person(0, "Mystery");
        broken.url = "invalid-url".to_string();
        let catalog = catalog(FakeSource::with(vec![broken]));
        catalog.overlay().put("1", luke()).unwrap();

        let listing = catalog.list(&ListQuery::default()).await.unwrap();

        assert_eq!(listing.entries[0].id, None);
        assert!(!listing.entries[0].edited);
    }

    #[tokio::test]
    async fn test_list_passes_search_through() {
        let catalog = catalog(FakeSource::with(vec![luke(), person(4, "Darth Vader")]));

        let listing = catalog.list(&ListQuery::searching("vader")).await.unwrap();

        assert_eq!(listing.count, 1);
        assert_eq!(listing.entries[0].character.name, "Darth Vader");
        assert_eq!(listing.query.search(), Some("vader"));
    }

    #[tokio::test]
    async fn test_list_failure_propagates() {
        let catalog = catalog(FakeSource::failing(reqwest::StatusCode::BAD_GATEWAY));

        let err = catalog.list(&ListQuery::default()).await.unwrap_err();

        assert!(err.to_string().starts_with("Failed to fetch characters"));
    }

    #[tokio::test]
    async fn test_stale_navigation_is_discarded() {
        let catalog = catalog(FakeSource::with(roster(25)));

        let older = catalog.begin_navigation();
        let newer = catalog.begin_navigation();

        let stale = catalog
            .list_latest(older, &ListQuery::new(1, ""))
            .await
            .unwrap();
        let fresh = catalog
            .list_latest(newer, &ListQuery::new(2, ""))
            .await
            .unwrap();

        assert_eq!(stale, None);
        assert_eq!(fresh.unwrap().query.page, 2);
    }

    #[tokio::test]
    async fn test_stale_error_is_discarded_too() {
        let catalog = catalog(FakeSource::with(vec![luke()]));

        let older = catalog.begin_navigation();
        let newer = catalog.begin_navigation();

        assert_eq!(catalog.character_latest(older, "999").await.unwrap(), None);
        let view = catalog.character_latest(newer, "1").await.unwrap();
        assert_eq!(view.map(CharacterView::into_record), Some(luke()));
    }
}
