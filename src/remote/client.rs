//! HTTP client for the SWAPI people endpoints.

use std::time::Duration;

use tracing::debug;

use super::CharacterSource;
use crate::error::{CatalogError, Resource};
use crate::models::{is_character_id, CharacterRecord, Page};

/// Public SWAPI mirror used when no api url is configured.
pub const DEFAULT_API_URL: &str = "https://swapi.py4e.com/api";

/// Reads characters from a SWAPI-compatible server.
#[derive(Debug, Clone)]
pub struct SwapiClient {
    base_url: String,
    http: reqwest::Client,
}

impl SwapiClient {
    /// Creates a client for `base_url` (e.g. `https://swapi.py4e.com/api`).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_http_client(base_url, reqwest::Client::new())
    }

    /// Creates a client whose requests give up after `timeout`.
    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, CatalogError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_http_client(base_url, http))
    }

    pub fn with_http_client(base_url: impl Into<String>, http: reqwest::Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, http }
    }

    /// Builds the listing url. Pages below 1 are clamped to 1.
    fn list_url(&self, page: u32, search: Option<&str>) -> String {
        let mut url = format!("{}/people/?page={}", self.base_url, page.max(1));
        if let Some(search) = search.filter(|s| !s.is_empty()) {
            url.push_str("&search=");
            url.push_str(&urlencoding::encode(search));
        }
        url
    }

    fn character_url(&self, id: &str) -> String {
        format!("{}/people/{}/", self.base_url, id)
    }

    async fn fetch<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        resource: Resource,
    ) -> Result<T, CatalogError> {
        debug!("GET {}", url);
        let response = self.http.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            debug!("GET {} returned {}", url, status);
            return Err(CatalogError::FetchFailure { resource, status });
        }

        Ok(response.json().await?)
    }
}

impl CharacterSource for SwapiClient {
    async fn list_characters(&self, page: u32, search: Option<&str>) -> Result<Page, CatalogError> {
        let url = self.list_url(page, search);
        self.fetch(&url, Resource::Characters).await
    }

    async fn get_character_by_id(&self, id: &str) -> Result<CharacterRecord, CatalogError> {
        if !is_character_id(id) {
            return Err(CatalogError::MissingIdentifier);
        }
        let url = self.character_url(id);
        self.fetch(&url, Resource::Character).await
    }
}
