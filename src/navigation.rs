//! Navigable view state.
//!
//! The list view is addressed by a page number and a search string carried in
//! a shareable query string (`/?page=2&search=sky`); the detail view by a
//! single id path segment (`/character/1`). [`NavigationGuard`] lets a caller
//! drop responses that arrive after a newer navigation has started.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// List view state: which page, filtered by which search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListQuery {
    /// 1-based page number
    pub page: u32,
    /// Empty means unfiltered
    pub search: String,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            search: String::new(),
        }
    }
}

impl ListQuery {
    pub fn new(page: u32, search: impl Into<String>) -> Self {
        Self {
            page: page.max(1),
            search: search.into(),
        }
    }

    /// A new search always starts over at page 1.
    pub fn searching(search: impl Into<String>) -> Self {
        Self::new(1, search)
    }

    /// Same search, different page.
    pub fn with_page(&self, page: u32) -> Self {
        Self::new(page, self.search.clone())
    }

    pub fn search(&self) -> Option<&str> {
        if self.search.is_empty() {
            None
        } else {
            Some(&self.search)
        }
    }

    /// Parses `page=2&search=luke` (a leading `?` is accepted).
    ///
    /// A missing or unparseable page falls back to 1. Unknown parameters are
    /// ignored.
    pub fn from_query_string(query: &str) -> Self {
        let mut parsed = Self::default();

        for pair in query.trim_start_matches('?').split('&') {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let value = decode_component(value);
            match key {
                "page" => parsed.page = value.trim().parse::<u32>().unwrap_or(1).max(1),
                "search" => parsed.search = value,
                _ => {}
            }
        }

        parsed
    }

    /// Renders the query string, omitting an empty search.
    pub fn to_query_string(&self) -> String {
        match self.search() {
            Some(search) => format!("page={}&search={}", self.page, urlencoding::encode(search)),
            None => format!("page={}", self.page),
        }
    }
}

fn decode_component(value: &str) -> String {
    let value = value.replace('+', " ");
    match urlencoding::decode(&value) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => value,
    }
}

/// A resolved view location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/` with optional list query
    List(ListQuery),
    /// `/character/<id>`
    Detail(String),
    /// Anything else
    NotFound(String),
}

impl Route {
    pub fn parse(location: &str) -> Self {
        let (path, query) = location.split_once('?').unwrap_or((location, ""));

        if path.is_empty() || path == "/" {
            return Route::List(ListQuery::from_query_string(query));
        }

        let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
        match segments.as_slice() {
            ["character", id] => Route::Detail(decode_component(id)),
            _ => Route::NotFound(location.to_string()),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::List(query) => write!(f, "/?{}", query.to_query_string()),
            Route::Detail(id) => write!(f, "/character/{}", urlencoding::encode(id)),
            Route::NotFound(location) => write!(f, "{}", location),
        }
    }
}

/// Identifies one navigation; see [`NavigationGuard`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

/// Hands out tickets in increasing order. Only the most recently issued
/// ticket is current, so a response fetched under an older ticket is stale.
#[derive(Debug, Default)]
pub struct NavigationGuard {
    latest: AtomicU64,
}

impl NavigationGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a navigation, superseding every earlier ticket.
    pub fn begin(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }
}
