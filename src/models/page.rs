use serde::{Deserialize, Serialize};

use super::character::CharacterRecord;

/// Number of characters the remote catalog returns per page.
pub const PAGE_SIZE: u32 = 10;

/// One page of the remote character listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Page {
    /// Total number of characters matching the query, across all pages
    pub count: u32,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<CharacterRecord>,
}

impl Page {
    pub fn page_size(&self) -> u32 {
        PAGE_SIZE
    }

    /// `ceil(count / PAGE_SIZE)`; zero for an empty result set.
    pub fn total_pages(&self) -> u32 {
        self.count.div_ceil(PAGE_SIZE)
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
