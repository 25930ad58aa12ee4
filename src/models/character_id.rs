//! Character identity.
//!
//! The remote catalog never sends an id field. A character is identified by
//! the numeric segment of its canonical resource url,
//! e.g. `https://swapi.py4e.com/api/people/42/` is character `42`.

use regex::Regex;
use std::sync::LazyLock;

/// Pattern matching the `/people/<digits>/` segment of a resource url.
const PEOPLE_URL_PATTERN: &str = r"/people/(\d+)/";

static PEOPLE_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(PEOPLE_URL_PATTERN).expect("valid regex"));

/// Extracts the character id from a resource url.
///
/// Returns the empty string when `url` has no `/people/<digits>/` segment.
/// An empty result means the character is unidentifiable and must not be
/// used as an overlay key or a detail route.
pub fn extract_id(url: &str) -> String {
    PEOPLE_URL_RE
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// Returns true if `id` has the shape [`extract_id`] produces: one or more
/// ASCII digits and nothing else.
pub fn is_character_id(id: &str) -> bool {
    !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit())
}
