//! Query normalization and cache key construction.
//!
//! Free-text search terms are canonicalized before they touch the cache or the
//! upstream provider, so that `"  Peanut   Butter "` and `"peanut butter"` share
//! one cache entry.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// Namespace prepended to every cache key owned by the search gateway.
pub const CACHE_KEY_PREFIX: &str = "products:";

/// Matches a maximal run of Unicode whitespace.
static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Errors raised while validating a raw query.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("Please provide a search term")]
    Empty,
}

/// Canonicalizes a raw search term.
///
/// # Normalization Rules
///
/// 1. Leading and trailing whitespace is trimmed
/// 2. Every run of whitespace becomes a single ASCII space
/// 3. The result is lower-cased
///
/// Never fails; empty input yields an empty string. The function is idempotent.
///
/// # Examples
///
/// ```
/// use product_search_gateway::domain::query::normalize;
///
/// assert_eq!(normalize("  Peanut   Butter "), "peanut butter");
/// assert_eq!(normalize(&normalize("A\tB")), normalize("A\tB"));
/// ```
pub fn normalize(raw: &str) -> String {
    WHITESPACE_RUN
        .replace_all(raw.trim(), " ")
        .to_lowercase()
}

/// Canonical cache key for a search term.
///
/// Holds the normalized term together with the namespaced store key so the
/// gateway can use the former as the upstream search term and the latter for
/// cache access.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    key: String,
    term_start: usize,
}

impl CacheKey {
    /// Builds a key from raw user input.
    pub fn from_query(raw: &str) -> Self {
        let term = normalize(raw);
        Self {
            key: format!("{CACHE_KEY_PREFIX}{term}"),
            term_start: CACHE_KEY_PREFIX.len(),
        }
    }

    /// Validates raw input and builds its key.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::Empty`] for empty or whitespace-only input.
    pub fn try_from_query(raw: &str) -> Result<Self, QueryError> {
        if raw.trim().is_empty() {
            return Err(QueryError::Empty);
        }
        Ok(Self::from_query(raw))
    }

    /// Full key as stored in the cache, including the namespace prefix.
    pub fn as_str(&self) -> &str {
        &self.key
    }

    /// Normalized search term without the namespace prefix.
    pub fn term(&self) -> &str {
        &self.key[self.term_start..]
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}
