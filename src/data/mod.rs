//! Core data models for the RAISE dataset listing
//!
//! This module contains the local query contract, the normalized dataset
//! schema, and the page shape returned to callers, plus the submodules that
//! turn loosely-structured marketplace responses into those types.

pub mod extract;
pub mod marketplace;
pub mod query;
pub mod sanitize;

pub use marketplace::{DatasetError, DatasetService};
pub use query::normalize;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A validated listing query
///
/// Only constructed through [`query::normalize`] (or [`Query::new`], which
/// clamps the same way), so `page >= 1` and `per_page` in `1..=50` always hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    search: String,
    page: u64,
    per_page: u32,
}

impl Query {
    /// Builds a query from already-typed values, clamping them into range
    pub fn new(search: impl Into<String>, page: u64, per_page: u32) -> Self {
        Self {
            search: search.into().trim().to_string(),
            page: page.max(1),
            per_page: per_page.clamp(1, query::MAX_PER_PAGE),
        }
    }

    /// Trimmed search text; empty means no filter
    pub fn search(&self) -> &str {
        &self.search
    }

    /// 1-based page number
    pub fn page(&self) -> u64 {
        self.page
    }

    /// Items per page
    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Number of upstream records to skip
    pub fn skip(&self) -> u64 {
        (self.page - 1).saturating_mul(u64::from(self.per_page))
    }

    /// Number of upstream records to take
    pub fn take(&self) -> u32 {
        self.per_page
    }

    /// Deterministic cache key for this query
    pub fn cache_key(&self) -> CacheKey {
        CacheKey::for_query(self)
    }
}

/// Digest of `(search, page, per_page)` used to key cached pages
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    const PREFIX: &'static str = "raise_datasets_";

    fn for_query(query: &Query) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(format!("{}|{}|{}", query.search, query.page, query.per_page));
        Self(format!("{}{:x}", Self::PREFIX, hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One dataset in the fixed local schema
///
/// All text fields are plain text. `link` is empty exactly when `id` is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedItem {
    pub id: String,
    pub title: String,
    pub description: String,
    pub organization: String,
    pub link: String,
}

/// One page of normalized results as served to the boundary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultPage {
    pub items: Vec<NormalizedItem>,
    pub page: u64,
    pub per_page: u32,
    /// Upstream total, when one could be found in the payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<i64>,
    pub has_more: bool,
}

impl ResultPage {
    /// Assembles a page, deriving `has_more`
    ///
    /// A known total always wins over the full-page heuristic, even when the
    /// two disagree.
    pub fn new(items: Vec<NormalizedItem>, query: &Query, total: Option<i64>) -> Self {
        let has_more = match total {
            Some(total) => {
                let seen = i128::from(query.page()) * i128::from(query.per_page());
                seen < i128::from(total)
            }
            None => items.len() == query.per_page() as usize,
        };

        Self {
            items,
            page: query.page(),
            per_page: query.per_page(),
            total,
            has_more,
        }
    }
}
