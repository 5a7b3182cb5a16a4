//! Service configuration
//!
//! All endpoints, limits and timings in one place. Defaults match the
//! production marketplace; tests override the endpoint and TTL.

use std::time::Duration;

use crate::data::query::DEFAULT_PER_PAGE;

/// Marketplace listing endpoint
pub const MARKETPLACE_ENDPOINT: &str = "https://api.portal.raise-science.eu/dataset/marketplace";

/// Public page for a single dataset; the percent-encoded id is appended
pub const DATASET_BASE_URL: &str = "https://portal.raise-science.eu/dataset-marketplace/";

/// Upstream request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// How long a normalized page is served from cache
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// Configuration for [`crate::data::DatasetService`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Upstream listing URL, without query string
    pub endpoint: String,
    /// Prefix for dataset links
    pub dataset_base_url: String,
    /// Bound on each upstream call
    pub timeout: Duration,
    /// Lifetime of cached pages
    pub cache_ttl: Duration,
    /// User-Agent sent upstream
    pub user_agent: String,
    /// Page size used when the caller's value is unusable
    pub default_per_page: u32,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            endpoint: MARKETPLACE_ENDPOINT.to_string(),
            dataset_base_url: DATASET_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            cache_ttl: DEFAULT_CACHE_TTL,
            user_agent: concat!("raise-datasets/", env!("CARGO_PKG_VERSION")).to_string(),
            default_per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl ServiceConfig {
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_dataset_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.dataset_base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn with_default_per_page(mut self, per_page: u32) -> Self {
        self.default_per_page = per_page;
        self
    }
}
