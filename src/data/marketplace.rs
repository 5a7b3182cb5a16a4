//! RAISE marketplace client
//!
//! Fetches one page of the dataset listing from the marketplace API,
//! normalizes it into a [`ResultPage`], and serves repeated queries from an
//! in-memory cache.

use std::sync::Arc;

use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::extract::{extract_items, extract_total};
use super::sanitize::sanitize;
use super::{Query, ResultPage};
use crate::cache::CacheManager;
use crate::config::ServiceConfig;

/// Errors that can occur when fetching the listing
///
/// None of these are cached; the next request for the same query goes
/// upstream again.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// Transport failure: connect error, timeout, or truncated body
    #[error("Unable to reach the RAISE marketplace API: {0}")]
    UpstreamUnreachable(#[source] reqwest::Error),

    /// The marketplace answered with a non-success status
    #[error("Unexpected response from the RAISE marketplace API (status {status})")]
    UpstreamError { status: u16, body: String },

    /// The body could not be decoded as JSON
    #[error("The data returned by the RAISE marketplace API is not valid JSON: {0}")]
    InvalidUpstreamPayload(#[from] serde_json::Error),

    /// The HTTP client could not be built from the configuration
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl DatasetError {
    /// Stable machine-readable code for the boundary
    pub fn code(&self) -> &'static str {
        match self {
            Self::UpstreamUnreachable(_) => "raise_datasets_http_error",
            Self::UpstreamError { .. } => "raise_datasets_unexpected_status",
            Self::InvalidUpstreamPayload(_) => "raise_datasets_invalid_payload",
            Self::Client(_) => "raise_datasets_client_error",
        }
    }

    /// Short human-readable message, without transport details
    pub fn message(&self) -> &'static str {
        match self {
            Self::UpstreamUnreachable(_) => "Unable to reach the RAISE marketplace API.",
            Self::UpstreamError { .. } => "Unexpected response from the RAISE marketplace API.",
            Self::InvalidUpstreamPayload(_) => {
                "The data returned by the RAISE marketplace API is not valid JSON."
            }
            Self::Client(_) => "The RAISE marketplace client is misconfigured.",
        }
    }
}

/// Cached, normalizing client for the marketplace listing
///
/// Construct once at startup and share by reference; the cache inside is
/// safe for concurrent requests.
#[derive(Debug, Clone)]
pub struct DatasetService {
    /// HTTP client for making requests
    http_client: Client,
    /// Normalized pages keyed by query
    cache: Arc<CacheManager<ResultPage>>,
    config: ServiceConfig,
}

impl DatasetService {
    /// Creates a service from explicit collaborators
    ///
    /// `http_client` may be any client; the configured timeout and user agent
    /// are still applied to every marketplace request.
    pub fn new(
        config: ServiceConfig,
        http_client: Client,
        cache: Arc<CacheManager<ResultPage>>,
    ) -> Self {
        Self {
            http_client,
            cache,
            config,
        }
    }

    /// Creates a service with its own HTTP client and an empty cache
    pub fn from_config(config: ServiceConfig) -> Result<Self, DatasetError> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(DatasetError::Client)?;
        Ok(Self::new(config, http_client, Arc::new(CacheManager::new())))
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn cache(&self) -> &CacheManager<ResultPage> {
        &self.cache
    }

    /// Returns the page for `query`
    ///
    /// # Behavior
    /// - A live cache entry is returned without touching the network
    /// - Otherwise the marketplace is called once, the result normalized and
    ///   cached for the configured TTL
    /// - Failures are returned as-is and leave the cache untouched
    pub async fn fetch(&self, query: &Query) -> Result<ResultPage, DatasetError> {
        let cache_key = query.cache_key();

        if let Some(page) = self.cache.get(cache_key.as_str()) {
            debug!(key = %cache_key, "cache hit");
            return Ok(page);
        }
        debug!(key = %cache_key, "cache miss");

        match self.fetch_from_api(query).await {
            Ok(page) => {
                self.cache.put(cache_key.as_str(), page.clone(), self.config.cache_ttl);
                Ok(page)
            }
            Err(error) => {
                warn!(code = error.code(), "marketplace fetch failed: {}", error);
                Err(error)
            }
        }
    }

    /// Query string parameters sent upstream for `query`
    pub fn upstream_params(query: &Query) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("skip", query.skip().to_string()),
            ("take", query.take().max(1).to_string()),
        ];
        if !query.search().is_empty() {
            params.push(("searchQuery", query.search().to_string()));
        }
        params
    }

    /// Turns a decoded marketplace payload into a page for `query`
    pub fn normalize_payload(&self, payload: &Value, query: &Query) -> ResultPage {
        let items = extract_items(payload)
            .iter()
            .map(|raw| sanitize(raw, &self.config.dataset_base_url))
            .collect();
        ResultPage::new(items, query, extract_total(payload))
    }

    /// Fetches and normalizes one page directly from the API
    async fn fetch_from_api(&self, query: &Query) -> Result<ResultPage, DatasetError> {
        info!(
            skip = query.skip(),
            take = query.take(),
            search = query.search(),
            "requesting marketplace listing"
        );

        // Set per request as well, so injected clients honor the config too
        let response = self
            .http_client
            .get(&self.config.endpoint)
            .query(&Self::upstream_params(query))
            .header(ACCEPT, "application/json")
            .header(USER_AGENT, &self.config.user_agent)
            .timeout(self.config.timeout)
            .send()
            .await
            .map_err(DatasetError::UpstreamUnreachable)?;

        let status = response.status();
        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(error) => {
                    debug!(%status, "failed to read error body: {}", error);
                    String::new()
                }
            };
            return Err(DatasetError::UpstreamError {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(DatasetError::UpstreamUnreachable)?;
        let payload: Value = serde_json::from_str(&body)?;

        let page = self.normalize_payload(&payload, query);
        debug!(
            items = page.items.len(),
            total = ?page.total,
            has_more = page.has_more,
            "normalized marketplace listing"
        );
        Ok(page)
    }
}
