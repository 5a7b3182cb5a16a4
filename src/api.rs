//! Boundary between the host web layer and [`DatasetService`]
//!
//! The host routes `GET .../datasets` here with the raw query parameters and
//! serializes whatever [`ApiResponse`] comes back. Parameter values stay raw
//! strings until [`normalize_with_default`] has clamped them, so no client
//! input can fail a request.

use serde::Deserialize;
use serde_json::{json, Value};

use crate::data::query::normalize_with_default;
use crate::data::{DatasetError, DatasetService, Query, ResultPage};

/// Status used for every upstream failure
pub const BAD_GATEWAY: u16 = 502;

/// Status used when a page cannot be turned into a response body
pub const INTERNAL_SERVER_ERROR: u16 = 500;

/// Raw inbound query contract: `search`, `page`, `per_page`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DatasetParams {
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub page: Option<String>,
    #[serde(default)]
    pub per_page: Option<String>,
}

impl DatasetParams {
    /// Reads the parameters from a URL query string such as
    /// `search=gene&page=2&per_page=20`
    ///
    /// Unknown keys are ignored; a repeated key keeps its last value.
    pub fn from_query_string(query: &str) -> Self {
        let mut params = Self::default();
        let raw = query.trim_start_matches('?').as_bytes();
        for (key, value) in url::form_urlencoded::parse(raw) {
            let value = Some(value.into_owned());
            match key.as_ref() {
                "search" => params.search = value,
                "page" => params.page = value,
                "per_page" => params.per_page = value,
                _ => {}
            }
        }
        params
    }

    /// Normalized query for these parameters
    pub fn to_query(&self, default_per_page: u32) -> Query {
        normalize_with_default(
            self.search.as_deref(),
            self.page.as_deref(),
            self.per_page.as_deref(),
            default_per_page,
        )
    }
}

/// Status code and JSON body for the host to send
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        self.status == 200
    }

    fn ok(page: &ResultPage) -> Self {
        match serde_json::to_value(page) {
            Ok(body) => Self { status: 200, body },
            Err(error) => Self::from_serialization_error(&error),
        }
    }

    fn from_serialization_error(error: &serde_json::Error) -> Self {
        tracing::error!("failed to serialize result page: {}", error);
        Self {
            status: INTERNAL_SERVER_ERROR,
            body: json!({
                "code": "raise_datasets_serialization_error",
                "message": "The dataset listing could not be prepared.",
                "data": { "status": INTERNAL_SERVER_ERROR },
            }),
        }
    }

    fn from_error(error: &DatasetError) -> Self {
        let mut data = json!({ "status": BAD_GATEWAY });
        if let DatasetError::UpstreamError { status, body } = error {
            data["upstream_status"] = json!(status);
            data["body"] = json!(body);
        }

        Self {
            status: BAD_GATEWAY,
            body: json!({
                "code": error.code(),
                "message": error.message(),
                "data": data,
            }),
        }
    }
}

/// Handles one listing request
pub async fn get_datasets(service: &DatasetService, params: &DatasetParams) -> ApiResponse {
    let query = params.to_query(service.config().default_per_page);
    match service.fetch(&query).await {
        Ok(page) => ApiResponse::ok(&page),
        Err(error) => ApiResponse::from_error(&error),
    }
}

/// Which pager controls a listing widget should enable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagerState {
    pub previous_enabled: bool,
    pub next_enabled: bool,
}

impl PagerState {
    pub fn from_page(page: &ResultPage) -> Self {
        Self {
            previous_enabled: page.page > 1,
            next_enabled: page.has_more,
        }
    }

    /// Both controls off, used when the request failed
    pub fn disabled() -> Self {
        Self {
            previous_enabled: false,
            next_enabled: false,
        }
    }
}
