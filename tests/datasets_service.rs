//! End-to-end tests for the listing boundary against a mock marketplace

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use raise_datasets::api::{get_datasets, DatasetParams};
use raise_datasets::cache::CacheManager;
use raise_datasets::config::ServiceConfig;
use raise_datasets::data::{normalize, DatasetService, ResultPage};
use serde_json::json;
use wiremock::{
    matchers::{header, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

fn service_for(server: &MockServer) -> DatasetService {
    let config = ServiceConfig::default().with_endpoint(format!("{}/marketplace", server.uri()));
    DatasetService::from_config(config).expect("client should build")
}

#[tokio::test]
async fn test_query_string_maps_to_upstream_pagination() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/marketplace"))
        .and(query_param("skip", "20"))
        .and(query_param("take", "20"))
        .and(query_param("searchQuery", "gene"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": {"data": [{"id": 7, "title": "Seven", "userId": "u-7"}], "total": "45"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let service = service_for(&server);
    let params = DatasetParams::from_query_string("search=gene&page=2&per_page=20");
    let response = get_datasets(&service, &params).await;

    assert_eq!(response.status, 200);
    assert_eq!(
        response.body,
        json!({
            "items": [{
                "id": "7",
                "title": "Seven",
                "description": "",
                "organization": "u-7",
                "link": "https://portal.raise-science.eu/dataset-marketplace/7",
            }],
            "page": 2,
            "per_page": 20,
            "total": 45,
            "has_more": true,
        })
    );
}

#[tokio::test]
async fn test_user_agent_identifies_service() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header(
            "user-agent",
            concat!("raise-datasets/", env!("CARGO_PKG_VERSION")),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let service = service_for(&server);
    let response = get_datasets(&service, &DatasetParams::default()).await;
    assert!(response.is_success());
}

#[tokio::test]
async fn test_repeated_requests_hit_cache_until_ttl() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"results": [{"id": "a"}]})),
        )
        .expect(2)
        .mount(&server)
        .await;

    let config = ServiceConfig::default()
        .with_endpoint(server.uri())
        .with_cache_ttl(Duration::from_millis(150));
    let service = DatasetService::from_config(config).expect("client should build");
    let params = DatasetParams::from_query_string("search=x&page=1&per_page=10");

    let first = get_datasets(&service, &params).await;
    let second = get_datasets(&service, &params).await;
    assert_eq!(first, second);

    tokio::time::sleep(Duration::from_millis(250)).await;
    let third = get_datasets(&service, &params).await;
    assert!(third.is_success());
}

#[tokio::test]
async fn test_equivalent_raw_params_share_cache_entry() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let service = service_for(&server);
    // All of these normalize to search="x", page=1, per_page=10
    for raw in ["search=x", "search=+x+&page=0", "search=x&page=-2&per_page=abc"] {
        let response = get_datasets(&service, &DatasetParams::from_query_string(raw)).await;
        assert!(response.is_success());
    }
    assert_eq!(service.cache().len(), 1);
}

#[tokio::test]
async fn test_injected_cache_is_shared() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": "z"}])))
        .expect(1)
        .mount(&server)
        .await;

    let cache: Arc<CacheManager<ResultPage>> = Arc::new(CacheManager::new());
    let config = ServiceConfig::default().with_endpoint(server.uri());
    let first = DatasetService::new(
        config.clone(),
        reqwest::Client::new(),
        Arc::clone(&cache),
    );
    let second = DatasetService::new(config, reqwest::Client::new(), Arc::clone(&cache));

    let query = normalize(Some("z"), None, None);
    let a = first.fetch(&query).await.expect("first service");
    let b = second.fetch(&query).await.expect("second service");
    assert_eq!(a, b);
    assert_eq!(cache.len(), 1);
}

#[tokio::test]
async fn test_concurrent_requests_for_same_query() {
    let server = MockServer::start().await;
    // Concurrent misses may each go upstream; at most one per request
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"data": {"items": [{"id": "c"}]}, "meta": {"count": 1}}))
                .set_delay(Duration::from_millis(50)),
        )
        .expect(1..=4)
        .mount(&server)
        .await;

    let service = service_for(&server);
    let query = normalize(Some("c"), Some("1"), Some("10"));

    let results = join_all((0..4).map(|_| service.fetch(&query))).await;
    let pages: Vec<ResultPage> = results
        .into_iter()
        .map(|result| result.expect("fetch should succeed"))
        .collect();

    assert!(pages.windows(2).all(|pair| pair[0] == pair[1]));
    assert_eq!(pages[0].total, Some(1));
    assert_eq!(service.cache().len(), 1);

    // Once populated, later requests are served from cache
    service.fetch(&query).await.expect("cached fetch");
}

#[tokio::test]
async fn test_failure_then_recovery_is_not_cached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("down"))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": "ok"}])))
        .expect(1)
        .mount(&server)
        .await;

    let service = service_for(&server);
    let params = DatasetParams::default();

    let failed = get_datasets(&service, &params).await;
    assert_eq!(failed.status, 502);
    assert_eq!(failed.body["data"]["upstream_status"], 500);

    let recovered = get_datasets(&service, &params).await;
    assert!(recovered.is_success());
    assert_eq!(recovered.body["items"][0]["id"], "ok");
}
