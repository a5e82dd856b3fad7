use liquidmix::config::{CatalogConfig, CatalogSourceKind};
use liquidmix::core::catalog::{CatalogSource, HttpCatalog, create_catalog};
use liquidmix::core::mixing::Flavor;
use liquidmix::error::CatalogError;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn storefront_payload() -> serde_json::Value {
    json!({
        "liquids": [
            {"id": 1, "name": "Strawberry Cheesecake", "sweetness": 9, "stock": 4, "price": 14.9},
            {"id": 2, "name": "Arctic Menthol", "mentholLevel": 12, "stock": 0},
            {"id": "3", "name": "House Blend", "primaryFlavor": "spice", "vgRatio": 70, "stock": 2}
        ]
    })
}

#[tokio::test]
async fn fetches_and_normalizes_remote_catalog() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/liquids"))
        .respond_with(ResponseTemplate::new(200).set_body_json(storefront_payload()))
        .expect(1)
        .mount(&server)
        .await;

    let source = HttpCatalog::new(
        &format!("{}/api/liquids", server.uri()),
        Duration::from_secs(5),
    )
    .unwrap();
    let liquids = source.fetch_all().await.unwrap();

    assert_eq!(liquids.len(), 3);
    assert_eq!(liquids[0].id, "1");
    assert_eq!(liquids[0].primary_flavor, Flavor::Dessert);
    assert!(liquids[0].secondary_flavors.contains("strawberry"));
    assert_eq!(liquids[1].primary_flavor, Flavor::Menthol);
    assert_eq!(liquids[1].menthol_level, 10);
    assert_eq!(liquids[2].primary_flavor, Flavor::Spice);
    assert_eq!(liquids[2].vg_ratio, 70);
}

#[tokio::test]
async fn server_error_is_a_retryable_request_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/liquids"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let source = HttpCatalog::new(
        &format!("{}/api/liquids", server.uri()),
        Duration::from_secs(5),
    )
    .unwrap();
    let err = source.fetch_all().await.unwrap_err();
    assert!(matches!(err, CatalogError::Request { .. }));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn garbage_body_is_a_parse_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/liquids"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let source = HttpCatalog::new(
        &format!("{}/api/liquids", server.uri()),
        Duration::from_secs(5),
    )
    .unwrap();
    assert!(matches!(
        source.fetch_all().await.unwrap_err(),
        CatalogError::Parse(_)
    ));
}

#[tokio::test]
async fn cached_http_catalog_fetches_once_within_ttl() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/liquids"))
        .respond_with(ResponseTemplate::new(200).set_body_json(storefront_payload()))
        .expect(1)
        .mount(&server)
        .await;

    let config = CatalogConfig {
        source: CatalogSourceKind::Http,
        url: Some(format!("{}/api/liquids", server.uri())),
        refresh_secs: 300,
        ..CatalogConfig::default()
    };
    let catalog = create_catalog(&config).unwrap();
    assert_eq!(catalog.source_name(), "http");

    let first = catalog.snapshot().await.unwrap();
    let second = catalog.snapshot().await.unwrap();
    assert_eq!(first.len(), 3);
    assert_eq!(second.in_stock().count(), 2);
    assert!(second.get("3").is_some());
}
