use liquidmix::config::{CatalogSourceKind, Config, LedgerBackend};
use liquidmix::gateway::run_gateway_with_listener;
use reqwest::StatusCode;
use serde_json::{Value, json};
use std::time::Duration;
use tempfile::TempDir;

const CATALOG: &str = r#"[
    {"id": "A", "name": "Sweet Apple", "category": "fruit", "sweetness": 8, "menthol_level": 0, "stock": 5, "price": 10.0},
    {"id": "B", "name": "Cool Mint", "category": "menthol", "sweetness": 3, "menthol_level": 9, "stock": 5, "price": 12.0},
    {"id": "T", "name": "Dark Leaf", "category": "tobacco", "sweetness": 2, "stock": 5, "price": 9.0}
]"#;

struct GatewayTestServer {
    port: u16,
    handle: tokio::task::JoinHandle<anyhow::Result<()>>,
    _workspace: TempDir,
}

impl GatewayTestServer {
    async fn start() -> Self {
        let workspace = TempDir::new().expect("temp workspace should be created");
        let catalog_path = workspace.path().join("catalog.json");
        std::fs::write(&catalog_path, CATALOG).expect("catalog should be written");

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("ephemeral gateway listener should bind");
        let port = listener
            .local_addr()
            .expect("ephemeral gateway listener should expose local address")
            .port();

        let mut config = Config::default();
        config.workspace_dir = workspace.path().to_path_buf();
        config.config_path = workspace.path().join("config.toml");
        config.catalog.source = CatalogSourceKind::File;
        config.catalog.path = catalog_path.to_string_lossy().into_owned();
        config.ledger.backend = LedgerBackend::Memory;

        let host = "127.0.0.1".to_string();
        let handle =
            tokio::spawn(async move { run_gateway_with_listener(&host, listener, config).await });

        wait_until_gateway_ready(port).await;

        Self {
            port,
            handle,
            _workspace: workspace,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://127.0.0.1:{}{path}", self.port)
    }
}

impl Drop for GatewayTestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn wait_until_gateway_ready(port: u16) {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_millis(200))
        .build()
        .expect("reqwest client should be built");

    for _ in 0..80 {
        let health = client
            .get(format!("http://127.0.0.1:{port}/health"))
            .send()
            .await;
        if health.is_ok_and(|response| response.status() == StatusCode::OK) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("gateway did not become ready on port {port}");
}

#[tokio::test]
async fn health_reports_ledger_backend() {
    let server = GatewayTestServer::start().await;
    let body: Value = reqwest::get(server.url("/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["ledger"], "memory");
}

#[tokio::test]
async fn suggest_vote_ratings_round_trip() {
    let server = GatewayTestServer::start().await;
    let client = reqwest::Client::new();

    let response = client
        .post(server.url("/mix/suggestions"))
        .json(&json!({
            "desired_flavor": "fruit",
            "menthol_level": 4,
            "sweetness": 6,
            "max_liquids": 2
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    let suggestions = body["suggestions"].as_array().unwrap();
    assert!(!suggestions.is_empty());
    assert!(
        suggestions
            .iter()
            .all(|s| !s["composition"]["components"]
                .as_array()
                .unwrap()
                .iter()
                .any(|c| c["liquid_id"] == "T"))
    );

    let hash = suggestions[0]["hash"].as_str().unwrap().to_string();
    assert_eq!(suggestions[0]["rating"]["likes"], 0);

    let vote: Value = client
        .post(server.url(&format!("/mix/{hash}/vote")))
        .json(&json!({"like": true}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(vote["likes"], 1);
    assert_eq!(vote["dislikes"], 0);

    let ratings: Value = reqwest::get(server.url(&format!("/mix/{hash}/ratings")))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(ratings["hash"], hash.as_str());
    assert_eq!(ratings["likes"], 1);

    let top: Value = reqwest::get(server.url("/mix/top?limit=5"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(top["top"][0]["hash"], hash.as_str());

    // Analyzing the same blend sees the same reputation.
    let analysis: Value = client
        .post(server.url("/mix/analyze"))
        .json(&json!({"components": suggestions[0]["composition"]["components"]}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(analysis["hash"], hash.as_str());
    assert_eq!(analysis["rating"]["likes"], 1);
}

#[tokio::test]
async fn unknown_hash_reads_zero() {
    let server = GatewayTestServer::start().await;
    let hash = "0".repeat(64);
    let response = reqwest::get(server.url(&format!("/mix/{hash}/ratings")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["likes"], 0);
    assert_eq!(body["dislikes"], 0);
}

#[tokio::test]
async fn validation_failures_are_422_and_bad_json_is_400() {
    let server = GatewayTestServer::start().await;
    let client = reqwest::Client::new();

    let bad_sum = client
        .post(server.url("/mix/analyze"))
        .json(&json!({"components": [
            {"liquid_id": "A", "percentage": 57.0},
            {"liquid_id": "B", "percentage": 40.0}
        ]}))
        .send()
        .await
        .unwrap();
    assert_eq!(bad_sum.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = bad_sum.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("sum"));

    let unknown = client
        .post(server.url("/mix/analyze"))
        .json(&json!({"components": [{"liquid_id": "nope", "percentage": 100.0}]}))
        .send()
        .await
        .unwrap();
    assert_eq!(unknown.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let too_many = client
        .post(server.url("/mix/suggestions"))
        .json(&json!({"desired_flavor": "fruit", "menthol_level": 0, "sweetness": 5, "max_liquids": 9}))
        .send()
        .await
        .unwrap();
    assert_eq!(too_many.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let too_sweet = client
        .post(server.url("/mix/suggestions"))
        .json(&json!({"desired_flavor": "fruit", "menthol_level": 0, "sweetness": 300, "max_liquids": 2}))
        .send()
        .await
        .unwrap();
    assert_eq!(too_sweet.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = too_sweet.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("sweetness"));

    let mixed = client
        .post(server.url("/mix/suggestions"))
        .json(&json!({"desired_flavor": "mixed", "menthol_level": 0, "sweetness": 5, "max_liquids": 2}))
        .send()
        .await
        .unwrap();
    assert_eq!(mixed.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let malformed = client
        .post(server.url("/mix/analyze"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(malformed.status(), StatusCode::BAD_REQUEST);

    let bad_hash = client
        .post(server.url("/mix/xyz/vote"))
        .json(&json!({"like": true}))
        .send()
        .await
        .unwrap();
    assert_eq!(bad_hash.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn clashing_blend_reports_poor_compatibility() {
    let server = GatewayTestServer::start().await;
    let body: Value = reqwest::Client::new()
        .post(server.url("/mix/analyze"))
        .json(&json!({"components": [
            {"liquid_id": "B", "percentage": 50.0},
            {"liquid_id": "T", "percentage": 50.0}
        ]}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["compatibility"], "poor");
    assert_eq!(body["score"], 75);
    assert_eq!(body["incompatible_pairs"][0][0], "B");
    assert_eq!(body["incompatible_pairs"][0][1], "T");
}
