//! Axum-based HTTP gateway for the mixing engine.
//!
//! - Request body size limit (64KB)
//! - Request timeout (30s)
//! - Optional CORS allow-list for browser storefronts

mod handlers;

use handlers::{
    handle_analyze, handle_health, handle_ratings, handle_suggestions, handle_top, handle_vote,
};

use crate::config::Config;
use crate::core::mixing::{MixEngine, create_mix_engine};
use anyhow::{Context, Result};
use axum::{
    Router,
    http::{HeaderValue, Method, StatusCode, header},
    routing::{get, post},
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tracing::{info, warn};

/// Maximum request body size (64KB)
pub const MAX_BODY_SIZE: usize = 65_536;
/// Request timeout (30s)
pub const REQUEST_TIMEOUT_SECS: u64 = 30;
/// Upper bound for `GET /mix/top?limit=`
pub const MAX_TOP_LIMIT: usize = 100;

/// Shared state for all axum handlers
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<dyn MixEngine>,
}

/// `POST /mix/{hash}/vote` body
#[derive(Debug, serde::Deserialize)]
pub struct VoteBody {
    pub like: bool,
}

/// `GET /mix/top` query params
#[derive(Debug, Default, serde::Deserialize)]
pub struct TopQuery {
    pub limit: Option<usize>,
}

fn is_public_bind(host: &str) -> bool {
    !matches!(
        host,
        "127.0.0.1" | "localhost" | "::1" | "[::1]" | "0:0:0:0:0:0:0:1"
    )
}

/// Run the HTTP gateway on `host:port`.
pub async fn run_gateway(host: &str, port: u16, config: Config) -> Result<()> {
    if is_public_bind(host) && !config.gateway.allow_public_bind {
        anyhow::bail!(
            "Refusing to bind to {host}: the gateway would be reachable from other machines.\n\
             Fix: use --host 127.0.0.1 (default), or set\n\
             [gateway] allow_public_bind = true in config.toml."
        );
    }

    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .with_context(|| format!("Invalid gateway address {host}:{port}"))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind gateway on {addr}"))?;

    run_gateway_with_listener(host, listener, config).await
}

/// Run the HTTP gateway from a pre-bound listener.
pub async fn run_gateway_with_listener(
    host: &str,
    listener: tokio::net::TcpListener,
    config: Config,
) -> Result<()> {
    let engine = create_mix_engine(&config).await?;
    serve_engine(host, listener, engine, &config.gateway.cors_origins).await
}

/// Serve an already-built engine; embedders use this to supply their own
/// catalog source or ledger.
pub async fn serve_engine(
    host: &str,
    listener: tokio::net::TcpListener,
    engine: Arc<dyn MixEngine>,
    cors_origins: &[String],
) -> Result<()> {
    let actual_port = listener.local_addr()?.port();

    println!("◆ liquidmix gateway listening on http://{host}:{actual_port}");
    println!("  GET  /health");
    println!("  POST /mix/suggestions");
    println!("  POST /mix/analyze");
    println!("  POST /mix/{{hash}}/vote");
    println!("  GET  /mix/{{hash}}/ratings");
    println!("  GET  /mix/top");
    println!("  Press Ctrl+C to stop.\n");
    info!(host, port = actual_port, ledger = engine.ledger_name(), "gateway started");

    let app = build_router(AppState { engine }, cors_origins);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// All routes with the body limit, timeout and (optional) CORS layers.
pub fn build_router(state: AppState, cors_origins: &[String]) -> Router {
    let router = Router::new()
        .route("/health", get(handle_health))
        .route("/mix/suggestions", post(handle_suggestions))
        .route("/mix/analyze", post(handle_analyze))
        .route("/mix/top", get(handle_top))
        .route("/mix/{hash}/vote", post(handle_vote))
        .route("/mix/{hash}/ratings", get(handle_ratings))
        .with_state(state)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(REQUEST_TIMEOUT_SECS),
        ));

    match cors_layer(cors_origins) {
        Some(cors) => router.layer(cors),
        None => router,
    }
}

fn cors_layer(origins: &[String]) -> Option<CorsLayer> {
    if origins.is_empty() {
        return None;
    }
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);
    if origins.iter().any(|o| o == "*") {
        return Some(base.allow_origin(Any));
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(origin, error = %e, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    Some(base.allow_origin(AllowOrigin::list(parsed)))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!("gateway shutting down");
}
