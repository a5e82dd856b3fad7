use crate::core::ledger::{RatedHash, Vote};
use crate::core::mixing::{Composition, CompositionHash, RatedSuggestion, TasteTarget};
use crate::error::MixError;
use axum::{
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Serialize;
use serde_json::Value;

use super::{AppState, MAX_TOP_LIMIT, TopQuery, VoteBody};

const DEFAULT_TOP_LIMIT: usize = 10;

type JsonResponse = (StatusCode, Json<Value>);

#[derive(Serialize)]
struct SuggestionsBody {
    suggestions: Vec<RatedSuggestion>,
}

#[derive(Serialize)]
struct TopBody {
    top: Vec<RatedHash>,
}

fn ok_json<T: Serialize>(value: &T) -> JsonResponse {
    match serde_json::to_value(value) {
        Ok(body) => (StatusCode::OK, Json(body)),
        Err(e) => {
            tracing::error!(error = %e, "failed to serialize response");
            let err = serde_json::json!({"error": "internal error"});
            (StatusCode::INTERNAL_SERVER_ERROR, Json(err))
        }
    }
}

fn bad_json(rejection: &JsonRejection, expected: &str) -> JsonResponse {
    let err = serde_json::json!({
        "error": format!("Invalid JSON: {rejection}. Expected: {expected}")
    });
    (StatusCode::BAD_REQUEST, Json(err))
}

/// Maps engine failures onto HTTP status codes.
pub(super) fn error_response(err: &MixError) -> JsonResponse {
    match err {
        MixError::Validation(e) => {
            let body = serde_json::json!({"error": e.to_string()});
            (StatusCode::UNPROCESSABLE_ENTITY, Json(body))
        }
        MixError::Catalog(e) => {
            tracing::warn!(error = %e, "catalog unavailable");
            let body = serde_json::json!({
                "error": format!("catalog unavailable: {e}"),
                "retryable": e.is_retryable(),
            });
            (StatusCode::BAD_GATEWAY, Json(body))
        }
        MixError::Storage(e) => {
            tracing::warn!(error = %e, "ledger unavailable");
            let body = serde_json::json!({
                "error": format!("ratings unavailable: {e}"),
                "retryable": true,
            });
            (StatusCode::SERVICE_UNAVAILABLE, Json(body))
        }
        MixError::Config(_) | MixError::Other(_) => {
            tracing::error!(error = %err, "unexpected gateway error");
            let body = serde_json::json!({"error": "internal error"});
            (StatusCode::INTERNAL_SERVER_ERROR, Json(body))
        }
    }
}

fn parse_hash(raw: &str) -> Result<CompositionHash, JsonResponse> {
    CompositionHash::parse(raw).map_err(|e| error_response(&MixError::Validation(e)))
}

/// GET /health
pub(super) async fn handle_health(State(state): State<AppState>) -> impl IntoResponse {
    let body = serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "ledger": state.engine.ledger_name(),
    });
    Json(body)
}

/// POST /mix/suggestions
pub(super) async fn handle_suggestions(
    State(state): State<AppState>,
    body: Result<Json<TasteTarget>, JsonRejection>,
) -> impl IntoResponse {
    let Json(target) = match body {
        Ok(b) => b,
        Err(e) => {
            return bad_json(
                &e,
                r#"{"desired_flavor": "fruit", "menthol_level": 0-10, "sweetness": 0-10, "max_liquids": 1-5}"#,
            );
        }
    };

    match state.engine.suggest(&target).await {
        Ok(suggestions) => ok_json(&SuggestionsBody { suggestions }),
        Err(e) => error_response(&e),
    }
}

/// POST /mix/analyze
pub(super) async fn handle_analyze(
    State(state): State<AppState>,
    body: Result<Json<Composition>, JsonRejection>,
) -> impl IntoResponse {
    let Json(composition) = match body {
        Ok(b) => b,
        Err(e) => {
            return bad_json(
                &e,
                r#"{"components": [{"liquid_id": "...", "percentage": 0-100}]}"#,
            );
        }
    };

    match state.engine.analyze(&composition).await {
        Ok(analysis) => ok_json(&analysis),
        Err(e) => error_response(&e),
    }
}

/// POST /mix/{hash}/vote
pub(super) async fn handle_vote(
    State(state): State<AppState>,
    Path(raw_hash): Path<String>,
    body: Result<Json<VoteBody>, JsonRejection>,
) -> impl IntoResponse {
    let hash = match parse_hash(&raw_hash) {
        Ok(hash) => hash,
        Err(response) => return response,
    };
    let Json(vote_body) = match body {
        Ok(b) => b,
        Err(e) => return bad_json(&e, r#"{"like": true}"#),
    };

    match state
        .engine
        .vote(&hash, Vote::from_like(vote_body.like))
        .await
    {
        Ok(counts) => ok_json(&RatedHash { hash, counts }),
        Err(e) => error_response(&e),
    }
}

/// GET /mix/{hash}/ratings
pub(super) async fn handle_ratings(
    State(state): State<AppState>,
    Path(raw_hash): Path<String>,
) -> impl IntoResponse {
    let hash = match parse_hash(&raw_hash) {
        Ok(hash) => hash,
        Err(response) => return response,
    };

    match state.engine.ratings(&hash).await {
        Ok(counts) => ok_json(&RatedHash { hash, counts }),
        Err(e) => error_response(&e),
    }
}

/// GET /mix/top?limit=N
pub(super) async fn handle_top(
    State(state): State<AppState>,
    Query(query): Query<TopQuery>,
) -> impl IntoResponse {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_TOP_LIMIT)
        .clamp(1, MAX_TOP_LIMIT);

    match state.engine.top_rated(limit).await {
        Ok(top) => ok_json(&TopBody { top }),
        Err(e) => error_response(&e),
    }
}
