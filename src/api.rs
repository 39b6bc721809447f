// 🌐 HTTP API - axum routes for submitting receipts and fetching points

use crate::error::ReceiptError;
use crate::receipt::{Receipt, ReceiptPayload};
use crate::rules::RuleEngine;
use crate::store::ReceiptStore;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: ReceiptStore,
    pub engine: Arc<RuleEngine>,
}

impl AppState {
    pub fn new(store: ReceiptStore) -> Self {
        AppState {
            store,
            engine: Arc::new(RuleEngine::standard()),
        }
    }
}

// ============================================================================
// RESPONSE TYPES
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct ProcessResponse {
    pub id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PointsResponse {
    pub points: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for ReceiptError {
    fn into_response(self) -> Response {
        let status = match self {
            ReceiptError::Validation { .. } => StatusCode::BAD_REQUEST,
            ReceiptError::NotFound { .. } => StatusCode::NOT_FOUND,
        };

        (status, Json(ErrorResponse { error: self.to_string() })).into_response()
    }
}

// ============================================================================
// HANDLERS
// ============================================================================

/// GET /health - Health check
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// POST /receipts/process - Score a receipt and store the result
async fn process_receipt(
    State(state): State<AppState>,
    payload: Result<Json<ReceiptPayload>, JsonRejection>,
) -> Result<Json<ProcessResponse>, ReceiptError> {
    let Json(payload) = payload.map_err(|rejection| {
        tracing::warn!(error = %rejection.body_text(), "rejected receipt body");
        ReceiptError::validation("body", rejection.body_text())
    })?;

    let points = Receipt::try_from(payload)
        .and_then(|receipt| state.engine.score(&receipt))
        .inspect_err(|e| tracing::warn!(error = %e, "invalid receipt"))?;

    let id = state.store.submit(points);
    tracing::info!(receipt_id = %id, points, "receipt processed");

    Ok(Json(ProcessResponse { id }))
}

/// GET /receipts/:id/points - Points for a previously processed receipt
async fn get_points(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PointsResponse>, ReceiptError> {
    let points = state
        .store
        .lookup(&id)
        .inspect_err(|_| tracing::debug!(receipt_id = %id, "receipt not found"))?;

    Ok(Json(PointsResponse { points }))
}

// ============================================================================
// ROUTER
// ============================================================================

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/receipts/process", post(process_receipt))
        .route("/receipts/:id/points", get(get_points))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    fn canonical_receipt() -> serde_json::Value {
        serde_json::json!({
            "retailer": "Target",
            "purchaseDate": "2022-01-01",
            "purchaseTime": "13:01",
            "items": [
                {"shortDescription": "Pepsi - 12-oz", "price": "1.25"},
                {"shortDescription": "Dasani", "price": "1.40"}
            ],
            "total": "35.35"
        })
    }

    fn post_json(uri: &str, body: String) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn read_json<T: serde::de::DeserializeOwned>(response: Response) -> T {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_process_then_get_points() {
        let store = ReceiptStore::new();
        let app = router(AppState::new(store.clone()));

        let response = app
            .clone()
            .oneshot(post_json("/receipts/process", canonical_receipt().to_string()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let ProcessResponse { id } = read_json(response).await;
        assert_eq!(store.lookup(&id).unwrap(), 18);

        let response = app
            .oneshot(get_request(&format!("/receipts/{}/points", id)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let PointsResponse { points } = read_json(response).await;
        assert_eq!(points, 18);
    }

    #[tokio::test]
    async fn test_unknown_receipt_is_404() {
        let app = router(AppState::new(ReceiptStore::new()));

        let response = app
            .oneshot(get_request("/receipts/does-not-exist/points"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body: ErrorResponse = read_json(response).await;
        assert_eq!(body.error, "Receipt not found");
    }

    #[tokio::test]
    async fn test_bad_date_is_400_and_not_stored() {
        let store = ReceiptStore::new();
        let app = router(AppState::new(store.clone()));

        let mut receipt = canonical_receipt();
        receipt["purchaseDate"] = serde_json::json!("2022-13-45");

        let response = app
            .oneshot(post_json("/receipts/process", receipt.to_string()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body: ErrorResponse = read_json(response).await;
        assert!(body.error.contains("purchaseDate"));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_missing_field_is_400() {
        let app = router(AppState::new(ReceiptStore::new()));

        let mut receipt = canonical_receipt();
        receipt.as_object_mut().unwrap().remove("total");

        let response = app
            .oneshot(post_json("/receipts/process", receipt.to_string()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body: ErrorResponse = read_json(response).await;
        assert!(body.error.starts_with("invalid body"));
    }

    #[tokio::test]
    async fn test_same_receipt_twice_gets_two_ids() {
        let app = router(AppState::new(ReceiptStore::new()));

        let mut ids = Vec::new();
        for _ in 0..2 {
            let response = app
                .clone()
                .oneshot(post_json("/receipts/process", canonical_receipt().to_string()))
                .await
                .unwrap();
            let ProcessResponse { id } = read_json(response).await;
            ids.push(id);
        }

        assert_ne!(ids[0], ids[1]);
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = router(AppState::new(ReceiptStore::new()));

        let response = app.oneshot(get_request("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
