//! HTTP handlers for volume blob operations

use crate::volume::storage::BlobStorage;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
struct AppState {
    storage: Arc<Mutex<BlobStorage>>,
}

#[derive(Serialize)]
struct KeyListResponse {
    keys: Vec<String>,
}

/// Creates the router with all volume endpoints
pub fn create_router(storage: Arc<Mutex<BlobStorage>>) -> Router {
    let state = AppState { storage };

    Router::new()
        .route("/", get(health_check))
        .route("/health", get(health_check))
        .route("/blobs", get(list_blobs))
        .route("/blobs/:key", post(put_blob))
        .route("/blobs/:key", get(get_blob))
        .with_state(state)
}

async fn health_check() -> &'static str {
    "ok"
}

async fn list_blobs(State(state): State<AppState>) -> impl IntoResponse {
    let storage = state.storage.lock().expect("blob storage lock poisoned");
    Json(KeyListResponse { keys: storage.list_keys() })
}

async fn put_blob(
    State(state): State<AppState>,
    Path(key): Path<String>,
    body: axum::body::Bytes,
) -> Response {
    let mut storage = state.storage.lock().expect("blob storage lock poisoned");
    match storage.put(&key, &body) {
        Ok(meta) => (StatusCode::CREATED, Json(meta)).into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

async fn get_blob(State(state): State<AppState>, Path(key): Path<String>) -> Response {
    let mut storage = state.storage.lock().expect("blob storage lock poisoned");
    match storage.get(&key) {
        Ok(Some(data)) => (StatusCode::OK, data).into_response(),
        Ok(None) => StatusCode::NOT_FOUND.into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode as HttpStatus};
    use tempfile::tempdir;
    use tower::ServiceExt;

    fn setup_test_storage() -> Arc<Mutex<BlobStorage>> {
        let dir = tempdir().unwrap();
        Arc::new(Mutex::new(
            BlobStorage::new(dir.into_path(), "test-vol".to_string()).unwrap(),
        ))
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let storage = setup_test_storage();
        let app = create_router(storage);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatus::OK);
    }

    #[tokio::test]
    async fn test_put_and_get_blob() {
        let storage = setup_test_storage();
        let app = create_router(storage);

        let put_response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/blobs/test-key")
                    .body(Body::from("test data"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(put_response.status(), HttpStatus::CREATED);

        let get_response = app
            .oneshot(
                Request::builder()
                    .uri("/blobs/test-key")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(get_response.status(), HttpStatus::OK);
    }
}
