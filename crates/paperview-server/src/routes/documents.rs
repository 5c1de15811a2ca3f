//! Document listing and streaming routes

use axum::{
    Json, Router,
    body::Body,
    extract::{Path, State},
    http::header::{CACHE_CONTROL, CONTENT_DISPOSITION, CONTENT_TYPE, X_CONTENT_TYPE_OPTIONS},
    response::Response,
    routing::get,
};
use paperview_store::{DocumentItem, StoreError};
use tracing::{debug, error};

use crate::{
    AppState,
    auth::AuthenticatedUser,
    error::{ApiError, Result},
};

/// Create document routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_documents))
        .route("/{key}", get(stream_document))
}

/// List PDF documents, newest first
async fn list_documents(
    _user: AuthenticatedUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<DocumentItem>>> {
    debug!("listing documents");

    let documents = state.store.list_documents().await.map_err(|e| {
        error!("failed to list documents: {e}");
        e
    })?;

    Ok(Json(documents))
}

/// Stream one document for inline viewing
async fn stream_document(
    _user: AuthenticatedUser,
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Response> {
    if key.trim().is_empty() {
        return Err(ApiError::KeyMissing);
    }
    debug!(%key, "streaming document");

    let stream = state.store.open_document(&key).await.map_err(|e| match e {
        StoreError::NotFound(_) | StoreError::InvalidKey(_) => {
            debug!(%key, "document rejected or absent: {e}");
            ApiError::DocumentNotFound(key.clone())
        }
        other => {
            error!(%key, "failed to open document: {other}");
            ApiError::Store(other)
        }
    })?;

    // Inline only, never sniffed, never served stale by a shared cache: a
    // document replaced at the backend must revalidate on the next view.
    Response::builder()
        .header(CONTENT_TYPE, "application/pdf")
        .header(CONTENT_DISPOSITION, "inline")
        .header(X_CONTENT_TYPE_OPTIONS, "nosniff")
        .header(CACHE_CONTROL, "private, no-cache, must-revalidate")
        .body(Body::from_stream(stream))
        .map_err(|e| ApiError::Internal(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;
    use async_trait::async_trait;
    use axum::body::to_bytes;
    use axum::http::{Request, StatusCode, header};
    use paperview_store::{DocumentStore, DocumentStream, MemoryStore};
    use std::sync::Arc;
    use time::macros::datetime;
    use tower::ServiceExt;

    const SECRET: &str = "test-secret";

    struct FailingStore;

    #[async_trait]
    impl DocumentStore for FailingStore {
        async fn list_documents(&self) -> std::result::Result<Vec<DocumentItem>, StoreError> {
            Err(StoreError::Backend("bucket unreachable".into()))
        }

        async fn open_document(
            &self,
            _key: &str,
        ) -> std::result::Result<DocumentStream, StoreError> {
            Err(StoreError::Backend("bucket unreachable".into()))
        }
    }

    fn test_app(store: Arc<dyn DocumentStore>) -> Router {
        let config = ServerConfig {
            session_secret: SECRET.into(),
            ..ServerConfig::default()
        };
        Router::new()
            .nest("/documents", router())
            .with_state(AppState { store, config })
    }

    fn seeded_store() -> Arc<MemoryStore> {
        let store = MemoryStore::new();
        store.insert_with_modified(
            "manual.pdf",
            b"%PDF-1.7 manual".as_slice(),
            Some(datetime!(2025-03-01 00:00 UTC)),
        );
        store.insert_with_modified(
            "older.pdf",
            b"%PDF-1.7 older".as_slice(),
            Some(datetime!(2024-01-01 00:00 UTC)),
        );
        store
            .insert_with_modified("undated.pdf", b"%PDF-1.7 undated".as_slice(), None);
        Arc::new(store)
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {SECRET}"))
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn unauthenticated_requests_are_rejected() {
        for uri in ["/documents", "/documents/manual.pdf"] {
            let response = test_app(seeded_store())
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "for {uri}");
        }
    }

    #[tokio::test]
    async fn wrong_credential_is_rejected() {
        let response = test_app(seeded_store())
            .oneshot(
                Request::builder()
                    .uri("/documents")
                    .header(header::AUTHORIZATION, "Bearer wrong")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn session_cookie_is_accepted() {
        let response = test_app(seeded_store())
            .oneshot(
                Request::builder()
                    .uri("/documents")
                    .header(header::COOKIE, format!("theme=dark; session={SECRET}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn listing_returns_documents_newest_first() {
        let response = test_app(seeded_store())
            .oneshot(get_request("/documents"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let items: Vec<serde_json::Value> = serde_json::from_slice(&body).unwrap();

        let keys: Vec<_> = items.iter().map(|i| i["key"].as_str().unwrap()).collect();
        assert_eq!(keys, ["manual.pdf", "older.pdf", "undated.pdf"]);

        assert_eq!(items[0]["name"], "manual.pdf");
        assert_eq!(items[0]["size"], 15);
        assert_eq!(items[0]["lastModified"], "2025-03-01T00:00:00Z");
        assert!(items[2]["lastModified"].is_null());
    }

    #[tokio::test]
    async fn empty_backend_lists_empty_array() {
        let response = test_app(Arc::new(MemoryStore::new()))
            .oneshot(get_request("/documents"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let items: Vec<serde_json::Value> = serde_json::from_slice(&body).unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn backend_failure_is_a_generic_500() {
        let response = test_app(Arc::new(FailingStore))
            .oneshot(get_request("/documents"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let payload: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(payload["error"], "Internal server error");
        assert!(!body_contains(&body, "unreachable"));
    }

    #[tokio::test]
    async fn streaming_sets_inline_pdf_headers() {
        let response = test_app(seeded_store())
            .oneshot(get_request("/documents/manual.pdf"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let headers = response.headers();
        assert_eq!(headers.get(header::CONTENT_TYPE).unwrap(), "application/pdf");
        assert_eq!(headers.get(header::CONTENT_DISPOSITION).unwrap(), "inline");
        assert_eq!(
            headers.get(header::X_CONTENT_TYPE_OPTIONS).unwrap(),
            "nosniff"
        );
        assert_eq!(
            headers.get(header::CACHE_CONTROL).unwrap(),
            "private, no-cache, must-revalidate"
        );

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"%PDF-1.7 manual");
    }

    #[tokio::test]
    async fn traversal_keys_are_not_found() {
        for uri in [
            "/documents/..%2F..%2Fetc%2Fpasswd",
            "/documents/..",
            "/documents/secret..pdf",
        ] {
            let response = test_app(seeded_store())
                .oneshot(get_request(uri))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "for {uri}");

            let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            let payload: serde_json::Value = serde_json::from_slice(&body).unwrap();
            assert_eq!(payload["error"], "Document not found");
        }
    }

    #[tokio::test]
    async fn missing_document_is_not_found() {
        let response = test_app(seeded_store())
            .oneshot(get_request("/documents/absent.pdf"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn blank_key_is_a_bad_request() {
        let response = test_app(seeded_store())
            .oneshot(get_request("/documents/%20"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    fn body_contains(body: &[u8], needle: &str) -> bool {
        String::from_utf8_lossy(body).contains(needle)
    }
}
