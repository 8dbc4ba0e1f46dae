use crate::{handlers, limit, limit::FolderLimit};
use axum::{Extension, Router, middleware, routing::get};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};
use tracing::Level;

/// Assembles the application router. When a folder limit is configured the
/// gate middleware wraps every route, so requests are admission-checked
/// before any handler runs.
pub fn create_app(folder_limit: Option<FolderLimit>) -> Router {
    let mut app = Router::new()
        // Administrative folder size query
        .route("/foldersize", get(handlers::get_folder_size));

    // The Extension layer sits outside the gate so the middleware can
    // extract its configuration.
    if let Some(folder_limit) = folder_limit {
        app = app
            .layer(middleware::from_fn(limit::enforce_folder_limit))
            .layer(Extension(folder_limit));
    }

    app
        // Add CORS layer for broader client compatibility
        .layer(CorsLayer::permissive())
        // Add tracing for HTTP requests and responses
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::new().level(Level::INFO)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use http_body_util::BodyExt;
    use std::fs;
    use tempfile::TempDir;
    use tower::ServiceExt;

    async fn get_response(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, body.to_vec())
    }

    #[tokio::test]
    async fn query_without_folder_param_is_bad_request() {
        let (status, body) = get_response(create_app(None), "/foldersize").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, b"folder parameter is required");
    }

    #[tokio::test]
    async fn query_with_empty_folder_param_is_bad_request() {
        let (status, _) = get_response(create_app(None), "/foldersize?folder=").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn query_reports_size_of_empty_folder_as_zero() {
        let dir = TempDir::new().unwrap();
        let uri = format!("/foldersize?folder={}", dir.path().display());

        let response = create_app(None)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["folder"], dir.path().display().to_string());
        assert_eq!(json["size"], 0);
    }

    #[tokio::test]
    async fn query_sums_nested_folder_contents() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.bin"), vec![0u8; 100]).unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir(&sub).unwrap();
        fs::write(sub.join("b.bin"), vec![0u8; 28]).unwrap();

        let uri = format!("/foldersize?folder={}", dir.path().display());
        let (status, body) = get_response(create_app(None), &uri).await;

        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["size"], 128);
    }

    #[tokio::test]
    async fn query_on_missing_folder_is_server_error() {
        let dir = TempDir::new().unwrap();
        let uri = format!("/foldersize?folder={}/absent", dir.path().display());

        let (status, body) = get_response(create_app(None), &uri).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        // Body carries the underlying filesystem error message.
        assert!(!body.is_empty());
    }

    fn gated_app(dir: &TempDir, max_size: u64) -> Router {
        create_app(Some(FolderLimit {
            folder_path: dir.path().to_path_buf(),
            max_size,
        }))
    }

    #[tokio::test]
    async fn gate_rejects_requests_while_folder_exceeds_limit() {
        let watched = TempDir::new().unwrap();
        fs::write(watched.path().join("blob.bin"), vec![0u8; 11]).unwrap();

        let queried = TempDir::new().unwrap();
        let uri = format!("/foldersize?folder={}", queried.path().display());

        let (status, body) = get_response(gated_app(&watched, 10), &uri).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body, b"Folder size limit exceeded");
    }

    #[tokio::test]
    async fn gate_forwards_requests_while_folder_is_within_limit() {
        let watched = TempDir::new().unwrap();
        fs::write(watched.path().join("blob.bin"), vec![0u8; 9]).unwrap();

        let queried = TempDir::new().unwrap();
        let uri = format!("/foldersize?folder={}", queried.path().display());

        let (status, _) = get_response(gated_app(&watched, 10), &uri).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn gate_admits_folder_exactly_at_limit() {
        let watched = TempDir::new().unwrap();
        fs::write(watched.path().join("blob.bin"), vec![0u8; 10]).unwrap();

        let queried = TempDir::new().unwrap();
        let uri = format!("/foldersize?folder={}", queried.path().display());

        // The limit is exceeded only on strictly greater sizes.
        let (status, _) = get_response(gated_app(&watched, 10), &uri).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn gate_rescans_folder_on_every_request() {
        let watched = TempDir::new().unwrap();
        let blob = watched.path().join("blob.bin");
        fs::write(&blob, vec![0u8; 11]).unwrap();

        let queried = TempDir::new().unwrap();
        let uri = format!("/foldersize?folder={}", queried.path().display());
        let app = gated_app(&watched, 10);

        let (status, _) = get_response(app.clone(), &uri).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        // Shrinking the folder takes effect on the very next request.
        fs::write(&blob, vec![0u8; 9]).unwrap();
        let (status, _) = get_response(app, &uri).await;
        assert_eq!(status, StatusCode::OK);
    }
}
