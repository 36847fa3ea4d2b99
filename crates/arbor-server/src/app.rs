//! Router construction.
//!
//! Builds the axum router with all routes and middleware.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::security;
use crate::state::AppState;

/// Create the application router.
///
/// # Arguments
///
/// * `state` - Shared application state
pub(crate) fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(handlers::health::healthz))
        .route("/", get(handlers::pages::get_root_page))
        .route("/{*path}", get(handlers::pages::get_page))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(security::csp_layer())
                .layer(security::content_type_options_layer())
                .layer(security::frame_options_layer()),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use arbor_client::{Backend, MockBackend, MockFailure, Resource};
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use pretty_assertions::assert_eq;
    use tower::ServiceExt;

    use super::*;

    fn router(backend: MockBackend) -> Router {
        create_router(Arc::new(AppState {
            backend: Arc::new(backend) as Arc<dyn Backend>,
            max_redirects: 10,
            version: "test".to_owned(),
        }))
    }

    async fn get(router: Router, uri: &str) -> axum::response::Response {
        router
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_healthz() {
        let response = get(router(MockBackend::new()), "/healthz").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "ok");
    }

    #[tokio::test]
    async fn test_document_page() {
        let backend = MockBackend::new()
            .with_document("/about", "About", "<p>about us</p>")
            .with_navigation("/about", &[("/about", "About")])
            .with_breadcrumbs("/about", &[("/about", "About")]);

        let response = get(router(backend), "/about").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(header::ETAG));
        assert_eq!(
            response.headers()["x-frame-options"],
            "DENY"
        );
        let html = body_text(response).await;
        assert!(html.contains("<title>About</title>"));
        assert!(html.contains("<p>about us</p>"));
        assert!(html.contains("&gt; <a href=\"/about\">About</a>"));
    }

    #[tokio::test]
    async fn test_folder_redirects_with_see_other() {
        let backend = MockBackend::new()
            .with_folder("/news", "News", &["/news/2024-item"])
            .with_document("/news/2024-item", "Item", "<p>hi</p>");

        let response = get(router(backend), "/news").await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/news/2024-item");
    }

    #[tokio::test]
    async fn test_root_page() {
        let backend = MockBackend::new().with_document("/", "Home", "<p>welcome</p>");
        let response = get(router(backend), "/").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains("<p>welcome</p>"));
    }

    #[tokio::test]
    async fn test_missing_content_is_404_with_chrome() {
        let backend = MockBackend::new().with_navigation("/missing", &[("/other", "Other")]);
        let response = get(router(backend), "/missing").await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_text(response).await.contains("<a href=\"/other\">Other</a>"));
    }

    #[tokio::test]
    async fn test_backend_outage_is_502() {
        let backend =
            MockBackend::new().with_failure(Resource::Content, "/a", MockFailure::Network);
        let response = get(router(backend), "/a").await;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_cycle_is_loop_detected_not_redirect() {
        let backend = MockBackend::new()
            .with_folder("/a", "A", &["/b"])
            .with_folder("/b", "B", &["/a"]);
        let response = get(router(backend), "/a").await;

        assert_eq!(response.status(), StatusCode::LOOP_DETECTED);
        assert!(body_text(response).await.contains("redirect cycle"));
    }

    #[tokio::test]
    async fn test_conditional_request_not_modified() {
        let backend = MockBackend::new().with_document("/a", "A", "<p>a</p>");
        let router = router(backend);

        let first = get(router.clone(), "/a").await;
        let etag = first.headers()[header::ETAG].clone();

        let response = router
            .oneshot(
                Request::get("/a")
                    .header(header::IF_NONE_MATCH, etag)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_MODIFIED);
    }

    #[tokio::test]
    async fn test_security_headers_on_pages_and_errors() {
        let backend = MockBackend::new().with_document("/a", "A", "<p>a</p>");
        let router = router(backend);

        for uri in ["/a", "/missing"] {
            let response = get(router.clone(), uri).await;
            let headers = response.headers();
            let csp = headers[header::CONTENT_SECURITY_POLICY].to_str().unwrap();
            assert!(csp.contains("script-src 'none'"), "{uri}: {csp}");
            assert!(csp.contains("img-src * data:"), "{uri}: {csp}");
            assert_eq!(headers[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
            assert_eq!(headers[header::X_FRAME_OPTIONS], "DENY");
        }
    }

    #[tokio::test]
    async fn test_relative_segment_rejected() {
        let response = get(router(MockBackend::new()), "/a/%2E%2E/b").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
