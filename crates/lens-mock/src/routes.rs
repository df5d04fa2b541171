//! Route configuration for the mock API.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::Router;
use axum::extract::{Path, Query, State};
use axum::routing::get;
use lens_proto::ResourceKind;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::MockServerConfig;
use crate::handlers::{get_route, health_check, list_route};
use crate::state::MockState;

/// Create the mock API router.
///
/// Every [`ResourceKind`] gets a collection route at `/api/{path}` and a
/// detail route at `/api/{path}/{name}`.
pub fn create_router(state: Arc<MockState>) -> Router {
    let cors = build_cors_layer(state.config());

    let mut api_routes = Router::new().route("/health", get(health_check));
    for kind in ResourceKind::ALL {
        api_routes = api_routes
            .route(
                &format!("/{}", kind.path()),
                get(
                    move |state: State<Arc<MockState>>, params: Query<BTreeMap<String, String>>| {
                        list_route(kind, state, params)
                    },
                ),
            )
            .route(
                &format!("/{}/{{name}}", kind.path()),
                get(move |state: State<Arc<MockState>>, name: Path<String>| {
                    get_route(kind, state, name)
                }),
            );
    }

    Router::new()
        .nest("/api", api_routes)
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Build the CORS layer based on configuration.
///
/// The paging headers are exposed so browser clients can read them.
fn build_cors_layer(config: &MockServerConfig) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers(Any);

    if config.cors_origins.is_empty() {
        base.allow_origin(Any)
    } else {
        let origins: Vec<_> = config
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();

        base.allow_origin(origins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::MockCollection;
    use crate::fixtures::{numbered_fixture, sample_dashboard};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use lens_client::fetcher::{NEXT_PAGE_HEADER, TOTAL_COUNT_HEADER};
    use tower::ServiceExt;

    fn make_test_state() -> Arc<MockState> {
        let mut collections = sample_dashboard();
        collections.push(MockCollection::new(
            ResourceKind::HttpServices,
            numbered_fixture(ResourceKind::HttpServices, 25),
        ));
        Arc::new(MockState::with_collections(
            MockServerConfig::default().with_default_page_size(10),
            collections,
        ))
    }

    async fn get_json(uri: &str) -> (StatusCode, axum::http::HeaderMap, serde_json::Value) {
        let app = create_router(make_test_state());
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&body).unwrap();
        (status, headers, json)
    }

    fn header(headers: &axum::http::HeaderMap, name: &str) -> String {
        headers.get(name).unwrap().to_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let (status, _, json) = get_json("/api/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn test_list_first_page() {
        let (status, headers, json) = get_json("/api/http/services").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json.as_array().unwrap().len(), 10);
        assert_eq!(header(&headers, NEXT_PAGE_HEADER), "2");
        assert_eq!(header(&headers, TOTAL_COUNT_HEADER), "27");
    }

    #[tokio::test]
    async fn test_list_last_page_points_back_to_first() {
        let (status, headers, json) = get_json("/api/http/services?page=3&per_page=10").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json.as_array().unwrap().len(), 7);
        assert_eq!(header(&headers, NEXT_PAGE_HEADER), "1");
    }

    #[tokio::test]
    async fn test_list_beyond_last_page() {
        let (status, _, json) = get_json("/api/http/services?page=4").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "invalid_request");
        assert!(
            json["message"]
                .as_str()
                .unwrap()
                .contains(lens_proto::PAGE_OUT_OF_RANGE_PATTERN)
        );
    }

    #[tokio::test]
    async fn test_list_filters_and_sorts() {
        let (status, _, json) =
            get_json("/api/http/routers?status=enabled&sortBy=priority&direction=desc").await;

        assert_eq!(status, StatusCode::OK);
        let names: Vec<&str> = json
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["api@internal", "dashboard@internal", "whoami@docker"]);
    }

    #[tokio::test]
    async fn test_list_empty_search() {
        let (status, headers, json) = get_json("/api/entrypoints?search=nothing&page=5").await;

        assert_eq!(status, StatusCode::OK);
        assert!(json.as_array().unwrap().is_empty());
        assert_eq!(header(&headers, NEXT_PAGE_HEADER), "1");
    }

    #[tokio::test]
    async fn test_invalid_status_rejected() {
        let (status, _, json) = get_json("/api/http/routers?status=sideways").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(
            !json["message"]
                .as_str()
                .unwrap()
                .contains(lens_proto::PAGE_OUT_OF_RANGE_PATTERN)
        );
    }

    #[tokio::test]
    async fn test_get_resource() {
        let (status, _, json) = get_json("/api/http/routers/whoami@docker").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["name"], "whoami@docker");
        assert_eq!(json["rule"], "Host(`whoami.localhost`)");
    }

    #[tokio::test]
    async fn test_get_resource_not_found() {
        let (status, _, json) = get_json("/api/tcp/services/nope").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "not_found");
        assert_eq!(json["message"], "service not found: nope");
    }
}
