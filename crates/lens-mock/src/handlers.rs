//! HTTP request handlers for the mock API.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, HeaderName, HeaderValue};
use axum::response::{IntoResponse, Response};
use lens_client::fetcher::{NEXT_PAGE_HEADER, TOTAL_COUNT_HEADER};
use lens_proto::query::{DIRECTION_KEY, STATUS_KEY, decode};
use lens_proto::{PageCursor, Resource, ResourceKind, SortDirection, StatusFilter};
use serde::Serialize;
use tracing::debug;

use crate::error::{MockError, MockResult};
use crate::state::MockState;

/// Query parameter selecting the page.
pub const PAGE_PARAM: &str = "page";

/// Query parameter selecting the page size.
pub const PER_PAGE_PARAM: &str = "per_page";

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status message.
    pub status: String,
    /// Server uptime in seconds.
    pub uptime_secs: u64,
}

/// Handle GET /api/health - health check endpoint.
pub async fn health_check(State(state): State<Arc<MockState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        uptime_secs: state.uptime_secs(),
    })
}

/// Handle GET /api/{kind} - one page of a collection.
///
/// The body is the JSON array of items; `X-Next-Page` carries the next
/// cursor and `X-Total-Count` the number of matching items.
pub async fn list_resources(
    state: Arc<MockState>,
    kind: ResourceKind,
    params: BTreeMap<String, String>,
) -> MockResult<Response> {
    let page = parse_page(&params)?;
    let per_page = parse_per_page(&params)?;
    validate_filters(&params)?;
    let query = decode(&params);

    debug!(kind = %kind, page = %page, ?per_page, query = %query.to_query_string(), "listing");
    let result = state.list(kind, &query, page, per_page).await?;

    let mut headers = HeaderMap::new();
    headers.insert(
        HeaderName::from_static(NEXT_PAGE_HEADER),
        HeaderValue::from(result.next_cursor.get()),
    );
    if let Some(total) = result.total {
        headers.insert(HeaderName::from_static(TOTAL_COUNT_HEADER), HeaderValue::from(total));
    }

    Ok((headers, Json(result.items)).into_response())
}

/// Handle GET /api/{kind}/{name} - a single resource.
pub async fn get_resource(state: Arc<MockState>, kind: ResourceKind, name: String) -> MockResult<Json<Resource>> {
    state.get(kind, &name).await.map(Json)
}

/// Route adapter for [`list_resources`].
pub(crate) async fn list_route(
    kind: ResourceKind,
    State(state): State<Arc<MockState>>,
    Query(params): Query<BTreeMap<String, String>>,
) -> MockResult<Response> {
    list_resources(state, kind, params).await
}

/// Route adapter for [`get_resource`].
pub(crate) async fn get_route(
    kind: ResourceKind,
    State(state): State<Arc<MockState>>,
    Path(name): Path<String>,
) -> MockResult<Json<Resource>> {
    get_resource(state, kind, name).await
}

fn parse_page(params: &BTreeMap<String, String>) -> MockResult<PageCursor> {
    match params.get(PAGE_PARAM) {
        None => Ok(PageCursor::FIRST),
        Some(raw) => raw
            .parse()
            .map_err(|_| MockError::InvalidRequest(format!("invalid page parameter: {raw}"))),
    }
}

fn parse_per_page(params: &BTreeMap<String, String>) -> MockResult<Option<usize>> {
    params
        .get(PER_PAGE_PARAM)
        .map(|raw| {
            raw.trim()
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| MockError::InvalidRequest(format!("invalid per_page parameter: {raw}")))
        })
        .transpose()
}

/// Reject filter values the collection cannot interpret.
fn validate_filters(params: &BTreeMap<String, String>) -> MockResult<()> {
    if let Some(raw) = params.get(STATUS_KEY) {
        raw.parse::<StatusFilter>()
            .map_err(|e| MockError::InvalidRequest(e.to_string()))?;
    }
    if let Some(raw) = params.get(DIRECTION_KEY) {
        raw.parse::<SortDirection>()
            .map_err(|e| MockError::InvalidRequest(e.to_string()))?;
    }
    Ok(())
}
