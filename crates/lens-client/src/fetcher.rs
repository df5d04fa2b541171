//! Fetching pages and single resources.
//!
//! [`PageFetcher`] is the seam between the reconciler and the network. The
//! HTTP implementation talks to the proxy API:
//!
//! | Request | Response |
//! |---------|----------|
//! | `GET /api/{kind}?search=..&status=..&sortBy=..&direction=..&page=N&per_page=M` | JSON array, `X-Next-Page` header |
//! | `GET /api/{kind}/{name}` | JSON object, or 404 with `{ "message": .. }` |

use async_trait::async_trait;
use lens_proto::query::encode;
use lens_proto::{FetchError, ListQuery, PageCursor, PageResult, Resource, ResourceKind};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use tracing::{debug, trace, warn};
use url::Url;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Response header carrying the next page cursor.
pub const NEXT_PAGE_HEADER: &str = "x-next-page";

/// Response header carrying the total number of matching items.
pub const TOTAL_COUNT_HEADER: &str = "x-total-count";

/// Source of collection pages.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch one page of `kind` matching `query`.
    async fn fetch_page(
        &self,
        kind: ResourceKind,
        query: &ListQuery,
        page: PageCursor,
        per_page: u32,
    ) -> Result<PageResult, FetchError>;

    /// Fetch a single resource by name.
    async fn fetch_one(&self, kind: ResourceKind, name: &str) -> Result<Resource, FetchError>;
}

/// Error body returned by the API.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// [`PageFetcher`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    base_url: Url,
}

impl HttpFetcher {
    /// Build a fetcher from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is not an `http(s)` URL or the HTTP
    /// client cannot be built.
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ClientError::Config(format!("invalid API URL {}: {e}", config.base_url)))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ClientError::Config(format!(
                "invalid API URL: {}, must start with http:// or https://",
                config.base_url
            )));
        }

        let client = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| ClientError::Config(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    /// Base URL requests are issued against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, kind: ResourceKind, name: Option<&str>) -> Result<Url, FetchError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| FetchError::Transport(format!("cannot build URL from {}", self.base_url)))?;
            segments.pop_if_empty().push("api").extend(kind.path().split('/'));
            if let Some(name) = name {
                segments.push(name);
            }
        }
        Ok(url)
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch_page(
        &self,
        kind: ResourceKind,
        query: &ListQuery,
        page: PageCursor,
        per_page: u32,
    ) -> Result<PageResult, FetchError> {
        let url = self.endpoint(kind, None)?;
        let mut params: Vec<(String, String)> = encode(query).into_iter().collect();
        params.push(("page".to_string(), page.to_string()));
        params.push(("per_page".to_string(), per_page.to_string()));

        debug!(kind = %kind, page = %page, per_page, "fetching page");
        let response = self
            .client
            .get(url)
            .query(&params)
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(error_from_response(kind, None, response).await);
        }

        let next_cursor = match response.headers().get(NEXT_PAGE_HEADER) {
            Some(value) => value
                .to_str()
                .ok()
                .and_then(|v| v.parse::<PageCursor>().ok())
                .ok_or_else(|| FetchError::Decode(format!("invalid {NEXT_PAGE_HEADER} header: {value:?}")))?,
            None => PageCursor::FIRST,
        };
        let total = response
            .headers()
            .get(TOTAL_COUNT_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());

        let body: Vec<serde_json::Value> = response.json().await.map_err(transport_error)?;
        let items = body
            .into_iter()
            .map(|value| kind.decode(value))
            .collect::<Result<Vec<_>, _>>()?;

        trace!(kind = %kind, page = %page, count = items.len(), next = %next_cursor, "page fetched");
        Ok(PageResult {
            items,
            next_cursor,
            total,
        })
    }

    async fn fetch_one(&self, kind: ResourceKind, name: &str) -> Result<Resource, FetchError> {
        let url = self.endpoint(kind, Some(name))?;

        debug!(kind = %kind, name, "fetching resource");
        let response = self.client.get(url).send().await.map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(error_from_response(kind, Some(name), response).await);
        }

        let value: serde_json::Value = response.json().await.map_err(transport_error)?;
        kind.decode(value)
    }
}

fn transport_error(err: reqwest::Error) -> FetchError {
    if err.is_decode() {
        FetchError::Decode(err.to_string())
    } else {
        FetchError::Transport(err.to_string())
    }
}

/// Classify a non-success response.
async fn error_from_response(kind: ResourceKind, name: Option<&str>, response: Response) -> FetchError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|b| b.message)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_string());

    classify(kind, name, status, message)
}

fn classify(kind: ResourceKind, name: Option<&str>, status: StatusCode, message: String) -> FetchError {
    if status.is_client_error() {
        if let (StatusCode::NOT_FOUND, Some(name)) = (status, name) {
            return FetchError::NotFound {
                kind: kind.noun().to_string(),
                name: name.to_string(),
            };
        }
        if matches!(status, StatusCode::BAD_REQUEST | StatusCode::NOT_FOUND | StatusCode::UNPROCESSABLE_ENTITY)
            || message.contains(lens_proto::PAGE_OUT_OF_RANGE_PATTERN)
        {
            return FetchError::Validation { message };
        }
    }

    warn!(kind = %kind, status = status.as_u16(), message = %message, "request failed");
    FetchError::Status {
        status: status.as_u16(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lens_proto::StatusFilter;

    fn fetcher(base: &str) -> HttpFetcher {
        HttpFetcher::new(&ClientConfig::new(base)).unwrap()
    }

    #[test]
    fn test_rejects_non_http_urls() {
        let err = HttpFetcher::new(&ClientConfig::new("ws://localhost:8080")).unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));

        let err = HttpFetcher::new(&ClientConfig::new("not a url")).unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
    }

    #[test]
    fn test_collection_endpoint_joins_paths() {
        let f = fetcher("http://proxy:8080");
        let url = f.endpoint(ResourceKind::TcpServices, None).unwrap();
        assert_eq!(url.as_str(), "http://proxy:8080/api/tcp/services");

        let f = fetcher("http://proxy:8080/traefik/");
        let url = f.endpoint(ResourceKind::HttpRouters, None).unwrap();
        assert_eq!(url.as_str(), "http://proxy:8080/traefik/api/http/routers");
    }

    #[test]
    fn test_detail_endpoint_escapes_name() {
        let f = fetcher("http://proxy:8080");
        let url = f
            .endpoint(ResourceKind::HttpMiddlewares, Some("strip/prefix@file"))
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://proxy:8080/api/http/middlewares/strip%2Fprefix@file"
        );
    }

    #[test]
    fn test_detail_404_is_not_found() {
        let err = classify(
            ResourceKind::HttpRouters,
            Some("web@file"),
            StatusCode::NOT_FOUND,
            "router not found: web@file".into(),
        );
        assert_eq!(
            err,
            FetchError::NotFound {
                kind: "router".into(),
                name: "web@file".into()
            }
        );
    }

    #[test]
    fn test_page_out_of_range_is_validation() {
        let err = classify(
            ResourceKind::HttpRouters,
            None,
            StatusCode::BAD_REQUEST,
            "invalid request: page: 4 is beyond the last page (3)".into(),
        );
        assert!(err.is_page_out_of_range());
    }

    #[test]
    fn test_pattern_with_unusual_client_status_is_still_validation() {
        let err = classify(
            ResourceKind::HttpServices,
            None,
            StatusCode::RANGE_NOT_SATISFIABLE,
            "invalid request: page: 9".into(),
        );
        assert!(err.is_page_out_of_range());
    }

    #[test]
    fn test_server_errors_keep_status() {
        let err = classify(
            ResourceKind::EntryPoints,
            None,
            StatusCode::BAD_GATEWAY,
            "Bad Gateway".into(),
        );
        assert_eq!(
            err,
            FetchError::Status {
                status: 502,
                message: "Bad Gateway".into()
            }
        );
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport_error() {
        let f = HttpFetcher::new(
            &ClientConfig::new("http://127.0.0.1:1")
                .with_connect_timeout(std::time::Duration::from_millis(200)),
        )
        .unwrap();
        let query = ListQuery::new().with_status(StatusFilter::Enabled);

        let err = f
            .fetch_page(ResourceKind::HttpRouters, &query, PageCursor::FIRST, 10)
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Transport(_)));
        assert!(err.is_retryable());
    }
}
