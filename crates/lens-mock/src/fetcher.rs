//! In-process [`PageFetcher`] over the mock state.

use std::sync::Arc;

use async_trait::async_trait;
use lens_client::PageFetcher;
use lens_proto::{FetchError, ListQuery, PageCursor, PageResult, Resource, ResourceKind};

use crate::collection::MockCollection;
use crate::config::MockServerConfig;
use crate::state::MockState;

/// Serves the mock API contract without HTTP.
///
/// Errors are the ones an HTTP client would classify from the same answers,
/// so views behave identically against either.
#[derive(Debug, Clone)]
pub struct InMemoryFetcher {
    state: Arc<MockState>,
}

impl InMemoryFetcher {
    /// Wrap shared mock state.
    #[must_use]
    pub fn new(state: Arc<MockState>) -> Self {
        Self { state }
    }

    /// A fetcher over `collections` with default limits.
    #[must_use]
    pub fn from_collections(collections: Vec<MockCollection>) -> Self {
        Self::new(Arc::new(MockState::with_collections(
            MockServerConfig::default(),
            collections,
        )))
    }

    /// The underlying state.
    #[must_use]
    pub fn state(&self) -> &Arc<MockState> {
        &self.state
    }
}

#[async_trait]
impl PageFetcher for InMemoryFetcher {
    async fn fetch_page(
        &self,
        kind: ResourceKind,
        query: &ListQuery,
        page: PageCursor,
        per_page: u32,
    ) -> Result<PageResult, FetchError> {
        self.state
            .list(kind, query, page, Some(per_page as usize))
            .await
            .map_err(FetchError::from)
    }

    async fn fetch_one(&self, kind: ResourceKind, name: &str) -> Result<Resource, FetchError> {
        self.state.get(kind, name).await.map_err(FetchError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::numbered_fixture;
    use lens_client::PagedLoader;

    fn fetcher(count: usize) -> Arc<InMemoryFetcher> {
        Arc::new(InMemoryFetcher::from_collections(vec![MockCollection::new(
            ResourceKind::HttpRouters,
            numbered_fixture(ResourceKind::HttpRouters, count),
        )]))
    }

    #[tokio::test]
    async fn test_out_of_range_classifies_like_http() {
        let err = fetcher(5)
            .fetch_page(ResourceKind::HttpRouters, &ListQuery::new(), PageCursor::new(2).unwrap(), 10)
            .await
            .unwrap_err();

        assert!(err.is_page_out_of_range());
    }

    #[tokio::test]
    async fn test_fetch_one_not_found() {
        let err = fetcher(5)
            .fetch_one(ResourceKind::HttpRouters, "missing")
            .await
            .unwrap_err();

        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_loader_collects_everything() {
        let mut loader = PagedLoader::new(fetcher(25), ResourceKind::HttpRouters, ListQuery::new(), 10);

        let state = loader.load_all().await.unwrap();

        assert_eq!(state.items().len(), 25);
        assert!(state.end_reached());
        assert_eq!(state.total(), Some(25));
    }
}
