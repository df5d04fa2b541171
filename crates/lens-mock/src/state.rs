//! Shared state for the mock server.

use std::collections::HashMap;
use std::time::Instant;

use lens_proto::{ListQuery, PageCursor, PageResult, Resource, ResourceKind};
use tokio::sync::RwLock;

use crate::collection::MockCollection;
use crate::config::MockServerConfig;
use crate::error::{MockError, MockResult};

/// Shared state for the mock server: one collection per kind.
#[derive(Debug)]
pub struct MockState {
    /// Server configuration.
    config: MockServerConfig,
    /// Collections by kind. Kinds without an entry are empty.
    collections: RwLock<HashMap<ResourceKind, MockCollection>>,
    /// Server start time.
    start_time: Instant,
}

impl MockState {
    /// Create state with no resources.
    #[must_use]
    pub fn new(config: MockServerConfig) -> Self {
        Self {
            config,
            collections: RwLock::new(HashMap::new()),
            start_time: Instant::now(),
        }
    }

    /// Create state seeded with `collections`.
    ///
    /// Two collections of the same kind are merged, later resources winning.
    #[must_use]
    pub fn with_collections(config: MockServerConfig, collections: Vec<MockCollection>) -> Self {
        let mut by_kind: HashMap<ResourceKind, MockCollection> = HashMap::new();
        for collection in collections {
            match by_kind.get_mut(&collection.kind()) {
                Some(existing) => {
                    for item in collection.items() {
                        existing.insert(item.clone());
                    }
                }
                None => {
                    by_kind.insert(collection.kind(), collection);
                }
            }
        }
        Self {
            config,
            collections: RwLock::new(by_kind),
            start_time: Instant::now(),
        }
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &MockServerConfig {
        &self.config
    }

    /// Seconds since the state was created.
    #[must_use]
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Insert or replace a resource in the `kind` collection.
    pub async fn insert(&self, kind: ResourceKind, item: Resource) -> Option<Resource> {
        let mut collections = self.collections.write().await;
        collections
            .entry(kind)
            .or_insert_with(|| MockCollection::empty(kind))
            .insert(item)
    }

    /// Number of resources in the `kind` collection.
    pub async fn count(&self, kind: ResourceKind) -> usize {
        let collections = self.collections.read().await;
        collections.get(&kind).map_or(0, MockCollection::len)
    }

    /// One page of `kind`.
    ///
    /// `per_page` is clamped to the configured bounds; `None` uses the default.
    ///
    /// # Errors
    ///
    /// Returns [`MockError::InvalidRequest`] if `page` is out of range.
    pub async fn list(
        &self,
        kind: ResourceKind,
        query: &ListQuery,
        page: PageCursor,
        per_page: Option<usize>,
    ) -> MockResult<PageResult> {
        let page_size = self.config.page_size(per_page);
        let collections = self.collections.read().await;
        match collections.get(&kind) {
            Some(collection) => collection.query(query, page, page_size),
            None => MockCollection::empty(kind).query(query, page, page_size),
        }
    }

    /// One resource of `kind` by name.
    ///
    /// # Errors
    ///
    /// Returns [`MockError::NotFound`] if it does not exist.
    pub async fn get(&self, kind: ResourceKind, name: &str) -> MockResult<Resource> {
        let collections = self.collections.read().await;
        collections
            .get(&kind)
            .ok_or_else(|| MockError::NotFound(kind.noun().to_string(), name.to_string()))?
            .get(name)
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{numbered_fixture, sample_dashboard};

    fn state() -> MockState {
        MockState::with_collections(
            MockServerConfig::default().with_default_page_size(10),
            vec![MockCollection::new(
                ResourceKind::HttpRouters,
                numbered_fixture(ResourceKind::HttpRouters, 25),
            )],
        )
    }

    #[tokio::test]
    async fn test_list_uses_default_page_size() {
        let state = state();

        let page = state
            .list(ResourceKind::HttpRouters, &ListQuery::new(), PageCursor::FIRST, None)
            .await
            .unwrap();

        assert_eq!(page.items.len(), 10);
        assert_eq!(page.next_cursor.get(), 2);
    }

    #[tokio::test]
    async fn test_list_clamps_per_page() {
        let state = MockState::with_collections(
            MockServerConfig::default().with_max_page_size(5),
            vec![MockCollection::new(
                ResourceKind::HttpRouters,
                numbered_fixture(ResourceKind::HttpRouters, 25),
            )],
        );

        let page = state
            .list(ResourceKind::HttpRouters, &ListQuery::new(), PageCursor::FIRST, Some(100))
            .await
            .unwrap();

        assert_eq!(page.items.len(), 5);
    }

    #[tokio::test]
    async fn test_missing_kind_is_empty() {
        let state = state();

        let page = state
            .list(ResourceKind::UdpServices, &ListQuery::new(), PageCursor::FIRST, None)
            .await
            .unwrap();

        assert!(page.items.is_empty());
        assert!(page.is_last());
        assert!(state.get(ResourceKind::UdpServices, "x").await.is_err());
    }

    #[tokio::test]
    async fn test_insert_creates_collection() {
        let state = MockState::new(MockServerConfig::default());
        let item = numbered_fixture(ResourceKind::EntryPoints, 1).remove(0);

        assert!(state.insert(ResourceKind::EntryPoints, item).await.is_none());
        assert_eq!(state.count(ResourceKind::EntryPoints).await, 1);
        assert!(state.get(ResourceKind::EntryPoints, "item-00").await.is_ok());
    }

    #[tokio::test]
    async fn test_duplicate_kinds_merge() {
        let mut collections = sample_dashboard();
        collections.push(MockCollection::new(
            ResourceKind::EntryPoints,
            numbered_fixture(ResourceKind::EntryPoints, 2),
        ));

        let state = MockState::with_collections(MockServerConfig::default(), collections);

        assert_eq!(state.count(ResourceKind::EntryPoints).await, 5);
    }
}
