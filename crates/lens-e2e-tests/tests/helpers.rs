//! Test helpers for E2E tests.

#![allow(dead_code)]

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use lens_client::{ClientConfig, HttpFetcher, PageFetcher};
use lens_mock::fixtures::numbered_fixture;
use lens_mock::{MockCollection, MockServer, MockServerConfig, RunningServer};
use lens_proto::{Resource, ResourceKind, ResourceStatus};

/// Default test timeout.
pub const TEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Install a test subscriber honouring `RUST_LOG`. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A mock API served over HTTP for the duration of a test.
pub struct TestApi {
    server: Option<RunningServer>,
    base_url: String,
}

impl TestApi {
    /// Serve `collections` on an ephemeral port with the given default page size.
    pub async fn start(collections: Vec<MockCollection>, page_size: usize) -> Self {
        init_tracing();
        let config = MockServerConfig::new(SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 0))
            .with_default_page_size(page_size);
        let server = MockServer::with_collections(config, collections)
            .spawn()
            .await
            .expect("mock server should start");
        let base_url = server.base_url();
        Self {
            server: Some(server),
            base_url,
        }
    }

    /// Serve `count` numbered resources of `kind`.
    pub async fn numbered(kind: ResourceKind, count: usize, page_size: usize) -> Self {
        Self::start(vec![MockCollection::new(kind, numbered_fixture(kind, count))], page_size).await
    }

    /// Base URL of the running server.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// An HTTP fetcher pointed at this server.
    pub fn fetcher(&self) -> Arc<dyn PageFetcher> {
        let config = ClientConfig::new(self.base_url.as_str()).with_request_timeout(TEST_TIMEOUT);
        Arc::new(HttpFetcher::new(&config).expect("valid base URL"))
    }

    /// Stop the server.
    pub async fn shutdown(mut self) {
        if let Some(server) = self.server.take() {
            server.shutdown().await.expect("clean shutdown");
        }
    }
}

/// `count` routers named `item-00`.. whose status alternates
/// `enabled`/`disabled`, starting with `enabled`.
pub fn alternating_routers(count: usize) -> MockCollection {
    let items = numbered_fixture(ResourceKind::HttpRouters, count)
        .into_iter()
        .enumerate()
        .map(|(i, item)| match item {
            Resource::Router(mut router) => {
                router.status = if i % 2 == 0 {
                    ResourceStatus::Enabled
                } else {
                    ResourceStatus::Disabled
                };
                Resource::Router(router)
            }
            other => other,
        })
        .collect();
    MockCollection::new(ResourceKind::HttpRouters, items)
}
