//! Mock server configuration.

use std::net::SocketAddr;

/// Configuration for the mock API server.
#[derive(Debug, Clone)]
pub struct MockServerConfig {
    /// Address to bind the HTTP server to.
    pub bind_addr: SocketAddr,
    /// Page size used when a request has no `per_page`.
    pub default_page_size: usize,
    /// Largest accepted `per_page`; larger values are clamped.
    pub max_page_size: usize,
    /// CORS allowed origins (empty means all).
    pub cors_origins: Vec<String>,
}

impl Default for MockServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            default_page_size: 100,
            max_page_size: 1000,
            cors_origins: Vec::new(),
        }
    }
}

impl MockServerConfig {
    /// Create a new configuration with the specified bind address.
    #[must_use]
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            ..Self::default()
        }
    }

    /// Set the default page size. Zero is raised to one.
    #[must_use]
    pub fn with_default_page_size(mut self, size: usize) -> Self {
        self.default_page_size = size.max(1);
        self
    }

    /// Set the maximum page size. Zero is raised to one.
    #[must_use]
    pub fn with_max_page_size(mut self, size: usize) -> Self {
        self.max_page_size = size.max(1);
        self
    }

    /// Add a CORS allowed origin.
    #[must_use]
    pub fn with_cors_origin(mut self, origin: impl Into<String>) -> Self {
        self.cors_origins.push(origin.into());
        self
    }

    /// Page size for a request asking for `requested` items.
    #[must_use]
    pub fn page_size(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.default_page_size)
            .clamp(1, self.max_page_size.max(1))
    }
}
