//! Client and view configuration.

use std::time::Duration;

/// Default quiet interval before a typed search is committed.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Default number of items requested per page.
pub const DEFAULT_PER_PAGE: u32 = 100;

/// Configuration for [`HttpFetcher`](crate::HttpFetcher).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the proxy API, without the `/api` suffix.
    pub base_url: String,
    /// Timeout for a whole request.
    pub request_timeout: Duration,
    /// Timeout for establishing the connection.
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

impl ClientConfig {
    /// Create a configuration for the given base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the connect timeout.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }
}

/// Configuration for a [`CollectionView`](crate::CollectionView).
#[derive(Debug, Clone)]
pub struct ViewConfig {
    /// Items requested per page.
    pub per_page: u32,
    /// Quiet interval before a typed search is committed.
    pub debounce: Duration,
    /// Capacity of the command channel.
    pub command_buffer: usize,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            per_page: DEFAULT_PER_PAGE,
            debounce: DEFAULT_DEBOUNCE,
            command_buffer: 64,
        }
    }
}

impl ViewConfig {
    /// Set the page size. Zero is raised to one.
    #[must_use]
    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page.max(1);
        self
    }

    /// Set the debounce interval.
    #[must_use]
    pub const fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Set the command channel capacity. Zero is raised to one.
    #[must_use]
    pub fn with_command_buffer(mut self, capacity: usize) -> Self {
        self.command_buffer = capacity.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_client_config() {
        let config = ClientConfig::default();

        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_client_config_builder() {
        let config = ClientConfig::new("http://proxy:9000")
            .with_request_timeout(Duration::from_secs(5))
            .with_connect_timeout(Duration::from_secs(1));

        assert_eq!(config.base_url, "http://proxy:9000");
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.connect_timeout, Duration::from_secs(1));
    }

    #[test]
    fn test_default_view_config() {
        let config = ViewConfig::default();

        assert_eq!(config.per_page, 100);
        assert_eq!(config.debounce, Duration::from_millis(500));
    }

    #[test]
    fn test_view_config_clamps_zero() {
        let config = ViewConfig::default().with_per_page(0).with_command_buffer(0);

        assert_eq!(config.per_page, 1);
        assert_eq!(config.command_buffer, 1);
    }
}
