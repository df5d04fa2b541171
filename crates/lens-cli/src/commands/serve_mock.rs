//! Serve-mock command implementation.

use lens_mock::fixtures::{load_fixture_file, numbered_fixture, sample_dashboard};
use lens_mock::{MockCollection, MockServer, MockServerConfig};
use lens_proto::ResourceKind;
use tracing::info;

use crate::cli::ServeMockArgs;
use crate::error::CliError;

/// Serve-mock command executor.
pub struct ServeMockCommand {
    args: ServeMockArgs,
}

impl ServeMockCommand {
    /// Create a new serve-mock command.
    #[must_use]
    pub fn new(args: ServeMockArgs) -> Self {
        Self { args }
    }

    /// The server configuration these arguments describe.
    #[must_use]
    pub fn config(&self) -> MockServerConfig {
        let mut config = MockServerConfig::new(self.args.bind).with_default_page_size(self.args.page_size);
        config.max_page_size = config.max_page_size.max(config.default_page_size);
        for origin in &self.args.cors_origins {
            config = config.with_cors_origin(origin.as_str());
        }
        config
    }

    /// Collections to serve: a fixture file, generated items, or the sample dashboard.
    ///
    /// # Errors
    ///
    /// Returns an error if the fixture file cannot be loaded.
    pub fn collections(&self) -> Result<Vec<MockCollection>, CliError> {
        if let Some(path) = &self.args.fixture {
            return Ok(load_fixture_file(path)?);
        }
        if let Some(count) = self.args.items {
            return Ok(ResourceKind::ALL
                .into_iter()
                .map(|kind| MockCollection::new(kind, numbered_fixture(kind, count)))
                .collect());
        }
        Ok(sample_dashboard())
    }

    /// Run the server until Ctrl-C.
    ///
    /// # Errors
    ///
    /// Returns an error if the fixture cannot be loaded or the server fails.
    pub async fn execute(&self) -> Result<(), CliError> {
        let collections = self.collections()?;
        let server = MockServer::with_collections(self.config(), collections);

        server
            .serve_with_shutdown(async {
                if tokio::signal::ctrl_c().await.is_ok() {
                    info!("Received Ctrl-C, shutting down");
                }
            })
            .await?;
        Ok(())
    }
}
