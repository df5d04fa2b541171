//! Mock server implementation.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::collection::MockCollection;
use crate::config::MockServerConfig;
use crate::error::{MockError, MockResult};
use crate::routes::create_router;
use crate::state::MockState;

/// Mock server for the collection API.
#[derive(Debug, Clone)]
pub struct MockServer {
    state: Arc<MockState>,
}

impl MockServer {
    /// Create a server with no resources.
    #[must_use]
    pub fn new(config: MockServerConfig) -> Self {
        Self {
            state: Arc::new(MockState::new(config)),
        }
    }

    /// Create a server seeded with `collections`.
    #[must_use]
    pub fn with_collections(config: MockServerConfig, collections: Vec<MockCollection>) -> Self {
        Self {
            state: Arc::new(MockState::with_collections(config, collections)),
        }
    }

    /// Get the server state for external access.
    #[must_use]
    pub fn state(&self) -> Arc<MockState> {
        self.state.clone()
    }

    /// Start the server on the configured address.
    ///
    /// This method runs until the server encounters a fatal error.
    ///
    /// # Errors
    ///
    /// Returns an error if binding to the address fails.
    pub async fn serve(&self) -> MockResult<()> {
        self.serve_with_shutdown(std::future::pending()).await
    }

    /// Start the server with graceful shutdown support.
    ///
    /// The server will shut down when the provided future completes.
    ///
    /// # Errors
    ///
    /// Returns an error if binding to the address fails.
    pub async fn serve_with_shutdown<F>(&self, shutdown: F) -> MockResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = self.bind().await?;
        run(listener, self.router(), shutdown).await
    }

    /// Bind, then serve in a background task.
    ///
    /// Binding to port `0` picks a free port; [`RunningServer::addr`] reports it.
    ///
    /// # Errors
    ///
    /// Returns an error if binding to the address fails.
    pub async fn spawn(&self) -> MockResult<RunningServer> {
        let listener = self.bind().await?;
        let addr = listener
            .local_addr()
            .map_err(|e| MockError::Internal(e.to_string()))?;
        let (tx, rx) = oneshot::channel::<()>();
        let router = self.router();

        let task = tokio::spawn(async move {
            run(listener, router, async {
                let _ = rx.await;
            })
            .await
        });

        Ok(RunningServer {
            addr,
            shutdown: Some(tx),
            task,
        })
    }

    /// Create the router without starting the server.
    ///
    /// Useful for testing or embedding in another server.
    pub fn router(&self) -> axum::Router {
        create_router(self.state.clone())
    }

    async fn bind(&self) -> MockResult<TcpListener> {
        let addr = self.state.config().bind_addr;
        TcpListener::bind(addr)
            .await
            .map_err(|e| MockError::BindFailed(addr, e))
    }
}

async fn run<F>(listener: TcpListener, router: axum::Router, shutdown: F) -> MockResult<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener
        .local_addr()
        .map_err(|e| MockError::Internal(e.to_string()))?;
    info!(addr = %addr, "Mock API listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| MockError::Internal(e.to_string()))?;

    info!(addr = %addr, "Mock API shut down");
    Ok(())
}

/// A mock server running in a background task.
#[derive(Debug)]
pub struct RunningServer {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<MockResult<()>>,
}

impl RunningServer {
    /// The bound address.
    #[must_use]
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Base URL for clients, e.g. `http://127.0.0.1:41234`.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Stop accepting connections and wait for the server to finish.
    ///
    /// # Errors
    ///
    /// Returns an error if the server task failed.
    pub async fn shutdown(mut self) -> MockResult<()> {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        match (&mut self.task).await {
            Ok(result) => result,
            Err(e) => Err(MockError::Internal(e.to_string())),
        }
    }
}

impl Drop for RunningServer {
    fn drop(&mut self) {
        if self.shutdown.is_some() {
            warn!(addr = %self.addr, "Mock API dropped without shutdown, aborting");
            self.task.abort();
        }
    }
}
