//! A live collection view.
//!
//! [`CollectionView::spawn`] starts a tokio task that owns one [`ListState`]
//! and one [`QueryController`]. Commands arrive over an mpsc channel; every
//! change is published as a [`ListSnapshot`] on a watch channel.
//!
//! Within a view at most one page fetch runs at a time. Committing a new
//! query aborts the running fetch, clears the state and requests page 1; a
//! response that still arrives for the old query carries a stale ticket and
//! is dropped by the reconciler.

use std::future::pending;
use std::sync::Arc;

use lens_proto::{FetchError, ListQuery, PageCursor, PageResult, Resource, ResourceKind, StatusFilter};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, info, trace};

use crate::config::ViewConfig;
use crate::controller::QueryController;
use crate::error::{ClientError, ClientResult};
use crate::fetcher::PageFetcher;
use crate::params::ParamStore;
use crate::reconciler::{Applied, ListState, RequestDecision, RequestTicket};

/// Input to a running view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewCommand {
    /// The search box changed.
    SearchInput(String),
    /// A status filter was selected.
    SetStatus(StatusFilter),
    /// A column header was clicked.
    SortBy(String),
    /// The end of the rendered list came into view.
    LoadMore,
    /// The user asked to retry after an error.
    Retry,
    /// Re-fetch the first page of the current query.
    Refresh,
    /// Stop the view.
    Shutdown,
}

/// What the UI renders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListSnapshot {
    /// Accumulated items.
    pub items: Vec<Resource>,
    /// A page request is in flight.
    pub loading: bool,
    /// Error to show, if any.
    pub error: Option<FetchError>,
    /// No further pages exist for the committed query.
    pub end_reached: bool,
    /// Advisory total for the committed query.
    pub total: Option<u64>,
    /// Last page applied.
    pub current_page: Option<PageCursor>,
    /// The committed query.
    pub query: ListQuery,
    /// The search box contents.
    pub search_input: String,
}

impl ListSnapshot {
    /// Show the inline error affordance: an error and nothing to list.
    #[must_use]
    pub fn shows_inline_error(&self) -> bool {
        self.error.is_some() && self.items.is_empty()
    }
}

/// Entry point for spawning collection views.
#[derive(Debug, Clone, Copy)]
pub struct CollectionView;

impl CollectionView {
    /// Spawn a view task for `kind`.
    ///
    /// The initial query is decoded from `params` once; the first page is
    /// requested immediately.
    pub fn spawn(
        kind: ResourceKind,
        fetcher: Arc<dyn PageFetcher>,
        params: Arc<dyn ParamStore>,
        config: ViewConfig,
    ) -> CollectionHandle {
        let controller = QueryController::from_params(params.as_ref(), config.debounce);
        let (command_tx, command_rx) = mpsc::channel(config.command_buffer);
        let (snapshot_tx, snapshot_rx) = watch::channel(ListSnapshot {
            query: controller.committed().clone(),
            search_input: controller.search_input().to_string(),
            ..ListSnapshot::default()
        });

        let (result_tx, result_rx) = mpsc::unbounded_channel();
        let task = ViewTask {
            kind,
            fetcher,
            params,
            per_page: config.per_page,
            controller,
            state: ListState::new(),
            fetch: None,
            result_tx,
            snapshot_tx,
        };
        let handle = tokio::spawn(task.run(command_rx, result_rx));

        CollectionHandle {
            kind,
            commands: command_tx,
            snapshots: snapshot_rx,
            task: handle,
        }
    }
}

type FetchOutcome = (RequestTicket, Result<PageResult, FetchError>);

struct ViewTask {
    kind: ResourceKind,
    fetcher: Arc<dyn PageFetcher>,
    params: Arc<dyn ParamStore>,
    per_page: u32,
    controller: QueryController,
    state: ListState,
    fetch: Option<JoinHandle<()>>,
    result_tx: mpsc::UnboundedSender<FetchOutcome>,
    snapshot_tx: watch::Sender<ListSnapshot>,
}

impl ViewTask {
    async fn run(
        mut self,
        mut commands: mpsc::Receiver<ViewCommand>,
        mut results: mpsc::UnboundedReceiver<FetchOutcome>,
    ) {
        debug!(kind = %self.kind, query = ?self.controller.committed(), "collection view started");
        self.request(PageCursor::FIRST);
        self.publish();

        loop {
            let deadline = self.controller.deadline();
            tokio::select! {
                command = commands.recv() => match command {
                    Some(ViewCommand::Shutdown) | None => break,
                    Some(command) => self.handle(command),
                },
                Some((ticket, outcome)) = results.recv() => self.apply(&ticket, outcome),
                () = wait_until(deadline) => {
                    if let Some(query) = self.controller.poll(Instant::now()) {
                        self.commit(query);
                    }
                }
            }
            self.publish();
        }

        self.abort_fetch();
        info!(kind = %self.kind, "collection view closed");
    }

    fn handle(&mut self, command: ViewCommand) {
        trace!(kind = %self.kind, ?command, "view command");
        match command {
            ViewCommand::SearchInput(text) => {
                self.controller.input_search(text, Instant::now());
            }
            ViewCommand::SetStatus(status) => {
                if let Some(query) = self.controller.set_status(status) {
                    self.commit(query);
                }
            }
            ViewCommand::SortBy(field) => {
                if let Some(query) = self.controller.sort_by(&field) {
                    self.commit(query);
                }
            }
            ViewCommand::LoadMore | ViewCommand::Retry => {
                let page = self.state.next_page();
                self.request(page);
            }
            ViewCommand::Refresh => self.request(PageCursor::FIRST),
            ViewCommand::Shutdown => {}
        }
    }

    fn commit(&mut self, query: ListQuery) {
        info!(kind = %self.kind, query = %query.to_query_string(), "query committed");
        self.controller.mirror_into(self.params.as_ref());
        self.abort_fetch();
        self.state.clear();
        self.request(PageCursor::FIRST);
    }

    fn request(&mut self, page: PageCursor) {
        let query = self.controller.committed().clone();
        let ticket = match self.state.request(&query, page) {
            RequestDecision::Issue(ticket) => ticket,
            RequestDecision::Suppressed(reason) => {
                trace!(kind = %self.kind, page = %page, ?reason, "request suppressed");
                return;
            }
        };

        self.abort_fetch();
        let fetcher = self.fetcher.clone();
        let results = self.result_tx.clone();
        let kind = self.kind;
        let per_page = self.per_page;
        self.fetch = Some(tokio::spawn(async move {
            let outcome = fetcher
                .fetch_page(kind, ticket.query(), ticket.page(), per_page)
                .await;
            // the view may already be gone
            let _ = results.send((ticket, outcome));
        }));
    }

    fn apply(&mut self, ticket: &RequestTicket, outcome: Result<PageResult, FetchError>) {
        match outcome {
            Ok(page) => {
                let applied = self.state.success(ticket, page);
                if applied != Applied::Stale {
                    debug!(kind = %self.kind, page = %ticket.page(), ?applied, "page applied");
                }
            }
            Err(err) => {
                if self.state.failure(ticket, err.clone()) && !err.is_page_out_of_range() {
                    info!(kind = %self.kind, page = %ticket.page(), error = %err, "page fetch failed");
                }
            }
        }
    }

    fn abort_fetch(&mut self) {
        if let Some(fetch) = self.fetch.take() {
            fetch.abort();
        }
    }

    fn publish(&self) {
        let snapshot = ListSnapshot {
            items: self.state.items().to_vec(),
            loading: self.state.is_loading(),
            error: self.state.banner_error().cloned(),
            end_reached: self.state.end_reached(),
            total: self.state.total(),
            current_page: self.state.current_page(),
            query: self.controller.committed().clone(),
            search_input: self.controller.search_input().to_string(),
        };
        self.snapshot_tx.send_if_modified(|current| {
            if *current == snapshot {
                false
            } else {
                *current = snapshot;
                true
            }
        });
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => pending().await,
    }
}

/// Handle to a running collection view.
///
/// Dropping the handle closes the command channel, which stops the view and
/// discards any pending fetch.
#[derive(Debug)]
pub struct CollectionHandle {
    kind: ResourceKind,
    commands: mpsc::Sender<ViewCommand>,
    snapshots: watch::Receiver<ListSnapshot>,
    task: JoinHandle<()>,
}

impl CollectionHandle {
    /// Collection this view lists.
    #[must_use]
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Latest snapshot.
    #[must_use]
    pub fn snapshot(&self) -> ListSnapshot {
        self.snapshots.borrow().clone()
    }

    /// A receiver that observes every published snapshot.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ListSnapshot> {
        self.snapshots.clone()
    }

    /// Wait until a snapshot satisfies `predicate`.
    pub async fn wait_for(
        &mut self,
        predicate: impl FnMut(&ListSnapshot) -> bool,
    ) -> ClientResult<ListSnapshot> {
        self.snapshots
            .wait_for(predicate)
            .await
            .map(|snapshot| snapshot.clone())
            .map_err(|_| ClientError::ViewClosed)
    }

    /// Send a command to the view.
    pub async fn send(&self, command: ViewCommand) -> ClientResult<()> {
        self.commands
            .send(command)
            .await
            .map_err(|_| ClientError::ViewClosed)
    }

    /// The search box changed.
    pub async fn search(&self, text: impl Into<String>) -> ClientResult<()> {
        self.send(ViewCommand::SearchInput(text.into())).await
    }

    /// Select a status filter.
    pub async fn set_status(&self, status: StatusFilter) -> ClientResult<()> {
        self.send(ViewCommand::SetStatus(status)).await
    }

    /// Click a column header.
    pub async fn sort_by(&self, field: impl Into<String>) -> ClientResult<()> {
        self.send(ViewCommand::SortBy(field.into())).await
    }

    /// Request the next page.
    pub async fn load_more(&self) -> ClientResult<()> {
        self.send(ViewCommand::LoadMore).await
    }

    /// Retry after an error.
    pub async fn retry(&self) -> ClientResult<()> {
        self.send(ViewCommand::Retry).await
    }

    /// Re-fetch the first page.
    pub async fn refresh(&self) -> ClientResult<()> {
        self.send(ViewCommand::Refresh).await
    }

    /// Stop the view and wait for it to finish.
    pub async fn shutdown(self) {
        let _ = self.commands.send(ViewCommand::Shutdown).await;
        let _ = self.task.await;
    }
}
