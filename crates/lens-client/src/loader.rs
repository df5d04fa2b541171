//! Sequential paging without a UI loop.
//!
//! [`PagedLoader`] drives a [`ListState`] directly: one request at a time,
//! each awaited before the next. Used by the CLI and by callers that want a
//! whole collection rather than an interactive view.

use std::sync::Arc;

use lens_proto::{FetchError, ListQuery, ResourceKind};
use tracing::debug;

use crate::fetcher::PageFetcher;
use crate::reconciler::{Applied, ListState, RequestDecision};

/// Loads pages of one collection into a [`ListState`].
pub struct PagedLoader {
    fetcher: Arc<dyn PageFetcher>,
    kind: ResourceKind,
    per_page: u32,
    query: ListQuery,
    state: ListState,
}

impl std::fmt::Debug for PagedLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PagedLoader")
            .field("kind", &self.kind)
            .field("per_page", &self.per_page)
            .field("query", &self.query)
            .finish_non_exhaustive()
    }
}

impl PagedLoader {
    /// Create a loader for `kind` filtered by `query`.
    #[must_use]
    pub fn new(fetcher: Arc<dyn PageFetcher>, kind: ResourceKind, query: ListQuery, per_page: u32) -> Self {
        Self {
            fetcher,
            kind,
            per_page: per_page.max(1),
            query,
            state: ListState::new(),
        }
    }

    /// The accumulated state.
    #[must_use]
    pub fn state(&self) -> &ListState {
        &self.state
    }

    /// Consume the loader, keeping the state.
    #[must_use]
    pub fn into_state(self) -> ListState {
        self.state
    }

    /// Fetch the next page.
    ///
    /// Returns `Ok(None)` when there is nothing left to fetch. A page-out-of-range
    /// answer is end of data, not an error.
    pub async fn load_next(&mut self) -> Result<Option<Applied>, FetchError> {
        let page = self.state.next_page();
        let ticket = match self.state.request(&self.query, page) {
            RequestDecision::Issue(ticket) => ticket,
            RequestDecision::Suppressed(reason) => {
                debug!(kind = %self.kind, page = %page, ?reason, "nothing to load");
                return Ok(None);
            }
        };

        match self
            .fetcher
            .fetch_page(self.kind, &self.query, page, self.per_page)
            .await
        {
            Ok(result) => Ok(Some(self.state.success(&ticket, result))),
            Err(err) => {
                let end_of_data = err.is_page_out_of_range();
                self.state.failure(&ticket, err.clone());
                if end_of_data { Ok(None) } else { Err(err) }
            }
        }
    }

    /// Fetch pages until the end of data.
    ///
    /// Stops at the first error other than page-out-of-range.
    pub async fn load_all(&mut self) -> Result<&ListState, FetchError> {
        while self.load_next().await?.is_some() {}
        Ok(&self.state)
    }
}
