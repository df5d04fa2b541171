//! Turning user input into committed queries.
//!
//! Typing in the search box is echoed immediately but only committed once the
//! input has been quiet for the debounce interval. Status toggles and sort
//! clicks are discrete and commit at once, taking any unsettled search text
//! with them. Only the committed query is ever fetched.

use std::time::Duration;

use lens_proto::query::{QUERY_KEYS, decode, encode};
use lens_proto::{ListQuery, SortDirection, StatusFilter};
use tokio::time::Instant;

use crate::debounce::Debouncer;
use crate::params::ParamStore;

/// Sort field the backend uses when none is given.
pub const DEFAULT_SORT_FIELD: &str = "name";

/// Debounced query state for one view.
#[derive(Debug, Clone)]
pub struct QueryController {
    committed: ListQuery,
    search_input: String,
    debouncer: Debouncer<String>,
}

impl QueryController {
    /// Start from an already committed query.
    #[must_use]
    pub fn new(initial: ListQuery, debounce: Duration) -> Self {
        Self {
            search_input: initial.search().unwrap_or_default().to_string(),
            committed: initial,
            debouncer: Debouncer::new(debounce),
        }
    }

    /// Start from the parameters in `store`, decoded once.
    #[must_use]
    pub fn from_params(store: &dyn ParamStore, debounce: Duration) -> Self {
        Self::new(decode(&store.load()), debounce)
    }

    /// The query currently in effect.
    #[must_use]
    pub fn committed(&self) -> &ListQuery {
        &self.committed
    }

    /// The search box contents, including unsettled edits.
    #[must_use]
    pub fn search_input(&self) -> &str {
        &self.search_input
    }

    /// When pending search input settles.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    /// Record a search edit. Never commits by itself.
    pub fn input_search(&mut self, text: impl Into<String>, now: Instant) {
        let text = text.into();
        self.search_input.clone_from(&text);
        self.debouncer.push(text, now);
    }

    /// Commit settled search input, if any, and if it changes the query.
    pub fn poll(&mut self, now: Instant) -> Option<ListQuery> {
        let search = self.debouncer.poll(now)?;
        self.commit(self.committed.clone().with_search(search))
    }

    /// Change the status filter immediately.
    pub fn set_status(&mut self, status: StatusFilter) -> Option<ListQuery> {
        let base = self.with_unsettled_search();
        self.commit(base.with_status(status))
    }

    /// Sort by `field`. Clicking the active column flips its direction;
    /// any other column starts ascending.
    pub fn sort_by(&mut self, field: &str) -> Option<ListQuery> {
        let base = self.with_unsettled_search();
        let active = base.sort_by().unwrap_or(DEFAULT_SORT_FIELD);
        let direction = if active == field {
            base.direction().unwrap_or_default().toggled()
        } else {
            SortDirection::Asc
        };
        self.commit(base.with_sort_by(field).with_direction(direction))
    }

    /// Replace the whole query immediately.
    pub fn replace(&mut self, query: ListQuery) -> Option<ListQuery> {
        self.debouncer.flush();
        self.search_input = query.search().unwrap_or_default().to_string();
        self.commit(query)
    }

    /// Mirror the committed query into `store`, leaving keys it does not own untouched.
    pub fn mirror_into(&self, store: &dyn ParamStore) {
        store.merge(&QUERY_KEYS, encode(&self.committed));
    }

    fn with_unsettled_search(&mut self) -> ListQuery {
        match self.debouncer.flush() {
            Some(search) => self.committed.clone().with_search(search),
            None => self.committed.clone(),
        }
    }

    fn commit(&mut self, query: ListQuery) -> Option<ListQuery> {
        if query == self.committed {
            return None;
        }
        self.committed = query.clone();
        Some(query)
    }
}
