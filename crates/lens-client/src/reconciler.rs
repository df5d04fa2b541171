//! The list reconciler: one collection view's accumulated pages.
//!
//! [`ListState`] merges successive page responses into a single list. A page
//! of the query context already on screen is appended; a page for a new
//! context (or a fresh first page) replaces everything. Every request is
//! tagged with a [`RequestTicket`]; responses whose ticket is no longer the
//! one in flight are discarded, which is how superseded and cleared requests
//! are cancelled logically.
//!
//! The state is owned by exactly one view and mutated only through
//! [`request`](ListState::request), [`success`](ListState::success),
//! [`failure`](ListState::failure) and [`clear`](ListState::clear).

use std::collections::HashSet;

use lens_proto::{FetchError, ListQuery, PageCursor, PageResult, Resource};
use tracing::{debug, trace};

/// An item that can be reconciled into a list.
pub trait ListItem {
    /// Name that is unique within a collection.
    fn name(&self) -> &str;
}

impl ListItem for Resource {
    fn name(&self) -> &str {
        Resource::name(self)
    }
}

/// Tag identifying one issued page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTicket {
    generation: u64,
    query: ListQuery,
    page: PageCursor,
}

impl RequestTicket {
    /// Query the request was issued for.
    #[must_use]
    pub fn query(&self) -> &ListQuery {
        &self.query
    }

    /// Requested page.
    #[must_use]
    pub fn page(&self) -> PageCursor {
        self.page
    }
}

/// Why a request was not issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suppressed {
    /// The same query and page is already in flight.
    Duplicate,
    /// Another page of the same context is in flight.
    Busy,
    /// The current context has no further pages.
    EndReached,
}

/// Outcome of [`ListState::request`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestDecision {
    /// Perform the fetch and report back with this ticket.
    Issue(RequestTicket),
    /// Do nothing.
    Suppressed(Suppressed),
}

impl RequestDecision {
    /// The ticket, if a fetch should be issued.
    #[must_use]
    pub fn ticket(self) -> Option<RequestTicket> {
        match self {
            Self::Issue(ticket) => Some(ticket),
            Self::Suppressed(_) => None,
        }
    }
}

/// How a successful page was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// The list was replaced by this page.
    Replaced {
        /// Items now in the list.
        count: usize,
    },
    /// The page was appended to the list.
    Appended {
        /// Items added.
        added: usize,
        /// Items dropped because their name was already listed.
        skipped: usize,
    },
    /// The response belonged to a superseded or out-of-order request.
    Stale,
}

/// Accumulated items and fetch status for one collection view.
#[derive(Debug, Clone)]
pub struct ListState<T = Resource> {
    items: Vec<T>,
    loading: bool,
    error: Option<FetchError>,
    end_reached: bool,
    current_query: Option<ListQuery>,
    current_page: Option<PageCursor>,
    total: Option<u64>,
    in_flight: Option<RequestTicket>,
    generation: u64,
}

impl<T> Default for ListState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            error: None,
            end_reached: false,
            current_query: None,
            current_page: None,
            total: None,
            in_flight: None,
            generation: 0,
        }
    }
}

impl<T: ListItem> ListState<T> {
    /// An empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulated items in arrival order.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Consume the state, keeping the items.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Whether a page request is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Last fetch error, cleared by the next success.
    #[must_use]
    pub fn error(&self) -> Option<&FetchError> {
        self.error.as_ref()
    }

    /// The error to show the user. The page-out-of-range signal is an
    /// end-of-data marker and is never shown.
    #[must_use]
    pub fn banner_error(&self) -> Option<&FetchError> {
        self.error.as_ref().filter(|err| !err.is_page_out_of_range())
    }

    /// Whether the current context has no further pages.
    #[must_use]
    pub fn end_reached(&self) -> bool {
        self.end_reached
    }

    /// Query the accumulated items belong to.
    #[must_use]
    pub fn current_query(&self) -> Option<&ListQuery> {
        self.current_query.as_ref()
    }

    /// Last successfully applied page.
    #[must_use]
    pub fn current_page(&self) -> Option<PageCursor> {
        self.current_page
    }

    /// Last total reported for the current query. Advisory only.
    #[must_use]
    pub fn total(&self) -> Option<u64> {
        self.total
    }

    /// The request currently awaiting a response.
    #[must_use]
    pub fn in_flight(&self) -> Option<&RequestTicket> {
        self.in_flight.as_ref()
    }

    /// Page to request next for the current context.
    #[must_use]
    pub fn next_page(&self) -> PageCursor {
        self.current_page.map_or(PageCursor::FIRST, PageCursor::next)
    }

    fn is_current_context(&self, query: &ListQuery) -> bool {
        self.current_query.as_ref() == Some(query)
    }

    /// Ask to fetch `page` of `query`.
    ///
    /// Suppressed when the identical request is already in flight, when a
    /// different page of the same context is in flight, or when asking for a
    /// continuation page after the end was reached. A request for another
    /// context supersedes whatever is in flight.
    pub fn request(&mut self, query: &ListQuery, page: PageCursor) -> RequestDecision {
        if let Some(in_flight) = self.in_flight.as_ref().filter(|t| t.query == *query) {
            let reason = if in_flight.page == page {
                Suppressed::Duplicate
            } else {
                Suppressed::Busy
            };
            trace!(page = %page, ?reason, "page request suppressed");
            return RequestDecision::Suppressed(reason);
        }

        let same_context = self.is_current_context(query);
        if same_context && !page.is_first() && self.end_reached {
            trace!(page = %page, "page request past end of data");
            return RequestDecision::Suppressed(Suppressed::EndReached);
        }

        if let Some(in_flight) = &self.in_flight {
            debug!(
                superseded_page = %in_flight.page,
                page = %page,
                "superseding in-flight request for another query"
            );
            // q1 -> q2 -> q1 must not let the first q1 response match again
            self.generation += 1;
        }
        if !same_context || page.is_first() {
            self.end_reached = false;
        }

        let ticket = RequestTicket {
            generation: self.generation,
            query: query.clone(),
            page,
        };
        self.loading = true;
        self.in_flight = Some(ticket.clone());
        RequestDecision::Issue(ticket)
    }

    /// Apply a successful page.
    ///
    /// Continuation pages of the current context are appended, skipping names
    /// already listed. First pages and pages of another context replace the
    /// list. Responses for tickets that are no longer in flight, and
    /// continuation pages at or before the current page, are discarded.
    pub fn success(&mut self, ticket: &RequestTicket, page: PageResult<T>) -> Applied {
        if self.in_flight.as_ref() != Some(ticket) {
            debug!(page = %ticket.page, "discarding response for stale request");
            return Applied::Stale;
        }
        self.in_flight = None;
        self.loading = false;

        let same_context = self.is_current_context(&ticket.query);
        let applied = if same_context && !ticket.page.is_first() {
            if self.current_page.is_some_and(|current| ticket.page <= current) {
                debug!(page = %ticket.page, "discarding out-of-order page");
                return Applied::Stale;
            }
            self.append(page.items)
        } else {
            self.replace(page.items)
        };

        self.current_query = Some(ticket.query.clone());
        self.current_page = Some(ticket.page);
        self.total = page.total;
        self.error = None;
        self.end_reached = page.next_cursor.is_first();
        applied
    }

    /// Apply a failed fetch.
    ///
    /// Returns `false` when the ticket is stale and nothing changed. A
    /// page-out-of-range error marks the end of data; any other error leaves
    /// `end_reached` untouched so the same page can be retried.
    pub fn failure(&mut self, ticket: &RequestTicket, error: FetchError) -> bool {
        if self.in_flight.as_ref() != Some(ticket) {
            debug!(page = %ticket.page, error = %error, "discarding failure for stale request");
            return false;
        }
        self.in_flight = None;
        self.loading = false;
        if error.is_page_out_of_range() {
            debug!(page = %ticket.page, "page out of range, end of data");
            self.end_reached = true;
        }
        self.error = Some(error);
        true
    }

    /// Reset to the empty state. Outstanding tickets become stale.
    pub fn clear(&mut self) {
        let generation = self.generation + 1;
        *self = Self {
            generation,
            ..Self::default()
        };
    }

    fn append(&mut self, incoming: Vec<T>) -> Applied {
        let mut seen: HashSet<String> = self.items.iter().map(|i| i.name().to_string()).collect();
        let before = self.items.len();
        let mut skipped = 0;
        for item in incoming {
            if seen.insert(item.name().to_string()) {
                self.items.push(item);
            } else {
                skipped += 1;
            }
        }
        if skipped > 0 {
            debug!(skipped, "dropped items already listed");
        }
        Applied::Appended {
            added: self.items.len() - before,
            skipped,
        }
    }

    fn replace(&mut self, incoming: Vec<T>) -> Applied {
        let mut seen = HashSet::new();
        self.items = incoming
            .into_iter()
            .filter(|item| seen.insert(item.name().to_string()))
            .collect();
        Applied::Replaced {
            count: self.items.len(),
        }
    }
}
