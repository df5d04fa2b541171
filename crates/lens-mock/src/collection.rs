//! In-memory collection with the backend paging contract.

use std::cmp::Ordering;

use lens_proto::{ListQuery, PageCursor, PageResult, Resource, ResourceKind, SortDirection};
use tracing::trace;

use crate::error::{MockError, MockResult};

/// Sort fields the collection understands. Anything else sorts by name.
pub const SORT_FIELDS: [&str; 7] = ["name", "status", "provider", "priority", "rule", "type", "address"];

/// One resource collection served by the mock API.
#[derive(Debug, Clone)]
pub struct MockCollection {
    kind: ResourceKind,
    items: Vec<Resource>,
}

/// Comparable projection of one sort field.
///
/// Missing values sort first in ascending order, numbers before text.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum SortValue {
    Missing,
    Number(i64),
    Text(String),
}

impl SortValue {
    fn text(value: Option<&str>) -> Self {
        match value {
            Some(v) if !v.is_empty() => Self::Text(v.to_lowercase()),
            _ => Self::Missing,
        }
    }

    fn of(resource: &Resource, field: &str) -> Self {
        match (field, resource) {
            ("status", r) => Self::Text(r.status().as_str().to_string()),
            ("provider", r) => Self::text(r.provider()),
            ("priority", Resource::Router(r)) => r.priority.map_or(Self::Missing, Self::Number),
            ("rule", Resource::Router(r)) => Self::text(r.rule.as_deref()),
            ("type", Resource::Service(s)) => Self::text(s.service_type.as_deref()),
            ("type", Resource::Middleware(m)) => Self::text(m.middleware_type.as_deref()),
            ("address", Resource::EntryPoint(e)) => Self::text(Some(&e.address)),
            ("priority" | "rule" | "type" | "address", _) => Self::Missing,
            (_, r) => Self::text(Some(r.name())),
        }
    }
}

impl MockCollection {
    /// Create a collection holding `items` in the given order.
    ///
    /// Later items replace earlier ones with the same name.
    #[must_use]
    pub fn new(kind: ResourceKind, items: Vec<Resource>) -> Self {
        let mut collection = Self {
            kind,
            items: Vec::with_capacity(items.len()),
        };
        for item in items {
            collection.insert(item);
        }
        collection
    }

    /// An empty collection.
    #[must_use]
    pub fn empty(kind: ResourceKind) -> Self {
        Self::new(kind, Vec::new())
    }

    /// The collection kind.
    #[must_use]
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Number of stored resources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the collection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// All stored resources in insertion order.
    #[must_use]
    pub fn items(&self) -> &[Resource] {
        &self.items
    }

    /// Insert or replace a resource by name, returning the replaced one.
    pub fn insert(&mut self, item: Resource) -> Option<Resource> {
        match self.items.iter_mut().find(|existing| existing.name() == item.name()) {
            Some(existing) => Some(std::mem::replace(existing, item)),
            None => {
                self.items.push(item);
                None
            }
        }
    }

    /// Look up a resource by exact name.
    ///
    /// # Errors
    ///
    /// Returns [`MockError::NotFound`] if no resource has that name.
    pub fn get(&self, name: &str) -> MockResult<&Resource> {
        self.items
            .iter()
            .find(|item| item.name() == name)
            .ok_or_else(|| MockError::NotFound(self.kind.noun().to_string(), name.to_string()))
    }

    /// Resources matching `query`, sorted, before chunking.
    #[must_use]
    pub fn filtered(&self, query: &ListQuery) -> Vec<&Resource> {
        let needle = query.search().map(str::to_lowercase);
        let status = query.status();

        let mut matched: Vec<&Resource> = self
            .items
            .iter()
            .filter(|item| status.matches(item.status()))
            .filter(|item| {
                needle
                    .as_deref()
                    .is_none_or(|n| item.name().to_lowercase().contains(n))
            })
            .collect();

        let field = query.sort_by().unwrap_or("name");
        let direction = query.direction().unwrap_or_default();
        matched.sort_by(|a, b| {
            let ordering = compare(a, b, field);
            match direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });
        matched
    }

    /// One page of the resources matching `query`.
    ///
    /// An empty match is an empty last page for every `page`.
    ///
    /// # Errors
    ///
    /// Returns [`MockError::InvalidRequest`] with a `page:` message when
    /// `page` is beyond the last page of a non-empty match.
    pub fn query(&self, query: &ListQuery, page: PageCursor, page_size: usize) -> MockResult<PageResult> {
        let page_size = page_size.max(1);
        let matched = self.filtered(query);
        let total = matched.len() as u64;

        if matched.is_empty() {
            trace!(kind = %self.kind, page = %page, "empty result");
            return Ok(PageResult::last(Vec::new()).with_total(0));
        }

        let chunks = matched.len().div_ceil(page_size);
        let index = page.get() as usize - 1;
        if index >= chunks {
            return Err(MockError::InvalidRequest(format!(
                "page: {page} is beyond the last page ({chunks})"
            )));
        }

        let items: Vec<Resource> = matched
            .into_iter()
            .skip(index * page_size)
            .take(page_size)
            .cloned()
            .collect();
        let next_cursor = if index + 1 < chunks { page.next() } else { PageCursor::FIRST };

        trace!(kind = %self.kind, page = %page, count = items.len(), next = %next_cursor, "page served");
        Ok(PageResult {
            items,
            next_cursor,
            total: Some(total),
        })
    }
}

fn compare(a: &Resource, b: &Resource, field: &str) -> Ordering {
    SortValue::of(a, field).cmp(&SortValue::of(b, field))
}
