//! Page cursors and paged results.

use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::resource::Resource;

/// A 1-based page number.
///
/// As a *request* cursor, `1` is the first page. As the *next* cursor returned
/// with a page, `1` means there are no further pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageCursor(NonZeroU32);

impl PageCursor {
    /// The first page, and the "no more pages" sentinel.
    pub const FIRST: Self = Self(NonZeroU32::MIN);

    /// Create a cursor; `None` for page `0`.
    #[must_use]
    pub const fn new(page: u32) -> Option<Self> {
        match NonZeroU32::new(page) {
            Some(page) => Some(Self(page)),
            None => None,
        }
    }

    /// Page number.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0.get()
    }

    /// Whether this is the first page.
    #[must_use]
    pub const fn is_first(self) -> bool {
        self.0.get() == 1
    }

    /// The following page, saturating at `u32::MAX`.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl Default for PageCursor {
    fn default() -> Self {
        Self::FIRST
    }
}

impl fmt::Display for PageCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PageCursor {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<NonZeroU32>().map(Self)
    }
}

/// One page of a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResult<T = Resource> {
    /// Items in server order.
    pub items: Vec<T>,
    /// Cursor for the page after this one; [`PageCursor::FIRST`] when there is none.
    pub next_cursor: PageCursor,
    /// Total number of matching items, when the server reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
}

impl<T> PageResult<T> {
    /// A page with no successor.
    #[must_use]
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            next_cursor: PageCursor::FIRST,
            total: None,
        }
    }

    /// Attach the reported total.
    #[must_use]
    pub fn with_total(mut self, total: u64) -> Self {
        self.total = Some(total);
        self
    }

    /// Whether the server signalled that no further pages exist.
    #[must_use]
    pub fn is_last(&self) -> bool {
        self.next_cursor.is_first()
    }
}
