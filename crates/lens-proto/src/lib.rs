//! # lens-proto
//!
//! Data model shared by the Lens dashboard list engine and its mock API.
//!
//! - [`ListQuery`] and its flat key-value codec ([`query::encode`], [`query::decode`])
//! - [`PageCursor`] and [`PageResult`] for paged collection responses
//! - [`Resource`], a tagged union over the dashboard's collection kinds
//! - [`FetchError`], the error taxonomy every fetcher reports in

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod page;
pub mod query;
pub mod resource;

pub use error::{FetchError, PAGE_OUT_OF_RANGE_PATTERN};
pub use page::{PageCursor, PageResult};
pub use query::{ListQuery, SortDirection, StatusFilter};
pub use resource::{
    EntryPoint, Middleware, Resource, ResourceKind, ResourceStatus, Router, RouterTls, Service,
};
