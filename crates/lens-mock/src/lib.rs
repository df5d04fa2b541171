//! # lens-mock
//!
//! A deterministic stand-in for the proxy's collection API.
//!
//! [`MockCollection`] holds the paging contract every backend must honour:
//! case-insensitive substring search on names, exact status filtering, stable
//! sorting (default `name`/`asc`), fixed-size pages, and a next cursor of
//! `page + 1` or `1` when no page follows. An empty result is an empty page;
//! asking beyond the last page of a non-empty result is a validation error
//! whose message starts with `invalid request: page:`.
//!
//! The same contract is served over HTTP by [`MockServer`] and in-process by
//! [`InMemoryFetcher`].
//!
//! ## API Endpoints
//!
//! | Endpoint | Method | Description |
//! |----------|--------|-------------|
//! | `/api/health` | GET | Liveness and uptime |
//! | `/api/{kind}` | GET | One page of a collection, `X-Next-Page` / `X-Total-Count` headers |
//! | `/api/{kind}/{name}` | GET | A single resource |

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod collection;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod fixtures;
pub mod handlers;
pub mod routes;
pub mod server;
pub mod state;

pub use collection::MockCollection;
pub use config::MockServerConfig;
pub use error::{MockError, MockResult};
pub use fetcher::InMemoryFetcher;
pub use server::{MockServer, RunningServer};
pub use state::MockState;
