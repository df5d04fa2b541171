//! # lens-client
//!
//! Paged collection fetching and list reconciliation for the Lens dashboard.
//!
//! ## Architecture
//!
//! ```text
//! input ──► QueryController ──(settled query)──► ListState::request
//!                                                     │
//!                              PageFetcher::fetch_page ◄┘
//!                                     │
//!                    ListState::success / failure ──► ListSnapshot
//! ```
//!
//! - [`fetcher`]: the [`PageFetcher`] seam and its HTTP implementation
//! - [`reconciler`]: [`ListState`], the per-view state machine
//! - [`controller`]: debounced search, immediate status/sort commits
//! - [`view`]: a tokio task tying the above together behind a [`CollectionHandle`]
//! - [`loader`]: sequential paging for non-interactive callers

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod controller;
pub mod debounce;
pub mod error;
pub mod fetcher;
pub mod loader;
pub mod params;
pub mod reconciler;
pub mod view;

pub use config::{ClientConfig, ViewConfig};
pub use controller::QueryController;
pub use debounce::Debouncer;
pub use error::{ClientError, ClientResult};
pub use fetcher::{HttpFetcher, PageFetcher};
pub use loader::PagedLoader;
pub use params::{MemoryParamStore, ParamStore};
pub use reconciler::{Applied, ListItem, ListState, RequestDecision, RequestTicket, Suppressed};
pub use view::{CollectionHandle, CollectionView, ListSnapshot, ViewCommand};
