//! CLI command implementations.
//!
//! Each submodule implements a specific CLI command:
//! - [`list`] - List a collection
//! - [`get`] - Inspect one resource
//! - [`serve_mock`] - Serve the mock collection API

pub mod get;
pub mod list;
pub mod serve_mock;

pub use get::GetCommand;
pub use list::ListCommand;
pub use serve_mock::ServeMockCommand;
