//! # lens-cli
//!
//! Command-line access to proxy dashboard collections.
//!
//! Provides commands for:
//! - Listing a collection one page at a time, or all of it
//! - Inspecting a single resource
//! - Serving the mock collection API locally
//!
//! Listing drives the same reconciler the interactive views use, so paging,
//! end detection and error classification behave identically.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod commands;
pub mod error;
pub mod output;

pub use cli::{Cli, Commands, Format, GetArgs, ListArgs, ServeMockArgs};
pub use error::CliError;
pub use output::OutputFormat;
