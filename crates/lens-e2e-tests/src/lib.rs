//! End-to-end tests for the Lens list engine.
//!
//! These tests exercise the full stack:
//! - Mock API server startup and shutdown on an ephemeral port
//! - The HTTP page fetcher against real responses and headers
//! - Paged loading and reconciliation across page boundaries
//! - Live collection views driven over HTTP

#![cfg(test)]
