//! # Song Catalog API
//!
//! Backend for a song catalog: browse songs page by page, search them by
//! artist and title, aggregate difficulty per level, and collect 1 to 5
//! ratings per song. The catalog is served as a JSON REST API via Axum.
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`api`]: Song documents and response types
//! - [`error`]: Request-level error type and its messages
//! - [`services`]: Parameter validation, query building and rating statistics
//! - [`db`]: Repository pattern, MongoDB and in-memory backends, service layer
//! - [`http`]: Axum-based HTTP server and request handlers

// Allow large error types - RepositoryError contains rich context for debugging
#![allow(clippy::result_large_err)]

pub mod api;

pub mod db;
pub mod error;

pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
