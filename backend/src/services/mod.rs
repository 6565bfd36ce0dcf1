//! Request-handling logic independent of the HTTP framework.
//!
//! - [`validation`]: turns raw query/form strings into typed queries
//! - [`queries`]: the typed queries and their document-store rendering
//! - [`ratings`]: rating statistics from a song's histogram

pub mod queries;
pub mod ratings;
pub mod validation;

pub use queries::{DifficultyQuery, PageRequest, RatingIncrement, SearchQuery};
pub use ratings::rating_stats;
