//! Database module for song storage.
//!
//! This module provides abstractions for document-store operations via the
//! Repository pattern, allowing different storage backends to be swapped easily.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  HTTP handlers                                           │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Service Layer (services.rs)                             │
//! │  - Not-found detection                                   │
//! │  - Rating statistics                                     │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  SongRepository trait (repository/)                      │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌───────────────┴────────────────┐
//!     │                                 │
//! ┌───▼──────────────┐     ┌───────────▼─────────────┐
//! │ MongoRepository  │     │ LocalRepository         │
//! │ (mongo-repo)     │     │ (in-memory)             │
//! └──────────────────┘     └─────────────────────────┘
//! ```
//!
//! There is no process-wide repository. Build one with [`RepositoryFactory`]
//! and pass it to whatever needs it.

#[cfg(not(any(feature = "mongo-repo", feature = "local-repo")))]
compile_error!("Enable at least one repository backend feature.");

pub mod factory;
pub mod repo_config;
pub mod repositories;
pub mod repository;
pub mod services;
pub mod text_search;

pub use services::{
    add_rating, average_difficulty, get_rating_stats, health_check, list_songs, search_songs,
};

pub use factory::{RepositoryFactory, RepositoryType};
pub use repo_config::{MongoConfig, RepositoryConfig};
pub use repositories::LocalRepository;
#[cfg(feature = "mongo-repo")]
pub use repositories::MongoRepository;
pub use repository::{ErrorContext, RepositoryError, RepositoryResult, SongRepository};
