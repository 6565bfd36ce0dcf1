//! Repository trait for abstracting document-store operations.
//!
//! This trait defines the interface the request handlers need from the song
//! collection, allowing different implementations (MongoDB, in-memory) to be
//! swapped via dependency injection.

use async_trait::async_trait;

use crate::api::{DifficultyAverage, Song, SongId};
use crate::services::queries::{DifficultyQuery, PageRequest, RatingIncrement, SearchQuery};

pub mod error;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

/// Repository trait for the song collection.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` so one instance can be shared by all
/// request handlers.
#[async_trait]
pub trait SongRepository: Send + Sync {
    /// Check if the store connection is healthy.
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// Fetch one page of songs in natural (insertion) order.
    ///
    /// A page past the end of the collection yields an empty vector.
    async fn list_songs(&self, page: &PageRequest) -> RepositoryResult<Vec<Song>>;

    /// Average difficulty per level, sorted by level.
    async fn average_difficulty(
        &self,
        query: &DifficultyQuery,
    ) -> RepositoryResult<Vec<DifficultyAverage>>;

    /// Full-text search over artist and title.
    async fn search_songs(&self, query: &SearchQuery) -> RepositoryResult<Vec<Song>>;

    /// Atomically increment one rating counter.
    ///
    /// # Returns
    /// * `Ok(true)` if a song matched the identifier
    /// * `Ok(false)` if no song has that identifier
    async fn increment_rating(&self, increment: &RatingIncrement) -> RepositoryResult<bool>;

    /// Fetch a single song by identifier.
    async fn find_song(&self, id: &SongId) -> RepositoryResult<Option<Song>>;
}
