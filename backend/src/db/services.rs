//! High-level catalog operations.
//!
//! These functions run a validated query against any [`SongRepository`] and
//! turn store outcomes into [`ApiError`]s, so every backend reports missing
//! songs and store failures the same way.
//!
//! # Usage
//!
//! ```no_run
//! use song_api::db::{services, repositories::LocalRepository};
//! use song_api::services::PageRequest;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let repo = LocalRepository::new();
//!     let songs = services::list_songs(&repo, &PageRequest::default()).await?;
//!     println!("Found {} songs", songs.len());
//!     Ok(())
//! }
//! ```

use tracing::{debug, info};

use super::repository::{RepositoryResult, SongRepository};
use crate::api::{DifficultyAverage, RatingStats, Song, SongId};
use crate::error::{ApiError, ApiResult};
use crate::services::queries::{DifficultyQuery, PageRequest, RatingIncrement, SearchQuery};
use crate::services::ratings::rating_stats;

/// Check if the store connection is healthy.
pub async fn health_check<R: SongRepository + ?Sized>(repo: &R) -> RepositoryResult<bool> {
    repo.health_check().await
}

/// One page of the catalog.
pub async fn list_songs<R: SongRepository + ?Sized>(
    repo: &R,
    page: &PageRequest,
) -> ApiResult<Vec<Song>> {
    let songs = repo.list_songs(page).await?;
    debug!(
        page = page.page,
        page_size = page.page_size,
        returned = songs.len(),
        "Listed songs"
    );
    Ok(songs)
}

/// Average difficulty per level.
pub async fn average_difficulty<R: SongRepository + ?Sized>(
    repo: &R,
    query: &DifficultyQuery,
) -> ApiResult<Vec<DifficultyAverage>> {
    Ok(repo.average_difficulty(query).await?)
}

/// Full-text search over artist and title.
pub async fn search_songs<R: SongRepository + ?Sized>(
    repo: &R,
    query: &SearchQuery,
) -> ApiResult<Vec<Song>> {
    let songs = repo.search_songs(query).await?;
    debug!(message = %query.message, matches = songs.len(), "Searched songs");
    Ok(songs)
}

/// Record one rating for a song.
///
/// Fails with [`ApiError::ObjectNotFound`] when no song has the identifier.
pub async fn add_rating<R: SongRepository + ?Sized>(
    repo: &R,
    increment: &RatingIncrement,
) -> ApiResult<()> {
    if !repo.increment_rating(increment).await? {
        return Err(ApiError::not_found(increment.song_id));
    }
    info!(
        song_id = %increment.song_id,
        rating = %increment.rating,
        "Rating recorded"
    );
    Ok(())
}

/// Min, max and average rating of a song.
///
/// Fails with [`ApiError::ObjectNotFound`] when no song has the identifier.
pub async fn get_rating_stats<R: SongRepository + ?Sized>(
    repo: &R,
    id: &SongId,
) -> ApiResult<RatingStats> {
    let song = repo
        .find_song(id)
        .await?
        .ok_or_else(|| ApiError::not_found(id))?;
    Ok(rating_stats(song.id, &song.rating))
}
