//! In-memory local repository implementation.
//!
//! This module provides a local implementation of [`SongRepository`] suitable
//! for unit testing and local development. Songs are kept in a `Vec` in
//! insertion order, which stands in for the natural order of a collection.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

use crate::api::{DifficultyAverage, Song, SongId};
use crate::db::repository::{ErrorContext, RepositoryError, RepositoryResult, SongRepository};
use crate::db::text_search::TextQuery;
use crate::services::queries::{DifficultyQuery, PageRequest, RatingIncrement, SearchQuery};

/// In-memory local repository.
///
/// Cloning shares the underlying data, so a test can keep a handle while the
/// router owns another.
///
/// # Example
/// ```
/// use song_api::api::Song;
/// use song_api::db::repositories::LocalRepository;
///
/// let repo = LocalRepository::new();
/// repo.insert_song(Song::new("Mr Fastfinger", "Awaki-Waki", 1, 2.0));
/// assert_eq!(repo.song_count(), 1);
/// ```
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    songs: Vec<Song>,

    // Connection health
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            songs: Vec::new(),
            is_healthy: true,
        }
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
        }
    }

    /// Create a repository seeded from a JSON-lines file.
    pub fn from_fixture_file<P: AsRef<Path>>(path: P) -> RepositoryResult<Self> {
        let repo = Self::new();
        repo.load_fixture_file(path)?;
        Ok(repo)
    }

    /// Append a song, returning its identifier.
    pub fn insert_song(&self, song: Song) -> SongId {
        let id = song.id;
        self.data.write().songs.push(song);
        id
    }

    /// Append several songs in order.
    pub fn insert_many(&self, songs: impl IntoIterator<Item = Song>) -> Vec<SongId> {
        let mut data = self.data.write();
        songs
            .into_iter()
            .map(|song| {
                let id = song.id;
                data.songs.push(song);
                id
            })
            .collect()
    }

    /// Seed songs from JSON lines, one song document per line.
    ///
    /// Documents without an `_id` get a fresh one. Blank lines are skipped.
    /// Nothing is inserted if any line fails to parse.
    pub fn load_json_lines(&self, content: &str) -> RepositoryResult<Vec<SongId>> {
        let songs = content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(index, line)| {
                serde_json::from_str::<Song>(line).map_err(|e| {
                    RepositoryError::DecodeError {
                        message: e.to_string(),
                        context: ErrorContext::new("load_json_lines")
                            .with_details(format!("line={}", index + 1)),
                    }
                })
            })
            .collect::<RepositoryResult<Vec<_>>>()?;

        debug!(count = songs.len(), "Seeding local repository");
        Ok(self.insert_many(songs))
    }

    /// Seed songs from a JSON-lines file.
    pub fn load_fixture_file<P: AsRef<Path>>(&self, path: P) -> RepositoryResult<Vec<SongId>> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            RepositoryError::configuration(format!(
                "Failed to read fixture file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        self.load_json_lines(&content)
    }

    /// Set the health status for testing connection failures.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    /// Get the number of songs stored.
    pub fn song_count(&self) -> usize {
        self.data.read().songs.len()
    }

    /// Helper to check health and return error if unhealthy.
    fn check_health(&self) -> RepositoryResult<()> {
        if !self.data.read().is_healthy {
            return Err(RepositoryError::connection("Database is not healthy"));
        }
        Ok(())
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SongRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().is_healthy)
    }

    async fn list_songs(&self, page: &PageRequest) -> RepositoryResult<Vec<Song>> {
        self.check_health()?;
        if page.is_empty() {
            return Ok(Vec::new());
        }

        let skip = usize::try_from(page.skip()).unwrap_or(usize::MAX);
        let limit = usize::try_from(page.limit()).unwrap_or(usize::MAX);
        let data = self.data.read();
        Ok(data.songs.iter().skip(skip).take(limit).cloned().collect())
    }

    async fn average_difficulty(
        &self,
        query: &DifficultyQuery,
    ) -> RepositoryResult<Vec<DifficultyAverage>> {
        self.check_health()?;

        let data = self.data.read();
        let mut groups: BTreeMap<i64, (f64, u64)> = BTreeMap::new();
        for song in data
            .songs
            .iter()
            .filter(|song| query.level.map_or(true, |level| song.level == level))
        {
            let entry = groups.entry(song.level).or_insert((0.0, 0));
            entry.0 += song.difficulty;
            entry.1 += 1;
        }

        Ok(groups
            .into_iter()
            .map(|(level, (sum, count))| DifficultyAverage {
                level,
                average_difficulty: sum / count as f64,
            })
            .collect())
    }

    async fn search_songs(&self, query: &SearchQuery) -> RepositoryResult<Vec<Song>> {
        self.check_health()?;

        let text_query = TextQuery::parse(&query.message);
        let data = self.data.read();
        Ok(data
            .songs
            .iter()
            .filter(|song| text_query.matches(&[song.artist.as_str(), song.title.as_str()]))
            .cloned()
            .collect())
    }

    async fn increment_rating(&self, increment: &RatingIncrement) -> RepositoryResult<bool> {
        self.check_health()?;

        let mut data = self.data.write();
        match data.songs.iter_mut().find(|song| song.id == increment.song_id) {
            Some(song) => {
                song.rating.increment(increment.rating);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn find_song(&self, id: &SongId) -> RepositoryResult<Option<Song>> {
        self.check_health()?;

        let data = self.data.read();
        Ok(data.songs.iter().find(|song| song.id == *id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::RatingValue;

    fn seeded() -> (LocalRepository, Vec<SongId>) {
        let repo = LocalRepository::new();
        let ids = repo.insert_many(vec![
            Song::new("The Yousicians", "Lycanthropic Metamorphosis", 3, 14.6),
            Song::new("The Yousicians", "A New Kennel", 9, 9.1),
            Song::new("Mr Fastfinger", "Awaki-Waki", 13, 15.0),
            Song::new("The Yousicians", "You've Got The Power", 13, 13.2),
        ]);
        (repo, ids)
    }

    #[tokio::test]
    async fn test_health_check() {
        let repo = LocalRepository::new();
        assert!(repo.health_check().await.unwrap());
        repo.set_healthy(false);
        assert!(!repo.health_check().await.unwrap());
        assert!(repo.list_songs(&PageRequest::default()).await.is_err());
    }

    #[tokio::test]
    async fn test_list_pages() {
        let (repo, _) = seeded();
        let first = repo.list_songs(&PageRequest::new(0, 3)).await.unwrap();
        assert_eq!(first.len(), 3);
        assert_eq!(first[2].artist, "Mr Fastfinger");

        let second = repo.list_songs(&PageRequest::new(1, 3)).await.unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].title, "You've Got The Power");

        let beyond = repo.list_songs(&PageRequest::new(5, 3)).await.unwrap();
        assert!(beyond.is_empty());

        let none = repo.list_songs(&PageRequest::new(0, 0)).await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_average_difficulty() {
        let (repo, _) = seeded();
        let all = repo
            .average_difficulty(&DifficultyQuery::all_levels())
            .await
            .unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].level, 3);
        assert_eq!(all[2].level, 13);
        assert!((all[2].average_difficulty - 14.1).abs() < 1e-9);

        let one = repo
            .average_difficulty(&DifficultyQuery::for_level(9))
            .await
            .unwrap();
        assert_eq!(one.len(), 1);

        let missing = repo
            .average_difficulty(&DifficultyQuery::for_level(11))
            .await
            .unwrap();
        assert!(missing.is_empty());
    }

    #[tokio::test]
    async fn test_search() {
        let (repo, _) = seeded();
        let found = repo.search_songs(&SearchQuery::new("yousicians")).await.unwrap();
        assert_eq!(found.len(), 3);
        let found = repo.search_songs(&SearchQuery::new("kennel")).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "A New Kennel");
    }

    #[tokio::test]
    async fn test_increment_rating() {
        let (repo, ids) = seeded();
        let inc = RatingIncrement::new(ids[1], RatingValue::Two);
        assert!(repo.increment_rating(&inc).await.unwrap());
        assert!(repo.increment_rating(&inc).await.unwrap());

        let song = repo.find_song(&ids[1]).await.unwrap().unwrap();
        assert_eq!(song.rating.count(RatingValue::Two), 2);

        let unknown = RatingIncrement::new(SongId::generate(), RatingValue::Two);
        assert!(!repo.increment_rating(&unknown).await.unwrap());
    }

    #[test]
    fn test_load_json_lines() {
        let repo = LocalRepository::new();
        let ids = repo
            .load_json_lines(
                "{\"artist\": \"A\", \"title\": \"One\", \"level\": 1, \"difficulty\": 1.5}\n\n\
                 {\"artist\": \"B\", \"title\": \"Two\", \"level\": 2, \"difficulty\": 2, \"rating\": {\"4\": 1}}\n",
            )
            .unwrap();
        assert_eq!(ids.len(), 2);
        assert_eq!(repo.song_count(), 2);
    }

    #[test]
    fn test_load_json_lines_reports_line() {
        let repo = LocalRepository::new();
        let err = repo
            .load_json_lines("{\"artist\": \"A\", \"title\": \"One\", \"level\": 1, \"difficulty\": 1}\nnot json\n")
            .unwrap_err();
        assert_eq!(err.context().details.as_deref(), Some("line=2"));
        assert_eq!(repo.song_count(), 0);
    }
}
