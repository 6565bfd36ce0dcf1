//! MongoDB repository implementation.
//!
//! Every operation is a single driver call against the `songs` collection, so
//! the atomicity of rating increments is the server's `$inc` guarantee.
//!
//! Connection parameters come from [`MongoConfig`].
//!
//! Search requires a text index over `artist` and `title`; call
//! [`MongoRepository::ensure_text_index`] once after seeding.

use async_trait::async_trait;
use bson::{doc, Document};
use futures::TryStreamExt;
use mongodb::options::IndexOptions;
use mongodb::{Client, Collection, Database, IndexModel};
use tracing::{debug, info};

use crate::api::{DifficultyAverage, Song, SongId};
use crate::db::repo_config::MongoConfig;
use crate::db::repository::{RepositoryError, RepositoryResult, SongRepository};
use crate::services::queries::{
    id_filter, DifficultyQuery, PageRequest, RatingIncrement, SearchQuery,
};

/// Song repository backed by a MongoDB collection.
#[derive(Clone)]
pub struct MongoRepository {
    database: Database,
    songs: Collection<Song>,
}

impl MongoRepository {
    /// Connect using the given configuration.
    ///
    /// The driver connects lazily; use [`SongRepository::health_check`] to
    /// verify the server is reachable.
    pub async fn connect(config: &MongoConfig) -> RepositoryResult<Self> {
        let client = Client::with_uri_str(&config.uri)
            .await
            .map_err(|e| RepositoryError::from(e).with_operation("connect"))?;
        info!(
            database = %config.database,
            collection = %config.collection,
            "MongoDB client created"
        );
        Ok(Self::from_client(&client, config))
    }

    pub fn from_client(client: &Client, config: &MongoConfig) -> Self {
        let database = client.database(&config.database);
        let songs = database.collection::<Song>(&config.collection);
        Self { database, songs }
    }

    /// Create the `artist`/`title` text index used by search.
    pub async fn ensure_text_index(&self) -> RepositoryResult<()> {
        let index = IndexModel::builder()
            .keys(doc! { "artist": "text", "title": "text" })
            .options(IndexOptions::builder().name("artist_title_text".to_string()).build())
            .build();
        self.songs
            .create_index(index)
            .await
            .map_err(|e| RepositoryError::from(e).with_operation("ensure_text_index"))?;
        Ok(())
    }
}

#[async_trait]
impl SongRepository for MongoRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        match self.database.run_command(doc! { "ping": 1 }).await {
            Ok(_) => Ok(true),
            Err(e) => {
                debug!(error = %e, "MongoDB ping failed");
                Ok(false)
            }
        }
    }

    async fn list_songs(&self, page: &PageRequest) -> RepositoryResult<Vec<Song>> {
        if page.is_empty() {
            return Ok(Vec::new());
        }

        let limit = i64::try_from(page.limit()).unwrap_or(i64::MAX);
        let cursor = self
            .songs
            .find(Document::new())
            .skip(page.skip())
            .limit(limit)
            .await
            .map_err(|e| RepositoryError::from(e).with_operation("list_songs"))?;
        cursor
            .try_collect()
            .await
            .map_err(|e| RepositoryError::from(e).with_operation("list_songs"))
    }

    async fn average_difficulty(
        &self,
        query: &DifficultyQuery,
    ) -> RepositoryResult<Vec<DifficultyAverage>> {
        let cursor = self
            .songs
            .aggregate(query.pipeline())
            .await
            .map_err(|e| RepositoryError::from(e).with_operation("average_difficulty"))?;
        let documents: Vec<Document> = cursor
            .try_collect()
            .await
            .map_err(|e| RepositoryError::from(e).with_operation("average_difficulty"))?;

        documents
            .into_iter()
            .map(|document| {
                bson::from_document::<DifficultyAverage>(document)
                    .map_err(|e| RepositoryError::from(e).with_operation("average_difficulty"))
            })
            .collect()
    }

    async fn search_songs(&self, query: &SearchQuery) -> RepositoryResult<Vec<Song>> {
        let cursor = self
            .songs
            .find(query.filter())
            .await
            .map_err(|e| RepositoryError::from(e).with_operation("search_songs"))?;
        cursor
            .try_collect()
            .await
            .map_err(|e| RepositoryError::from(e).with_operation("search_songs"))
    }

    async fn increment_rating(&self, increment: &RatingIncrement) -> RepositoryResult<bool> {
        let result = self
            .songs
            .update_one(increment.filter(), increment.update())
            .await
            .map_err(|e| RepositoryError::from(e).with_operation("increment_rating"))?;
        Ok(result.matched_count > 0)
    }

    async fn find_song(&self, id: &SongId) -> RepositoryResult<Option<Song>> {
        self.songs
            .find_one(id_filter(id))
            .await
            .map_err(|e| RepositoryError::from(e).with_operation("find_song"))
    }
}
