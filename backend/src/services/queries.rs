//! Document-store queries built from validated request parameters.
//!
//! Each query type is what a repository receives. The MongoDB backend sends
//! the rendered BSON documents as-is; the local backend interprets the typed
//! fields directly so both agree on semantics.

use bson::{doc, Document};

use crate::api::{RatingValue, SongId};

/// Default page size for the song listing.
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Largest skip a store accepts; the MongoDB wire format carries it as an i64.
const MAX_SKIP: u64 = i64::MAX as u64;

/// A page of the song listing in natural (insertion) order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Zero-based page number
    pub page: u64,
    /// Number of songs per page
    pub page_size: u64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    pub fn new(page: u64, page_size: u64) -> Self {
        Self { page, page_size }
    }

    /// Number of documents to skip, capped at [`i64::MAX`].
    pub fn skip(&self) -> u64 {
        self.page.saturating_mul(self.page_size).min(MAX_SKIP)
    }

    pub fn limit(&self) -> u64 {
        self.page_size
    }

    /// A zero page size always yields nothing. MongoDB reads `limit(0)` as
    /// "no limit", so backends must short-circuit on this instead.
    pub fn is_empty(&self) -> bool {
        self.page_size == 0
    }
}

/// Average difficulty grouped by level, optionally restricted to one level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DifficultyQuery {
    pub level: Option<i64>,
}

impl DifficultyQuery {
    pub fn all_levels() -> Self {
        Self { level: None }
    }

    pub fn for_level(level: i64) -> Self {
        Self { level: Some(level) }
    }

    /// Aggregation pipeline for this query.
    ///
    /// The level filter runs before the `$group` stage; groups come back
    /// sorted by level.
    pub fn pipeline(&self) -> Vec<Document> {
        let mut pipeline = Vec::with_capacity(3);
        if let Some(level) = self.level {
            pipeline.push(doc! { "$match": { "level": level } });
        }
        pipeline.push(doc! {
            "$group": {
                "_id": "$level",
                "averageDifficulty": { "$avg": "$difficulty" },
            }
        });
        pipeline.push(doc! { "$sort": { "_id": 1 } });
        pipeline
    }
}

/// Full-text search over the `artist` and `title` fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub message: String,
}

impl SearchQuery {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn filter(&self) -> Document {
        doc! { "$text": { "$search": self.message.as_str() } }
    }
}

/// Atomic increment of one rating counter on one song.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatingIncrement {
    pub song_id: SongId,
    pub rating: RatingValue,
}

impl RatingIncrement {
    pub fn new(song_id: SongId, rating: RatingValue) -> Self {
        Self { song_id, rating }
    }

    pub fn filter(&self) -> Document {
        id_filter(&self.song_id)
    }

    pub fn update(&self) -> Document {
        let mut counter = Document::new();
        counter.insert(format!("rating.{}", self.rating.as_str()), 1);
        doc! { "$inc": counter }
    }
}

/// Filter matching a single song by identifier.
pub fn id_filter(id: &SongId) -> Document {
    doc! { "_id": id.value() }
}
