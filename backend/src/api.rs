//! Public API surface for the song catalog.
//!
//! This file consolidates the document and response types shared by the
//! repository layer and the HTTP API. All types derive Serialize/Deserialize
//! for JSON serialization.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use bson::oid::ObjectId;
use bson::Bson;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Song identifier (store-generated ObjectId).
///
/// Serializes to its 24 character hex form. Deserializes from either a native
/// BSON ObjectId, an extended-JSON `{"$oid": ...}` value, or a hex string.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SongId(pub ObjectId);

impl SongId {
    /// Generate a fresh identifier.
    pub fn generate() -> Self {
        SongId(ObjectId::new())
    }

    pub fn value(&self) -> ObjectId {
        self.0
    }

    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }
}

impl FromStr for SongId {
    type Err = bson::oid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ObjectId::parse_str(s).map(SongId)
    }
}

impl fmt::Display for SongId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_hex())
    }
}

impl From<ObjectId> for SongId {
    fn from(oid: ObjectId) -> Self {
        SongId(oid)
    }
}

impl Serialize for SongId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_hex())
    }
}

impl<'de> Deserialize<'de> for SongId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Bson::deserialize(deserializer)? {
            Bson::ObjectId(oid) => Ok(SongId(oid)),
            Bson::String(s) => s.parse().map_err(serde::de::Error::custom),
            other => Err(serde::de::Error::custom(format!(
                "expected an ObjectId, found {}",
                other
            ))),
        }
    }
}

/// One of the five values a song can be rated with.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RatingValue {
    One = 1,
    Two = 2,
    Three = 3,
    Four = 4,
    Five = 5,
}

impl RatingValue {
    pub fn value(&self) -> u8 {
        *self as u8
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RatingValue::One => "1",
            RatingValue::Two => "2",
            RatingValue::Three => "3",
            RatingValue::Four => "4",
            RatingValue::Five => "5",
        }
    }
}

impl FromStr for RatingValue {
    type Err = String;

    /// Only the exact literals "1" through "5" are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1" => Ok(RatingValue::One),
            "2" => Ok(RatingValue::Two),
            "3" => Ok(RatingValue::Three),
            "4" => Ok(RatingValue::Four),
            "5" => Ok(RatingValue::Five),
            _ => Err(format!("Unknown rating value: {}", s)),
        }
    }
}

impl TryFrom<String> for RatingValue {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<RatingValue> for String {
    fn from(value: RatingValue) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for RatingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-value rating counts stored on a song (`{"4": 2, "5": 1}`).
///
/// Missing keys count as zero. Counts are only ever incremented.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RatingHistogram(pub BTreeMap<RatingValue, u64>);

impl RatingHistogram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, value: RatingValue) -> u64 {
        self.0.get(&value).copied().unwrap_or(0)
    }

    pub fn increment(&mut self, value: RatingValue) {
        *self.0.entry(value).or_insert(0) += 1;
    }

    /// Total number of ratings submitted.
    pub fn total(&self) -> u64 {
        self.0.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Iterate over values with a non-zero count, lowest first.
    pub fn recorded(&self) -> impl Iterator<Item = (RatingValue, u64)> + '_ {
        self.0
            .iter()
            .filter(|(_, count)| **count > 0)
            .map(|(value, count)| (*value, *count))
    }
}

impl FromIterator<(RatingValue, u64)> for RatingHistogram {
    fn from_iter<I: IntoIterator<Item = (RatingValue, u64)>>(iter: I) -> Self {
        RatingHistogram(iter.into_iter().collect())
    }
}

/// A song document as stored in the `songs` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Song {
    #[serde(rename = "_id", default = "SongId::generate")]
    pub id: SongId,
    pub artist: String,
    pub title: String,
    pub level: i64,
    pub difficulty: f64,
    #[serde(default, skip_serializing_if = "RatingHistogram::is_empty")]
    pub rating: RatingHistogram,
    /// Release date as written by the seeding process
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub released: Option<String>,
}

impl Song {
    pub fn new(artist: impl Into<String>, title: impl Into<String>, level: i64, difficulty: f64) -> Self {
        Self {
            id: SongId::generate(),
            artist: artist.into(),
            title: title.into(),
            level,
            difficulty,
            rating: RatingHistogram::new(),
            released: None,
        }
    }
}

/// Average difficulty of all songs sharing a level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultyAverage {
    #[serde(rename = "_id")]
    pub level: i64,
    #[serde(rename = "averageDifficulty")]
    pub average_difficulty: f64,
}

/// Rating statistics for a single song.
///
/// The min/max/avg fields are `None` for a song that has never been rated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingStats {
    #[serde(rename = "_id")]
    pub id: SongId,
    pub min_rating: Option<u8>,
    pub max_rating: Option<u8>,
    pub avg_rating: Option<f64>,
}
