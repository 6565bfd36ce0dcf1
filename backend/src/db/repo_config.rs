//! Repository configuration file support.
//!
//! This module provides utilities for reading repository configuration from
//! TOML configuration files and the environment.
//!
//! ```toml
//! [repository]
//! type = "mongo"
//!
//! [mongo]
//! uri = "mongodb://localhost:27017"
//! database = "songs_api"
//! collection = "songs"
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::factory::RepositoryType;
use super::repository::RepositoryError;

/// Environment variable naming an explicit configuration file.
pub const CONFIG_PATH_ENV: &str = "SONG_API_CONFIG";

pub const DEFAULT_MONGO_URI: &str = "mongodb://localhost:27017";
pub const DEFAULT_DATABASE: &str = "songs_api";
pub const DEFAULT_COLLECTION: &str = "songs";

/// Connection parameters for the MongoDB backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MongoConfig {
    /// Connection string
    pub uri: String,
    /// Database holding the song collection
    pub database: String,
    /// Song collection name
    pub collection: String,
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self {
            uri: DEFAULT_MONGO_URI.to_string(),
            database: DEFAULT_DATABASE.to_string(),
            collection: DEFAULT_COLLECTION.to_string(),
        }
    }
}

impl MongoConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    /// - `MONGO_URI`: Connection string (default: `mongodb://localhost:27017`)
    /// - `MONGO_DB`: Database name (default: `songs_api`)
    /// - `MONGO_COLLECTION`: Collection name (default: `songs`)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            uri: std::env::var("MONGO_URI").unwrap_or(defaults.uri),
            database: std::env::var("MONGO_DB").unwrap_or(defaults.database),
            collection: std::env::var("MONGO_COLLECTION").unwrap_or(defaults.collection),
        }
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }
}

/// Repository configuration from file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryConfig {
    pub repository: RepositorySettings,
    #[serde(default)]
    pub mongo: MongoSettings,
}

/// Repository type settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositorySettings {
    #[serde(rename = "type")]
    pub repo_type: String,
}

/// MongoDB connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoSettings {
    #[serde(default = "default_uri")]
    pub uri: String,
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_collection")]
    pub collection: String,
}

impl Default for MongoSettings {
    fn default() -> Self {
        Self {
            uri: default_uri(),
            database: default_database(),
            collection: default_collection(),
        }
    }
}

fn default_uri() -> String {
    DEFAULT_MONGO_URI.to_string()
}

fn default_database() -> String {
    DEFAULT_DATABASE.to_string()
}

fn default_collection() -> String {
    DEFAULT_COLLECTION.to_string()
}

impl RepositoryConfig {
    /// Load repository configuration from a TOML file.
    ///
    /// # Returns
    /// * `Ok(RepositoryConfig)` if successful
    /// * `Err(RepositoryError)` if file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RepositoryError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            RepositoryError::configuration(format!("Failed to read config file: {}", e))
        })?;

        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, RepositoryError> {
        toml::from_str(content).map_err(|e| {
            RepositoryError::configuration(format!("Failed to parse config file: {}", e))
        })
    }

    /// Load repository configuration from the default location.
    ///
    /// Uses `SONG_API_CONFIG` when set, otherwise searches for
    /// `repository.toml` in:
    /// 1. Current directory
    /// 2. `backend/` directory
    /// 3. Parent directory
    pub fn from_default_location() -> Result<Self, RepositoryError> {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            return Self::from_file(path);
        }

        let search_paths = [
            PathBuf::from("repository.toml"),
            PathBuf::from("backend/repository.toml"),
            PathBuf::from("../repository.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Err(RepositoryError::configuration(
            "No repository.toml found in standard locations",
        ))
    }

    /// Get the repository type from configuration.
    pub fn repository_type(&self) -> Result<RepositoryType, String> {
        RepositoryType::from_str(&self.repository.repo_type)
    }

    /// Connection parameters for the Mongo backend, if that is the configured type.
    pub fn to_mongo_config(&self) -> Result<Option<MongoConfig>, RepositoryError> {
        let repo_type = self.repository_type().map_err(|e| {
            RepositoryError::configuration(format!("Invalid repository type: {}", e))
        })?;

        if repo_type != RepositoryType::Mongo {
            return Ok(None);
        }

        if self.mongo.uri.is_empty() {
            return Err(RepositoryError::configuration(
                "Mongo repository requires 'mongo.uri' setting",
            ));
        }

        Ok(Some(MongoConfig {
            uri: self.mongo.uri.clone(),
            database: self.mongo.database.clone(),
            collection: self.mongo.collection.clone(),
        }))
    }
}
