//! Song catalog HTTP Server Binary
//!
//! This is the main entry point for the song catalog REST API server.
//! It builds the repository, sets up the HTTP router, and starts serving requests.
//!
//! # Usage
//!
//! ```bash
//! # Run with the in-memory repository seeded from a JSON-lines file
//! SONGS_FIXTURE=backend/tests/fixtures/songs.json cargo run --bin song-server
//!
//! # Run against MongoDB
//! MONGO_URI=mongodb://localhost:27017 \
//!   cargo run --bin song-server --features "mongo-repo,http-server"
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 5000)
//! - `SONG_API_CONFIG`: Path to a `repository.toml`; takes precedence over the variables below
//! - `REPOSITORY_TYPE`: `mongo` or `local`
//! - `MONGO_URI`, `MONGO_DB`, `MONGO_COLLECTION`: MongoDB connection settings
//! - `SONGS_FIXTURE`: JSON-lines file loaded into the local repository at startup
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use song_api::db::repo_config::CONFIG_PATH_ENV;
use song_api::db::{
    LocalRepository, MongoConfig, RepositoryConfig, RepositoryType, SongRepository,
};
use song_api::http::{create_router, AppState};

const FIXTURE_ENV: &str = "SONGS_FIXTURE";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting song catalog HTTP Server");

    let (repo_type, mongo_config) = if env::var(CONFIG_PATH_ENV).is_ok() {
        let config = RepositoryConfig::from_default_location()?;
        let repo_type = config.repository_type().map_err(anyhow::Error::msg)?;
        (repo_type, config.to_mongo_config()?)
    } else {
        (RepositoryType::from_env(), Some(MongoConfig::from_env()))
    };

    let repository = match repo_type {
        RepositoryType::Mongo => build_mongo(mongo_config).await?,
        RepositoryType::Local => build_local()?,
    };
    info!(repository = ?repo_type, "Repository initialized successfully");

    let app = create_router(AppState::new(repository));

    // Determine bind address
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(5000);
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(feature = "mongo-repo")]
async fn build_mongo(config: Option<MongoConfig>) -> anyhow::Result<Arc<dyn SongRepository>> {
    let config = config.ok_or_else(|| anyhow::anyhow!("Mongo repository requires MongoConfig"))?;
    let repo = song_api::db::RepositoryFactory::create_mongo(&config).await?;
    repo.ensure_text_index().await?;
    Ok(repo as Arc<dyn SongRepository>)
}

#[cfg(not(feature = "mongo-repo"))]
async fn build_mongo(_config: Option<MongoConfig>) -> anyhow::Result<Arc<dyn SongRepository>> {
    anyhow::bail!("Mongo repository requested but the mongo-repo feature is not enabled")
}

fn build_local() -> anyhow::Result<Arc<dyn SongRepository>> {
    let repo = LocalRepository::new();
    if let Ok(path) = env::var(FIXTURE_ENV) {
        let ids = repo.load_fixture_file(&path)?;
        info!(path = %path, songs = ids.len(), "Loaded song fixture");
    }
    Ok(Arc::new(repo))
}
