//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

pub const SONGS_PATH: &str = "/songs";
pub const SONGS_AVG_DIFFICULTY_PATH: &str = "/songs/avg/difficulty";
pub const SONGS_SEARCH_PATH: &str = "/songs/search";
pub const SONGS_RATING_PATH: &str = "/songs/rating";
pub const SONGS_AVG_RATING_PATH: &str = "/songs/avg/rating/{song_id}";
pub const HEALTH_PATH: &str = "/health";

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(SONGS_PATH, get(handlers::list_songs))
        .route(SONGS_AVG_DIFFICULTY_PATH, get(handlers::average_difficulty))
        .route(SONGS_SEARCH_PATH, get(handlers::search_songs))
        .route(SONGS_RATING_PATH, post(handlers::add_rating))
        .route(SONGS_AVG_RATING_PATH, get(handlers::get_rating_stats))
        .route(HEALTH_PATH, get(handlers::health_check))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
