//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint: it validates the raw request
//! parameters and delegates to the service layer.

use axum::{
    extract::{
        rejection::{FormRejection, QueryRejection},
        Path, Query, State,
    },
    Form, Json,
};
use tracing::debug;

use super::dto::{HealthResponse, RequestFields, StatusResponse};
use super::router::{SONGS_RATING_PATH, SONGS_SEARCH_PATH};
use super::state::AppState;
use crate::api::{DifficultyAverage, RatingStats, Song};
use crate::db::services as db_services;
use crate::error::{ApiError, ApiResult};
use crate::services::validation;

type QueryPairs = Result<Query<Vec<(String, String)>>, QueryRejection>;
type FormPairs = Result<Form<Vec<(String, String)>>, FormRejection>;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, ApiError>;

fn query_fields(query: QueryPairs) -> ApiResult<RequestFields> {
    match query {
        Ok(Query(pairs)) => Ok(pairs.into()),
        Err(rejection) => Err(ApiError::malformed_request(rejection.body_text())),
    }
}

/// A request without a form body is treated as having no fields, so the
/// client gets the missing-argument message rather than a content-type error.
fn form_fields(form: FormPairs) -> ApiResult<RequestFields> {
    match form {
        Ok(Form(pairs)) => Ok(pairs.into()),
        Err(FormRejection::InvalidFormContentType(rejection)) => {
            debug!(error = %rejection, "Request without form body");
            Ok(RequestFields::default())
        }
        Err(rejection) => Err(ApiError::malformed_request(rejection.body_text())),
    }
}

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Reports whether the service is up and the store is reachable.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match db_services::health_check(state.repository.as_ref()).await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        database: db_status,
    }))
}

// =============================================================================
// Catalog
// =============================================================================

/// GET /songs?p=&n=
///
/// One page of songs in store order.
pub async fn list_songs(
    State(state): State<AppState>,
    query: QueryPairs,
) -> HandlerResult<Vec<Song>> {
    let fields = query_fields(query)?;
    let page = validation::parse_page_request(fields.first("p"), fields.first("n"))?;
    let songs = db_services::list_songs(state.repository.as_ref(), &page).await?;
    Ok(Json(songs))
}

/// GET /songs/avg/difficulty?level=
///
/// Average difficulty per level, optionally restricted to one level.
pub async fn average_difficulty(
    State(state): State<AppState>,
    query: QueryPairs,
) -> HandlerResult<Vec<DifficultyAverage>> {
    let fields = query_fields(query)?;
    let query = validation::parse_difficulty_query(fields.first("level"))?;
    let averages = db_services::average_difficulty(state.repository.as_ref(), &query).await?;
    Ok(Json(averages))
}

/// GET /songs/search?message=
pub async fn search_songs(
    State(state): State<AppState>,
    query: QueryPairs,
) -> HandlerResult<Vec<Song>> {
    let fields = query_fields(query)?;
    let query = validation::parse_search_query(fields.first("message"), SONGS_SEARCH_PATH)?;
    let songs = db_services::search_songs(state.repository.as_ref(), &query).await?;
    Ok(Json(songs))
}

// =============================================================================
// Ratings
// =============================================================================

/// POST /songs/rating (form fields `song_id`, `rating`)
pub async fn add_rating(
    State(state): State<AppState>,
    form: FormPairs,
) -> HandlerResult<StatusResponse> {
    let fields = form_fields(form)?;
    let increment = validation::parse_rating_increment(
        fields.first("song_id"),
        fields.first("rating"),
        SONGS_RATING_PATH,
    )?;
    db_services::add_rating(state.repository.as_ref(), &increment).await?;
    Ok(Json(StatusResponse::ok()))
}

/// GET /songs/avg/rating/{song_id}
pub async fn get_rating_stats(
    State(state): State<AppState>,
    Path(song_id): Path<String>,
) -> HandlerResult<RatingStats> {
    let id = validation::parse_song_id(&song_id)?;
    let stats = db_services::get_rating_stats(state.repository.as_ref(), &id).await?;
    Ok(Json(stats))
}
