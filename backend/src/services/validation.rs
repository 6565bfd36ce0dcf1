//! Parameter validation for the song endpoints.
//!
//! Query-string and form values arrive as optional strings. Each function here
//! turns them into a typed query or fails with the [`ApiError`] the endpoint
//! reports. No function touches the store.

use crate::api::{RatingValue, SongId};
use crate::error::{ApiError, ApiResult};
use crate::services::queries::{
    DifficultyQuery, PageRequest, RatingIncrement, SearchQuery, DEFAULT_PAGE_SIZE,
};

/// Rendered in place of a missing value in error messages.
const MISSING_VALUE: &str = "None";

/// Treat an empty string the same as an absent parameter.
fn present(raw: Option<&str>) -> Option<&str> {
    raw.filter(|value| !value.is_empty())
}

fn parse_non_negative(raw: &str, param: &str) -> ApiResult<u64> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .and_then(|value| u64::try_from(value).ok())
        .ok_or_else(|| ApiError::invalid_argument(raw, param))
}

/// Validate the `p` (page) and `n` (page size) listing parameters.
///
/// `p` defaults to 0 and `n` to 10. `p` is checked first.
pub fn parse_page_request(p: Option<&str>, n: Option<&str>) -> ApiResult<PageRequest> {
    let page = match present(p) {
        Some(raw) => parse_non_negative(raw, "p")?,
        None => 0,
    };
    let page_size = match present(n) {
        Some(raw) => parse_non_negative(raw, "n")?,
        None => DEFAULT_PAGE_SIZE,
    };
    Ok(PageRequest::new(page, page_size))
}

/// Validate the optional `level` filter of the difficulty endpoint.
pub fn parse_difficulty_query(level: Option<&str>) -> ApiResult<DifficultyQuery> {
    match present(level) {
        Some(raw) => raw
            .trim()
            .parse::<i64>()
            .map(DifficultyQuery::for_level)
            .map_err(|_| ApiError::invalid_argument(raw, "level")),
        None => Ok(DifficultyQuery::all_levels()),
    }
}

/// Validate the required `message` search parameter.
pub fn parse_search_query(message: Option<&str>, endpoint: &str) -> ApiResult<SearchQuery> {
    present(message)
        .map(SearchQuery::new)
        .ok_or_else(|| ApiError::missing_argument("message", endpoint))
}

/// Parse a 24 hex character song identifier.
pub fn parse_song_id(raw: &str) -> ApiResult<SongId> {
    raw.parse::<SongId>()
        .map_err(|_| ApiError::invalid_argument(raw, "song_id"))
}

/// Parse a rating, which must be exactly one of "1" through "5".
pub fn parse_rating(raw: Option<&str>) -> ApiResult<RatingValue> {
    let raw = raw.unwrap_or(MISSING_VALUE);
    raw.parse::<RatingValue>()
        .map_err(|_| ApiError::invalid_argument(raw, "rating"))
}

/// Validate the form fields of the add-rating endpoint.
///
/// `song_id` is checked before `rating`.
pub fn parse_rating_increment(
    song_id: Option<&str>,
    rating: Option<&str>,
    endpoint: &str,
) -> ApiResult<RatingIncrement> {
    let raw_id = present(song_id).ok_or_else(|| ApiError::missing_argument("song_id", endpoint))?;
    let song_id = parse_song_id(raw_id)?;
    let rating = parse_rating(rating)?;
    Ok(RatingIncrement::new(song_id, rating))
}
