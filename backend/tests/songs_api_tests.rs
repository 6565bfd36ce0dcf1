//! End-to-end tests of the HTTP API over the in-memory repository.

mod support;

use axum::http::StatusCode;
use serde_json::{json, Value};

use song_api::api::SongId;
use song_api::db::repositories::LocalRepository;
use support::{app_with, get, post_form, seeded_repository};

fn fresh_id() -> String {
    SongId::generate().to_hex()
}

async fn first_song_id(app: &axum::Router) -> String {
    let (_, songs) = get(app, "/songs").await;
    songs[0]["_id"].as_str().expect("hex id").to_string()
}

fn len(value: &Value) -> usize {
    value.as_array().map(Vec::len).unwrap_or(0)
}

// =============================================================================
// Empty store
// =============================================================================

#[tokio::test]
async fn test_get_songs_empty_db() {
    let app = app_with(LocalRepository::new());
    let (status, body) = get(&app, "/songs").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_get_avg_difficulty_empty_db() {
    let app = app_with(LocalRepository::new());
    let (status, body) = get(&app, "/songs/avg/difficulty").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

// =============================================================================
// Listing
// =============================================================================

#[tokio::test]
async fn test_get_songs_default_page() {
    let app = app_with(seeded_repository());
    let (status, body) = get(&app, "/songs").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(len(&body), 10);
    assert!(body[0]["_id"].is_string());
    assert_eq!(body[0]["released"], "2016-10-26");
    assert!(body[0].get("rating").is_none());
}

#[tokio::test]
async fn test_get_songs_repeated_parameter_uses_first() {
    let app = app_with(seeded_repository());
    let (status, body) = get(&app, "/songs?p=0&p=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(len(&body), 10);

    let (status, body) = get(&app, "/songs?n=3&n=fake").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(len(&body), 3);

    let (status, body) = get(&app, "/songs?n=fake&n=3").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "\"fake\" is not a valid argument for parameter \"n\"");
}

#[tokio::test]
async fn test_get_songs_with_huge_page() {
    let app = app_with(seeded_repository());
    let (status, body) = get(&app, "/songs?p=9223372036854775807&n=10").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, body) = get(&app, "/songs?p=9223372036854775807&n=9223372036854775807").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_get_songs_with_n() {
    let app = app_with(seeded_repository());
    let (status, body) = get(&app, "/songs?n=3").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(len(&body), 3);
    assert_eq!(body[2]["artist"], "Mr Fastfinger");
}

#[tokio::test]
async fn test_get_songs_with_p() {
    let app = app_with(seeded_repository());
    let (status, body) = get(&app, "/songs?p=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(len(&body), 1);
    assert_eq!(body[0]["title"], "Babysitting");
}

#[tokio::test]
async fn test_get_songs_with_n_and_p() {
    let app = app_with(seeded_repository());
    let (status, body) = get(&app, "/songs?p=2&n=3").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(len(&body), 3);
    assert_eq!(body[0]["title"], "Greasy Fingers - boss level");
}

#[tokio::test]
async fn test_get_songs_with_p_too_big() {
    let app = app_with(seeded_repository());
    let (status, body) = get(&app, "/songs?p=3").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_get_songs_with_zero_page_size() {
    let app = app_with(seeded_repository());
    let (status, body) = get(&app, "/songs?n=0").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_get_songs_with_invalid_n_and_p() {
    let app = app_with(seeded_repository());

    let (status, body) = get(&app, "/songs?p=fake").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "\"fake\" is not a valid argument for parameter \"p\"");

    let (status, body) = get(&app, "/songs?n=fake").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "\"fake\" is not a valid argument for parameter \"n\"");

    // p is validated first
    let (status, body) = get(&app, "/songs?p=fake&n=fake").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "\"fake\" is not a valid argument for parameter \"p\"");

    let (status, body) = get(&app, "/songs?n=-1").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "\"-1\" is not a valid argument for parameter \"n\"");
}

// =============================================================================
// Difficulty
// =============================================================================

#[tokio::test]
async fn test_get_avg_difficulty() {
    let app = app_with(seeded_repository());
    let (status, body) = get(&app, "/songs/avg/difficulty").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(len(&body), 4);

    let levels: Vec<i64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|group| group["_id"].as_i64().unwrap())
        .collect();
    assert_eq!(levels, vec![3, 6, 9, 13]);
}

#[tokio::test]
async fn test_get_avg_difficulty_with_level() {
    let app = app_with(seeded_repository());
    let (status, body) = get(&app, "/songs/avg/difficulty?level=6").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{"_id": 6, "averageDifficulty": 6.0}]));
}

#[tokio::test]
async fn test_get_avg_difficulty_repeated_level_uses_first() {
    let app = app_with(seeded_repository());
    let (status, body) = get(&app, "/songs/avg/difficulty?level=6&level=9").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([{"_id": 6, "averageDifficulty": 6.0}]));
}

#[tokio::test]
async fn test_get_avg_difficulty_with_level_not_found() {
    let app = app_with(seeded_repository());
    let (status, body) = get(&app, "/songs/avg/difficulty?level=11").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_get_avg_difficulty_with_invalid_level() {
    let app = app_with(seeded_repository());
    let (status, body) = get(&app, "/songs/avg/difficulty?level=fake").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["message"],
        "\"fake\" is not a valid argument for parameter \"level\""
    );
}

// =============================================================================
// Search
// =============================================================================

#[tokio::test]
async fn test_songs_search_no_message() {
    let app = app_with(seeded_repository());
    let (status, body) = get(&app, "/songs/search").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["message"],
        "argument \"message\" is required for endpoint \"/songs/search\""
    );
}

#[tokio::test]
async fn test_songs_search_valid_message() {
    let app = app_with(seeded_repository());
    for uri in [
        "/songs/search?message=Fastfinger",
        "/songs/search?message=fAsTfInGeR",
        "/songs/search?message=Awaki-Waki",
    ] {
        let (status, body) = get(&app, uri).await;
        assert_eq!(status, StatusCode::OK, "{}", uri);
        assert_eq!(len(&body), 1, "{}", uri);
        assert_eq!(body[0]["artist"], "Mr Fastfinger");
    }
}

#[tokio::test]
async fn test_songs_search_repeated_message_uses_first() {
    let app = app_with(seeded_repository());
    let (status, body) = get(&app, "/songs/search?message=Fastfinger&message=Yousicians").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(len(&body), 1);
    assert_eq!(body[0]["artist"], "Mr Fastfinger");
}

#[tokio::test]
async fn test_songs_search_valid_message_return_multi() {
    let app = app_with(seeded_repository());
    let (status, body) = get(&app, "/songs/search?message=Yousicians").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(len(&body), 10);
}

#[tokio::test]
async fn test_songs_search_valid_message_edge_cases() {
    let app = app_with(seeded_repository());

    // stop words never match
    let (status, body) = get(&app, "/songs/search?message=the").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    // diacritics are ignored
    let (status, body) = get(&app, "/songs/search?message=gr%C3%A9%C3%A5sy").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(len(&body), 1);
    assert_eq!(body[0]["title"], "Greasy Fingers - boss level");

    let (status, body) = get(&app, "/songs/search?message=greasy%20fingers").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(len(&body), 1);
    assert_eq!(body[0]["title"], "Greasy Fingers - boss level");
}

// =============================================================================
// Ratings
// =============================================================================

#[tokio::test]
async fn test_songs_rating_null_body() {
    let app = app_with(seeded_repository());
    let (status, body) = post_form(&app, "/songs/rating", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["message"],
        "argument \"song_id\" is required for endpoint \"/songs/rating\""
    );
}

#[tokio::test]
async fn test_songs_rating_invalid_id() {
    let app = app_with(seeded_repository());
    let (status, body) = post_form(&app, "/songs/rating", Some("song_id=hdhhd")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["message"],
        "\"hdhhd\" is not a valid argument for parameter \"song_id\""
    );
}

#[tokio::test]
async fn test_songs_rating_invalid_rating() {
    let app = app_with(seeded_repository());
    let id = fresh_id();

    let form = format!("song_id={}", id);
    let (status, body) = post_form(&app, "/songs/rating", Some(&form)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["message"],
        "\"None\" is not a valid argument for parameter \"rating\""
    );

    let form = format!("song_id={}&rating=invalid", id);
    let (status, body) = post_form(&app, "/songs/rating", Some(&form)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["message"],
        "\"invalid\" is not a valid argument for parameter \"rating\""
    );

    let form = format!("song_id={}&rating=10", id);
    let (status, body) = post_form(&app, "/songs/rating", Some(&form)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["message"],
        "\"10\" is not a valid argument for parameter \"rating\""
    );
}

#[tokio::test]
async fn test_songs_rating_not_found() {
    let app = app_with(seeded_repository());
    let id = fresh_id();
    let form = format!("song_id={}&rating=4", id);
    let (status, body) = post_form(&app, "/songs/rating", Some(&form)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], format!("song_id \"{}\" not found", id));
}

#[tokio::test]
async fn test_songs_rating_success() {
    let app = app_with(seeded_repository());
    let id = first_song_id(&app).await;

    let form = format!("song_id={}&rating=4", id);
    let (status, body) = post_form(&app, "/songs/rating", Some(&form)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "OK"}));

    let (_, songs) = get(&app, "/songs").await;
    assert_eq!(songs[0]["rating"], json!({"4": 1}));
}

#[tokio::test]
async fn test_songs_rating_repeated_field_uses_first() {
    let app = app_with(seeded_repository());
    let id = first_song_id(&app).await;

    let form = format!("song_id={}&rating=4&rating=5", id);
    let (status, body) = post_form(&app, "/songs/rating", Some(&form)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "OK"}));

    let form = format!("song_id={}&rating=invalid&rating=4", id);
    let (status, body) = post_form(&app, "/songs/rating", Some(&form)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["message"],
        "\"invalid\" is not a valid argument for parameter \"rating\""
    );

    let (_, songs) = get(&app, "/songs").await;
    assert_eq!(songs[0]["rating"], json!({"4": 1}));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_ratings_through_router() {
    let app = app_with(seeded_repository());
    let id = first_song_id(&app).await;
    let form = format!("song_id={}&rating=3", id);

    let handles: Vec<_> = (0..64)
        .map(|_| {
            let app = app.clone();
            let form = form.clone();
            tokio::spawn(async move { post_form(&app, "/songs/rating", Some(&form)).await })
        })
        .collect();
    for handle in handles {
        let (status, _) = handle.await.unwrap();
        assert_eq!(status, StatusCode::OK);
    }

    let (_, songs) = get(&app, "/songs").await;
    assert_eq!(songs[0]["rating"], json!({"3": 64}));

    let (_, stats) = get(&app, &format!("/songs/avg/rating/{}", id)).await;
    assert_eq!(stats["avg_rating"], 3.0);
}

#[tokio::test]
async fn test_songs_avg_rating_success() {
    let app = app_with(seeded_repository());
    let id = first_song_id(&app).await;

    for rating in ["4", "2", "5", "5"] {
        let form = format!("song_id={}&rating={}", id, rating);
        let (status, _) = post_form(&app, "/songs/rating", Some(&form)).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = get(&app, &format!("/songs/avg/rating/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["_id"], id.as_str());
    assert_eq!(body["min_rating"], 2);
    assert_eq!(body["max_rating"], 5);
    assert_eq!(body["avg_rating"], 4.0);
}

#[tokio::test]
async fn test_songs_avg_rating_unrated_song() {
    let app = app_with(seeded_repository());
    let id = first_song_id(&app).await;

    let (status, body) = get(&app, &format!("/songs/avg/rating/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["min_rating"], Value::Null);
    assert_eq!(body["max_rating"], Value::Null);
    assert_eq!(body["avg_rating"], Value::Null);
}

#[tokio::test]
async fn test_songs_avg_rating_invalid_oid() {
    let app = app_with(seeded_repository());
    let (status, body) = get(&app, "/songs/avg/rating/fake").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["message"],
        "\"fake\" is not a valid argument for parameter \"song_id\""
    );
}

#[tokio::test]
async fn test_songs_avg_rating_unknown_song() {
    let app = app_with(seeded_repository());
    let id = fresh_id();
    let (status, body) = get(&app, &format!("/songs/avg/rating/{}", id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], format!("song_id \"{}\" not found", id));
}

// =============================================================================
// Health and store failures
// =============================================================================

#[tokio::test]
async fn test_health_check() {
    let repo = seeded_repository();
    let app = app_with(repo.clone());

    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok", "database": "connected"}));

    repo.set_healthy(false);
    let (_, body) = get(&app, "/health").await;
    assert_eq!(body["database"], "disconnected");
}

#[tokio::test]
async fn test_store_failure_reports_internal_error() {
    let repo = seeded_repository();
    repo.set_healthy(false);
    let app = app_with(repo);

    let (status, body) = get(&app, "/songs").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("internal error:"));
}
