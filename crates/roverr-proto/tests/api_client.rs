mod common;

use axum::http::StatusCode;
use common::mock_backend::{Backend, MockBackend};
use roverr_proto::client::{ApiClient, ApiError};
use roverr_proto::protocol::{BatchDeleteOptions, Entity, Status};
use serde_json::json;

fn backend() -> Backend {
    Backend {
        torrents: json!([
            { "hash": "h1", "name": "Alpha.2019.1080p", "status": "moved", "progress": 1.0,
              "size": 1024, "added_on": 10, "completion_on": 20, "ratio": 1.2, "state": "stalledUP" },
            { "hash": "h2", "name": "Beta.2021.2160p", "status": "copying", "progress": 1.0,
              "copy_progress": { "percent": 40.0, "speed": 80.5, "status": "copying" } },
            { "hash": "h3", "name": "Broken", "status": 17 }
        ]),
        movies: json!({
            "movies": [
                { "torrent_hash": "h1", "title": "Alpha", "year": 2019, "status": "moved", "progress": 1.0 },
                { "torrent_hash": "h2", "title": "Beta", "year": "N/A", "status": "copying", "progress": 1.0 }
            ],
            "ignored_series": ["Some Show S02", "Other Show S01"]
        }),
        details: vec![(
            "h2".to_string(),
            json!({ "torrent_hash": "h2", "title": "Beta", "status": "copying",
                    "copy_progress": { "percent": 40.0, "speed": 80.5 },
                    "runtime": 121, "genres": ["Drama"] }),
        )],
        move_reply: json!({ "status": "started", "message": "Copy started" }),
        action_reply: json!({ "success": true, "message": "ok" }),
        batch_copy_reply: json!({ "success": true, "copied": 2, "skipped": 0, "errors": [] }),
        batch_delete_reply: json!({ "success": true, "deleted_from_db": 2, "deleted_from_folder": 0,
                                    "added_to_watchlist": 0, "errors": [] }),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_list_torrents_is_tolerant_and_cache_busted() {
    let mock = MockBackend::start(backend()).await;
    let client = ApiClient::new(&mock.base_url);

    let torrents = client.list_torrents().await.expect("torrents");
    assert_eq!(torrents.len(), 3);
    assert!(matches!(&torrents[2], Entity::Malformed(m) if m.id == "h3"));
    let beta = torrents[1].valid().expect("beta decodes");
    assert_eq!(beta.status, Status::Copying);
    assert_eq!(beta.copy_progress.as_ref().map(|p| p.percent), Some(40.0));

    client.list_torrents().await.expect("second fetch");
    let seen = mock.state.lock().unwrap().seen_cache_bust.clone();
    assert_eq!(seen.len(), 2);
    assert!(seen.iter().all(|t| t.parse::<i64>().is_ok()));
}

#[tokio::test]
async fn test_list_movies_reads_ignored_series() {
    let mock = MockBackend::start(backend()).await;
    let client = ApiClient::new(&mock.base_url);

    let list = client.list_movies().await.expect("movies");
    assert_eq!(list.movies.len(), 2);
    assert_eq!(list.ignored_series.len(), 2);
}

#[tokio::test]
async fn test_non_2xx_list_is_transport_error() {
    let mut b = backend();
    b.fail_torrents_with = Some(StatusCode::BAD_GATEWAY);
    let mock = MockBackend::start(b).await;
    let client = ApiClient::new(&mock.base_url);

    let err = client.list_torrents().await.unwrap_err();
    assert!(err.is_transport(), "unexpected error {err:?}");
}

#[tokio::test]
async fn test_fatal_parse_failure_is_decode_error() {
    let mut b = backend();
    b.torrents = json!({ "detail": "not a list" });
    let mock = MockBackend::start(b).await;
    let client = ApiClient::new(&mock.base_url);

    let err = client.list_torrents().await.unwrap_err();
    assert!(matches!(err, ApiError::Decode { .. }));
}

#[tokio::test]
async fn test_unreachable_backend_is_transport_error() {
    let client = ApiClient::new("http://127.0.0.1:9");
    let err = client.list_movies().await.unwrap_err();
    assert!(err.is_transport());
}

#[tokio::test]
async fn test_movie_detail_and_error_body() {
    let mock = MockBackend::start(backend()).await;
    let client = ApiClient::new(&mock.base_url);

    let detail = client.movie_detail("h2").await.expect("detail");
    assert_eq!(detail.status(), Status::Copying);
    assert_eq!(detail.runtime, Some(121));

    let err = client.movie_detail("nope").await.unwrap_err();
    match err {
        ApiError::Application(msg) => assert_eq!(msg, "Movie not found"),
        other => panic!("expected application error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_move_requires_started_status() {
    let mock = MockBackend::start(backend()).await;
    let client = ApiClient::new(&mock.base_url);
    assert!(client.move_entity("h1").await.is_ok());

    mock.state.lock().unwrap().move_reply =
        json!({ "status": "error", "message": "Source path missing" });
    let err = client.move_entity("h1").await.unwrap_err();
    assert_eq!(err.user_message(), "Source path missing");
}

#[tokio::test]
async fn test_failed_action_with_error_status_is_application_error() {
    let mut b = backend();
    b.action_reply = json!({ "success": false, "message": "No copy running" });
    let mock = MockBackend::start(b).await;
    let client = ApiClient::new(&mock.base_url);

    let err = client.stop_copy("h2").await.unwrap_err();
    assert!(matches!(&err, ApiError::Application(m) if m == "No copy running"));
    assert!(client.mark_moved("h2").await.is_err());
    assert_eq!(mock.hits("action"), 2);
}

#[tokio::test]
async fn test_batch_requests_carry_ids_and_flags() {
    let mock = MockBackend::start(backend()).await;
    let client = ApiClient::new(&mock.base_url);
    let ids = vec!["h1".to_string(), "h2".to_string()];

    let copied = client.batch_copy(&ids).await.expect("copy");
    assert_eq!(copied.copied, 2);

    let opts = BatchDeleteOptions {
        delete_from_db: true,
        delete_from_destination: false,
        ignore_movie: true,
        watchlist_movie: false,
        watchlist_days: 7,
    };
    let deleted = client.batch_delete(&ids, &opts).await.expect("delete");
    assert_eq!(deleted.deleted_from_db, 2);

    let s = mock.state.lock().unwrap();
    assert_eq!(
        s.last_batch_copy,
        Some(json!({ "torrent_hashes": ["h1", "h2"] }))
    );
    assert_eq!(
        s.last_batch_delete,
        Some(json!({
            "torrent_hashes": ["h1", "h2"],
            "delete_from_db": true,
            "delete_from_destination": false,
            "ignore_movie": true,
            "watchlist_movie": false,
            "watchlist_days": 7
        }))
    );
}

#[tokio::test]
async fn test_batch_copy_failure_keeps_backend_message() {
    let mut b = backend();
    b.batch_copy_reply = json!({ "success": false, "message": "Destination not mounted" });
    let mock = MockBackend::start(b).await;
    let client = ApiClient::new(&mock.base_url);

    let err = client.batch_copy(&["h1".to_string()]).await.unwrap_err();
    assert_eq!(err.user_message(), "Destination not mounted");
}

#[tokio::test]
async fn test_rss_settings_and_triggers() {
    let mock = MockBackend::start(backend()).await;
    let client = ApiClient::new(&mock.base_url);

    let rss = client.rss_status().await.expect("rss");
    assert_eq!(rss.countdown_label().as_deref(), Some("Next RSS: YTS in 01:01"));

    let mut settings = client.settings().await.expect("settings");
    assert_eq!(settings.get("language"), Some(&json!("en-US")));
    settings.insert("language".into(), json!("es-ES"));
    client.save_settings(&settings).await.expect("save");
    assert_eq!(
        mock.state.lock().unwrap().posted_settings,
        Some(json!({ "auto_move": true, "language": "es-ES" }))
    );

    assert!(client.trigger_check().await.is_ok());
    let fetched = client.fetch_rss().await.expect("rss fetch");
    assert_eq!(fetched.message.as_deref(), Some("Fetched 3 new movies"));
}

#[tokio::test]
async fn test_identify_posts_tmdb_id() {
    let mock = MockBackend::start(backend()).await;
    let client = ApiClient::new(&mock.base_url);

    let ok = client.identify_movie("h2", 550).await.unwrap();
    assert_eq!(ok.message.as_deref(), Some("Movie updated"));
    {
        let s = mock.state.lock().unwrap();
        let (id, body) = s.last_identify.clone().unwrap();
        assert_eq!(id, "h2");
        assert_eq!(body, json!({ "tmdb_id": 550 }));
    }

    let err = client.identify_movie("h2", 9).await.unwrap_err();
    assert!(matches!(err, ApiError::Application(ref m) if m == "TMDB ID not found"));
    assert_eq!(mock.hits("identify"), 2);
}
