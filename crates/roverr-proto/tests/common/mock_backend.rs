#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// Canned responses plus a record of what the client sent.
#[derive(Debug, Default)]
pub struct Backend {
    pub torrents: Value,
    pub movies: Value,
    pub details: Vec<(String, Value)>,
    pub move_reply: Value,
    pub action_reply: Value,
    pub batch_copy_reply: Value,
    pub batch_delete_reply: Value,
    pub fail_torrents_with: Option<StatusCode>,

    pub seen_cache_bust: Vec<String>,
    pub last_batch_copy: Option<Value>,
    pub last_batch_delete: Option<Value>,
    pub posted_settings: Option<Value>,
    pub last_identify: Option<(String, Value)>,
    pub hits: Vec<String>,
}

pub type Shared = Arc<Mutex<Backend>>;

pub struct MockBackend {
    pub base_url: String,
    pub state: Shared,
}

impl MockBackend {
    pub async fn start(backend: Backend) -> Self {
        let state: Shared = Arc::new(Mutex::new(backend));
        let app = Router::new()
            .route("/api/torrents", get(torrents))
            .route("/api/movies", get(movies))
            .route("/api/movie/:id", get(movie_detail))
            .route("/api/movie/:id/identify", post(identify))
            .route("/api/rss/status", get(rss_status))
            .route("/api/settings", get(get_settings).post(post_settings))
            .route("/api/move/:id", post(move_entity))
            .route("/api/stop/:id", post(action))
            .route("/api/mark/:id", post(action))
            .route("/api/movies/batch-copy", post(batch_copy))
            .route("/api/movies/batch-delete", post(batch_delete))
            .route("/api/trigger", post(trigger))
            .route("/api/rss/fetch", post(rss_fetch))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock backend");
        let addr = listener.local_addr().expect("mock backend addr");
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    pub fn hits(&self, route: &str) -> usize {
        let s = self.state.lock().unwrap();
        s.hits.iter().filter(|h| h.as_str() == route).count()
    }
}

fn record(state: &Shared, route: &str) {
    state.lock().unwrap().hits.push(route.to_string());
}

async fn torrents(
    State(state): State<Shared>,
    Query(q): Query<std::collections::HashMap<String, String>>,
) -> Response {
    record(&state, "torrents");
    let mut s = state.lock().unwrap();
    if let Some(t) = q.get("t") {
        s.seen_cache_bust.push(t.clone());
    }
    if let Some(code) = s.fail_torrents_with {
        return (code, "upstream unavailable").into_response();
    }
    Json(s.torrents.clone()).into_response()
}

async fn movies(State(state): State<Shared>) -> Json<Value> {
    record(&state, "movies");
    Json(state.lock().unwrap().movies.clone())
}

async fn movie_detail(State(state): State<Shared>, Path(id): Path<String>) -> Json<Value> {
    record(&state, "detail");
    let s = state.lock().unwrap();
    let found = s
        .details
        .iter()
        .find(|(k, _)| *k == id)
        .map(|(_, v)| v.clone());
    Json(found.unwrap_or_else(|| json!({ "error": "Movie not found" })))
}

async fn identify(
    State(state): State<Shared>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Json<Value> {
    record(&state, "identify");
    let known = body.get("tmdb_id").and_then(Value::as_u64) == Some(550);
    state.lock().unwrap().last_identify = Some((id, body));
    if known {
        Json(json!({ "success": true, "message": "Movie updated" }))
    } else {
        Json(json!({ "success": false, "message": "TMDB ID not found" }))
    }
}

async fn rss_status(State(state): State<Shared>) -> Json<Value> {
    record(&state, "rss");
    Json(json!({
        "has_feeds": true,
        "countdown_seconds": 61,
        "next_feed_name": "YTS",
        "next_feed_url": "https://example.invalid/rss"
    }))
}

async fn get_settings(State(state): State<Shared>) -> Json<Value> {
    record(&state, "settings");
    Json(json!({ "auto_move": true, "language": "en-US" }))
}

async fn post_settings(State(state): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    record(&state, "settings-post");
    state.lock().unwrap().posted_settings = Some(body);
    Json(json!({ "success": true, "message": "Settings saved" }))
}

async fn move_entity(State(state): State<Shared>, Path(_id): Path<String>) -> Json<Value> {
    record(&state, "move");
    Json(state.lock().unwrap().move_reply.clone())
}

async fn action(State(state): State<Shared>, Path(_id): Path<String>) -> Response {
    record(&state, "action");
    let reply = state.lock().unwrap().action_reply.clone();
    let failed = reply.get("success") == Some(&Value::Bool(false));
    let code = if failed {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::OK
    };
    (code, Json(reply)).into_response()
}

async fn batch_copy(State(state): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    record(&state, "batch-copy");
    let mut s = state.lock().unwrap();
    s.last_batch_copy = Some(body);
    Json(s.batch_copy_reply.clone())
}

async fn batch_delete(State(state): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    record(&state, "batch-delete");
    let mut s = state.lock().unwrap();
    s.last_batch_delete = Some(body);
    Json(s.batch_delete_reply.clone())
}

async fn trigger(State(state): State<Shared>) -> Json<Value> {
    record(&state, "trigger");
    Json(json!({ "status": "triggered" }))
}

async fn rss_fetch(State(state): State<Shared>) -> Json<Value> {
    record(&state, "rss-fetch");
    Json(json!({ "success": true, "message": "Fetched 3 new movies" }))
}
