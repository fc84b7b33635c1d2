//! HTTP client for the Roverr backend.
//!
//! Requests carry no timeout: a slow response only delays the caller's next
//! poll. Failures are classified so pollers can tell a dropped request apart
//! from a response that parsed but reported failure.

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::protocol::{
    decode_collection, decode_detail, decode_movie_list, ActionResult, BatchCopyRequest,
    BatchCopyResult, BatchDeleteOptions, BatchDeleteRequest, BatchDeleteResult, DetailResponse,
    Entity, IdentifyRequest, MovieDetail, MovieList, MoveResult, RssStatus, SettingsRecord,
    ShapeError, TorrentRecord, TriggerResult, API_PREFIX,
};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request to {route} failed: {source}")]
    Transport {
        route: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{route} returned HTTP {status}")]
    Status { route: String, status: StatusCode },
    #[error("{route} returned an unexpected body: {source}")]
    Decode {
        route: String,
        #[source]
        source: ShapeError,
    },
    /// The response parsed but reports failure.
    #[error("{0}")]
    Application(String),
}

impl ApiError {
    /// The request never produced a usable response.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Status { .. })
    }

    /// Message suitable for a notification.
    pub fn user_message(&self) -> String {
        match self {
            Self::Application(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, route: &str) -> String {
        format!("{}{}{}", self.base_url, API_PREFIX, route)
    }

    // ── Transport ─────────────────────────────────────────────────────────────

    /// GET a polled route. A `t` query parameter defeats intermediary caches.
    async fn get_polled(&self, route: &str) -> ApiResult<Vec<u8>> {
        let stamp = chrono::Utc::now().timestamp_millis();
        let request = self.http.get(self.url(route)).query(&[("t", stamp)]);
        self.send(route, request, false).await
    }

    async fn get_plain(&self, route: &str) -> ApiResult<Vec<u8>> {
        let request = self.http.get(self.url(route));
        self.send(route, request, false).await
    }

    /// Action routes answer failures with a JSON body too, so the body is
    /// returned for any status and the caller decides.
    async fn post<B: Serialize + ?Sized>(&self, route: &str, body: Option<&B>) -> ApiResult<Vec<u8>> {
        let mut request = self.http.post(self.url(route));
        if let Some(body) = body {
            request = request.json(body);
        }
        self.send(route, request, true).await
    }

    async fn send(
        &self,
        route: &str,
        request: reqwest::RequestBuilder,
        keep_error_body: bool,
    ) -> ApiResult<Vec<u8>> {
        let response = request.send().await.map_err(|source| ApiError::Transport {
            route: route.to_string(),
            source,
        })?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(|source| ApiError::Transport {
            route: route.to_string(),
            source,
        })?;
        debug!("[api] {} -> {} ({} bytes)", route, status, bytes.len());

        if !status.is_success() && !(keep_error_body && looks_like_json(&bytes)) {
            return Err(ApiError::Status {
                route: route.to_string(),
                status,
            });
        }
        Ok(bytes.to_vec())
    }

    fn decode<T: DeserializeOwned>(route: &str, body: &[u8]) -> ApiResult<T> {
        serde_json::from_slice(body).map_err(|e| ApiError::Decode {
            route: route.to_string(),
            source: ShapeError::from(e),
        })
    }

    // ── Collections ───────────────────────────────────────────────────────────

    pub async fn list_torrents(&self) -> ApiResult<Vec<Entity<TorrentRecord>>> {
        let route = "/torrents";
        let body = self.get_polled(route).await?;
        decode_collection(&body).map_err(|source| ApiError::Decode {
            route: route.to_string(),
            source,
        })
    }

    pub async fn list_movies(&self) -> ApiResult<MovieList> {
        let route = "/movies";
        let body = self.get_polled(route).await?;
        decode_movie_list(&body).map_err(|source| ApiError::Decode {
            route: route.to_string(),
            source,
        })
    }

    pub async fn movie_detail(&self, id: &str) -> ApiResult<MovieDetail> {
        let route = format!("/movie/{}", id);
        let body = self.get_polled(&route).await?;
        match decode_detail(&body) {
            Ok(DetailResponse::Movie(detail)) => Ok(*detail),
            Ok(DetailResponse::Error(msg)) => Err(ApiError::Application(msg)),
            Err(source) => Err(ApiError::Decode { route, source }),
        }
    }

    pub async fn rss_status(&self) -> ApiResult<RssStatus> {
        let route = "/rss/status";
        let body = self.get_polled(route).await?;
        Self::decode(route, &body)
    }

    pub async fn settings(&self) -> ApiResult<SettingsRecord> {
        let route = "/settings";
        let body = self.get_plain(route).await?;
        Self::decode(route, &body)
    }

    // ── Actions ───────────────────────────────────────────────────────────────

    pub async fn save_settings(&self, settings: &SettingsRecord) -> ApiResult<ActionResult> {
        let route = "/settings";
        let body = self.post(route, Some(settings)).await?;
        succeeded(Self::decode(route, &body)?, "Error saving settings")
    }

    /// Start relocating one entity. Succeeds only when the backend reports
    /// `status: "started"`.
    pub async fn move_entity(&self, id: &str) -> ApiResult<MoveResult> {
        let route = format!("/move/{}", id);
        let body = self.post::<()>(&route, None).await?;
        let result: MoveResult = Self::decode(&route, &body)?;
        if result.is_started() {
            Ok(result)
        } else {
            Err(ApiError::Application(
                result
                    .message
                    .unwrap_or_else(|| format!("Move not started ({})", result.status)),
            ))
        }
    }

    pub async fn stop_copy(&self, id: &str) -> ApiResult<ActionResult> {
        let route = format!("/stop/{}", id);
        let body = self.post::<()>(&route, None).await?;
        succeeded(Self::decode(&route, &body)?, "Error stopping copy")
    }

    pub async fn mark_moved(&self, id: &str) -> ApiResult<ActionResult> {
        let route = format!("/mark/{}", id);
        let body = self.post::<()>(&route, None).await?;
        succeeded(Self::decode(&route, &body)?, "Error marking as moved")
    }

    /// Re-point a movie at a TMDB entry and refresh its metadata.
    pub async fn identify_movie(&self, id: &str, tmdb_id: u64) -> ApiResult<ActionResult> {
        let route = format!("/movie/{}/identify", id);
        let request = IdentifyRequest { tmdb_id };
        let body = self.post(&route, Some(&request)).await?;
        succeeded(Self::decode(&route, &body)?, "Error identifying movie")
    }

    pub async fn batch_copy(&self, ids: &[String]) -> ApiResult<BatchCopyResult> {
        let route = "/movies/batch-copy";
        let request = BatchCopyRequest {
            torrent_hashes: ids.to_vec(),
        };
        let body = self.post(route, Some(&request)).await?;
        let result: BatchCopyResult = Self::decode(route, &body)?;
        if result.success {
            Ok(result)
        } else {
            Err(ApiError::Application(
                result
                    .message
                    .unwrap_or_else(|| "Error copying movies".to_string()),
            ))
        }
    }

    pub async fn batch_delete(
        &self,
        ids: &[String],
        options: &BatchDeleteOptions,
    ) -> ApiResult<BatchDeleteResult> {
        let route = "/movies/batch-delete";
        let request = BatchDeleteRequest {
            torrent_hashes: ids.to_vec(),
            options: options.clone(),
        };
        let body = self.post(route, Some(&request)).await?;
        let result: BatchDeleteResult = Self::decode(route, &body)?;
        if result.success {
            Ok(result)
        } else {
            Err(ApiError::Application(
                result
                    .message
                    .unwrap_or_else(|| "Error processing request".to_string()),
            ))
        }
    }

    /// Ask the backend to run its processing pass now.
    pub async fn trigger_check(&self) -> ApiResult<TriggerResult> {
        let route = "/trigger";
        let body = self.post::<()>(route, None).await?;
        let result: TriggerResult = Self::decode(route, &body)?;
        if result.is_ok() {
            Ok(result)
        } else {
            Err(ApiError::Application("Error triggering check".to_string()))
        }
    }

    pub async fn fetch_rss(&self) -> ApiResult<ActionResult> {
        let route = "/rss/fetch";
        let body = self.post::<()>(route, None).await?;
        succeeded(Self::decode(route, &body)?, "Error fetching RSS")
    }
}

fn succeeded(result: ActionResult, fallback: &str) -> ApiResult<ActionResult> {
    if result.success {
        Ok(result)
    } else {
        Err(ApiError::Application(
            result.message.unwrap_or_else(|| fallback.to_string()),
        ))
    }
}

fn looks_like_json(body: &[u8]) -> bool {
    body.iter()
        .find(|b| !b.is_ascii_whitespace())
        .map_or(false, |b| *b == b'{')
}
