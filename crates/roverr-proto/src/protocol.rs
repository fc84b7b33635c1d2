//! Wire types for the Roverr REST API.
//!
//! Collections are decoded one element at a time: a body that is not the
//! expected top-level shape fails the whole fetch, while a single malformed
//! element degrades to [`Entity::Malformed`] and the rest still decodes.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

/// Path prefix every backend route lives under.
pub const API_PREFIX: &str = "/api";

// ── Status ────────────────────────────────────────────────────────────────────

/// Lifecycle status shared by torrents and movies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    New,
    Pending,
    Downloading,
    Copying,
    Moved,
    MovedManually,
    Missing,
    Error,
    Skipped,
    Orphaned,
}

/// Statuses under which an entity may still change without user action.
pub const LIVE_STATUSES: [Status; 4] = [
    Status::New,
    Status::Pending,
    Status::Downloading,
    Status::Copying,
];

/// Statuses after which an entity only changes through explicit user action.
pub const TERMINAL_STATUSES: [Status; 6] = [
    Status::Moved,
    Status::MovedManually,
    Status::Skipped,
    Status::Error,
    Status::Orphaned,
    Status::Missing,
];

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Pending => "pending",
            Self::Downloading => "downloading",
            Self::Copying => "copying",
            Self::Moved => "moved",
            Self::MovedManually => "moved_manually",
            Self::Missing => "missing",
            Self::Error => "error",
            Self::Skipped => "skipped",
            Self::Orphaned => "orphaned",
        }
    }

    pub fn is_live(self) -> bool {
        LIVE_STATUSES.contains(&self)
    }

    pub fn is_terminal(self) -> bool {
        TERMINAL_STATUSES.contains(&self)
    }

    /// A transfer is running right now (drives the fast list cadence).
    pub fn is_in_progress(self) -> bool {
        matches!(self, Self::Downloading | Self::Copying)
    }

    /// Entities in these statuses are never sent to a bulk copy.
    pub fn blocks_copy(self) -> bool {
        matches!(self, Self::Error | Self::Orphaned)
    }

    pub fn class(self) -> StatusClass {
        match self {
            Self::Moved | Self::MovedManually => StatusClass::Moved,
            Self::Error => StatusClass::Error,
            Self::Skipped => StatusClass::Skipped,
            Self::Copying => StatusClass::Copying,
            Self::New => StatusClass::New,
            Self::Orphaned => StatusClass::Orphaned,
            Self::Pending | Self::Downloading | Self::Missing => StatusClass::Pending,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Moved | Self::MovedManually => "Moved",
            Self::Copying => "Copying",
            Self::Pending => "Pending",
            Self::Missing => "Missing",
            Self::New => "New",
            Self::Orphaned => "Orphaned",
            Self::Downloading => "Downloading",
            Self::Error => "Error",
            Self::Skipped => "Skipped",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Visual class of a status badge. Several statuses share one class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusClass {
    Moved,
    Error,
    Skipped,
    Copying,
    New,
    Orphaned,
    Pending,
}

// ── Records ───────────────────────────────────────────────────────────────────

/// Live copy progress attached by the backend while a copy job runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CopyProgress {
    #[serde(default)]
    pub percent: f64,
    /// MB/s
    #[serde(default)]
    pub speed: f64,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TorrentRecord {
    pub hash: String,
    pub name: String,
    #[serde(default)]
    pub size: u64,
    /// Fraction 0..=1.
    #[serde(default)]
    pub progress: f64,
    #[serde(default)]
    pub ratio: f64,
    #[serde(default)]
    pub added_on: i64,
    /// 0 (or negative) while not completed.
    #[serde(default)]
    pub completion_on: i64,
    pub status: Status,
    /// Download-engine sub-state, e.g. `stalledUP`.
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub copy_progress: Option<CopyProgress>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub content_path: Option<String>,
    #[serde(default)]
    pub tags: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

/// Release year. The backend sends `"N/A"` for rows it could not identify.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Year {
    Number(i64),
    Text(String),
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieRecord {
    pub torrent_hash: String,
    pub title: String,
    #[serde(default)]
    pub year: Option<Year>,
    pub status: Status,
    /// Fraction 0..=1.
    #[serde(default)]
    pub progress: f64,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub poster_url: Option<String>,
    #[serde(default)]
    pub backdrop_url: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CastMember {
    pub name: String,
    #[serde(default)]
    pub character: Option<String>,
    #[serde(default)]
    pub profile_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrewMember {
    pub name: String,
    #[serde(default)]
    pub job: Option<String>,
    #[serde(default)]
    pub profile_path: Option<String>,
}

/// Download statistics for the detail view. `progress` is a percentage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DownloadStats {
    #[serde(default)]
    pub progress: f64,
    /// MB/s
    #[serde(default)]
    pub speed: f64,
}

/// Extended movie record returned by the detail route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetail {
    #[serde(flatten)]
    pub movie: MovieRecord,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub cast: Vec<CastMember>,
    #[serde(default)]
    pub crew: Vec<CrewMember>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub vote_count: Option<u64>,
    #[serde(default)]
    pub imdb_id: Option<String>,
    #[serde(default)]
    pub imdb_rating: Option<String>,
    #[serde(default)]
    pub imdb_votes: Option<String>,
    #[serde(default)]
    pub source_path: Option<String>,
    #[serde(default)]
    pub dest_path: Option<String>,
    #[serde(default)]
    pub copy_progress: Option<CopyProgress>,
    #[serde(default)]
    pub download_stats: Option<DownloadStats>,
}

/// The sub-fields of a detail view that change while a transfer runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiveFields {
    /// 0..=100
    pub percent: f64,
    /// MB/s
    pub speed: f64,
}

impl MovieDetail {
    pub fn id(&self) -> &str {
        &self.movie.torrent_hash
    }

    pub fn status(&self) -> Status {
        self.movie.status
    }

    /// Live transfer figures, present only while copying or downloading.
    pub fn live_fields(&self) -> Option<LiveFields> {
        match self.movie.status {
            Status::Copying => self.copy_progress.as_ref().map(|p| LiveFields {
                percent: p.percent,
                speed: p.speed,
            }),
            Status::Downloading => self.download_stats.as_ref().map(|d| LiveFields {
                percent: d.progress,
                speed: d.speed,
            }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RssStatus {
    #[serde(default)]
    pub has_feeds: bool,
    #[serde(default = "default_countdown")]
    pub countdown_seconds: i64,
    #[serde(default)]
    pub next_feed_name: Option<String>,
    #[serde(default)]
    pub next_feed_url: Option<String>,
}

fn default_countdown() -> i64 {
    -1
}

impl RssStatus {
    /// `Next RSS: <name> in mm:ss`, or `None` when there is nothing scheduled.
    pub fn countdown_label(&self) -> Option<String> {
        if !self.has_feeds || self.countdown_seconds < 0 {
            return None;
        }
        let mins = self.countdown_seconds / 60;
        let secs = self.countdown_seconds % 60;
        let name = self.next_feed_name.as_deref().unwrap_or("RSS");
        Some(format!("Next RSS: {} in {:02}:{:02}", name, mins, secs))
    }
}

/// Opaque settings object; the settings form owns its schema.
pub type SettingsRecord = serde_json::Map<String, Value>;

// ── Action results ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveResult {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

impl MoveResult {
    pub fn is_started(&self) -> bool {
        self.status == "started"
    }
}

/// `{ success, message }` returned by stop, mark, settings and RSS fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionResult {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerResult {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub success: Option<bool>,
}

impl TriggerResult {
    /// The backend only reports failure explicitly.
    pub fn is_ok(&self) -> bool {
        self.success != Some(false)
    }
}

/// Body of the manual identify route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentifyRequest {
    pub tmdb_id: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchCopyRequest {
    pub torrent_hashes: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchCopyResult {
    pub success: bool,
    #[serde(default)]
    pub copied: u32,
    #[serde(default)]
    pub skipped: u32,
    #[serde(default)]
    pub errors: Vec<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// What a bulk delete should do with each selected movie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchDeleteOptions {
    pub delete_from_db: bool,
    pub delete_from_destination: bool,
    pub ignore_movie: bool,
    pub watchlist_movie: bool,
    #[serde(default = "default_watchlist_days")]
    pub watchlist_days: u32,
}

fn default_watchlist_days() -> u32 {
    7
}

impl Default for BatchDeleteOptions {
    fn default() -> Self {
        Self {
            delete_from_db: true,
            delete_from_destination: false,
            ignore_movie: false,
            watchlist_movie: false,
            watchlist_days: default_watchlist_days(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DeleteOptionsError {
    #[error("Watchlist requires removing from dashboard")]
    WatchlistNeedsDb,
    #[error("Please select at least one option")]
    NothingSelected,
}

impl BatchDeleteOptions {
    pub fn validate(&self) -> Result<(), DeleteOptionsError> {
        if self.watchlist_movie {
            if !self.delete_from_db {
                return Err(DeleteOptionsError::WatchlistNeedsDb);
            }
        } else if !self.delete_from_db && !self.delete_from_destination {
            return Err(DeleteOptionsError::NothingSelected);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchDeleteRequest {
    pub torrent_hashes: Vec<String>,
    #[serde(flatten)]
    pub options: BatchDeleteOptions,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchDeleteResult {
    pub success: bool,
    #[serde(default)]
    pub deleted_from_db: u32,
    #[serde(default)]
    pub deleted_from_folder: u32,
    #[serde(default)]
    pub added_to_watchlist: u32,
    #[serde(default)]
    pub errors: Vec<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl BatchDeleteResult {
    /// User-facing summary for a successful delete run with `options`.
    pub fn summary(&self, options: &BatchDeleteOptions) -> String {
        if self.added_to_watchlist > 0 {
            return format!(
                "{} movie(s) added to watchlist for {} days",
                self.added_to_watchlist, options.watchlist_days
            );
        }
        let mut parts = Vec::new();
        if options.delete_from_db {
            parts.push(format!("{} removed from DB.", self.deleted_from_db));
        }
        if options.delete_from_destination {
            parts.push(format!("{} files deleted.", self.deleted_from_folder));
        }
        parts.join(" ")
    }
}

// ── Tolerant decoding ─────────────────────────────────────────────────────────

/// The top-level body did not have the expected shape.
#[derive(Debug, Error)]
pub enum ShapeError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected {expected}, got {found}")]
    Unexpected {
        expected: &'static str,
        found: &'static str,
    },
}

/// A record type that lives in a keyed collection.
pub trait Keyed: DeserializeOwned {
    /// JSON field holding the stable id.
    const ID_FIELD: &'static str;
    /// JSON field holding the display title.
    const TITLE_FIELD: &'static str;

    fn id(&self) -> &str;
}

impl Keyed for TorrentRecord {
    const ID_FIELD: &'static str = "hash";
    const TITLE_FIELD: &'static str = "name";

    fn id(&self) -> &str {
        &self.hash
    }
}

impl Keyed for MovieRecord {
    const ID_FIELD: &'static str = "torrent_hash";
    const TITLE_FIELD: &'static str = "title";

    fn id(&self) -> &str {
        &self.torrent_hash
    }
}

/// An element that had an id but failed to decode as a full record.
#[derive(Debug, Clone, PartialEq)]
pub struct MalformedEntity {
    pub id: String,
    pub title: Option<String>,
    /// Raw `progress` when it survived as a number.
    pub progress: Option<f64>,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Entity<T> {
    Valid(T),
    Malformed(MalformedEntity),
}

impl<T: Keyed> Entity<T> {
    pub fn id(&self) -> &str {
        match self {
            Self::Valid(record) => record.id(),
            Self::Malformed(m) => &m.id,
        }
    }

    pub fn valid(&self) -> Option<&T> {
        match self {
            Self::Valid(record) => Some(record),
            Self::Malformed(_) => None,
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn decode_entity<T: Keyed>(value: Value) -> Option<Entity<T>> {
    let id = value
        .get(T::ID_FIELD)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string);
    let title = value
        .get(T::TITLE_FIELD)
        .and_then(Value::as_str)
        .map(str::to_string);
    let progress = value.get("progress").and_then(Value::as_f64);

    match serde_json::from_value::<T>(value) {
        Ok(record) => Some(Entity::Valid(record)),
        Err(e) => match id {
            Some(id) => {
                warn!("[decode] malformed {} {}: {}", T::ID_FIELD, id, e);
                Some(Entity::Malformed(MalformedEntity {
                    id,
                    title,
                    progress,
                    reason: e.to_string(),
                }))
            }
            None => {
                warn!("[decode] dropping element without {}: {}", T::ID_FIELD, e);
                None
            }
        },
    }
}

fn decode_elements<T: Keyed>(items: Vec<Value>) -> Vec<Entity<T>> {
    items.into_iter().filter_map(decode_entity::<T>).collect()
}

/// Decode a JSON array body element by element.
pub fn decode_collection<T: Keyed>(body: &[u8]) -> Result<Vec<Entity<T>>, ShapeError> {
    match serde_json::from_slice::<Value>(body)? {
        Value::Array(items) => Ok(decode_elements(items)),
        other => Err(ShapeError::Unexpected {
            expected: "array",
            found: kind_of(&other),
        }),
    }
}

/// Result of the movie list route.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MovieList {
    pub movies: Vec<Entity<MovieRecord>>,
    pub ignored_series: Vec<String>,
}

/// Accepts `{ movies, ignored_series }` and the older bare-array shape.
pub fn decode_movie_list(body: &[u8]) -> Result<MovieList, ShapeError> {
    match serde_json::from_slice::<Value>(body)? {
        Value::Array(items) => Ok(MovieList {
            movies: decode_elements(items),
            ignored_series: Vec::new(),
        }),
        Value::Object(mut map) => {
            let movies = match map.remove("movies") {
                Some(Value::Array(items)) => items,
                Some(other) => {
                    return Err(ShapeError::Unexpected {
                        expected: "movies array",
                        found: kind_of(&other),
                    })
                }
                None => {
                    return Err(ShapeError::Unexpected {
                        expected: "movies array",
                        found: "nothing",
                    })
                }
            };
            let ignored_series = match map.remove("ignored_series") {
                Some(Value::Array(items)) => items
                    .into_iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect(),
                _ => Vec::new(),
            };
            Ok(MovieList {
                movies: decode_elements(movies),
                ignored_series,
            })
        }
        other => Err(ShapeError::Unexpected {
            expected: "object or array",
            found: kind_of(&other),
        }),
    }
}

/// Result of the detail route.
#[derive(Debug, Clone, PartialEq)]
pub enum DetailResponse {
    Movie(Box<MovieDetail>),
    Error(String),
}

pub fn decode_detail(body: &[u8]) -> Result<DetailResponse, ShapeError> {
    let value = serde_json::from_slice::<Value>(body)?;
    if !value.is_object() {
        return Err(ShapeError::Unexpected {
            expected: "object",
            found: kind_of(&value),
        });
    }
    if let Some(err) = value.get("error").and_then(Value::as_str) {
        return Ok(DetailResponse::Error(err.to_string()));
    }
    let detail: MovieDetail = serde_json::from_value(value)?;
    Ok(DetailResponse::Movie(Box::new(detail)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_sets_are_disjoint_and_cover_all() {
        for s in LIVE_STATUSES {
            assert!(!s.is_terminal(), "{} is both live and terminal", s);
        }
        assert_eq!(LIVE_STATUSES.len() + TERMINAL_STATUSES.len(), 10);
    }

    #[test]
    fn test_status_wire_names() {
        let s: Status = serde_json::from_str("\"moved_manually\"").unwrap();
        assert_eq!(s, Status::MovedManually);
        assert_eq!(serde_json::to_string(&Status::Orphaned).unwrap(), "\"orphaned\"");
        assert!(serde_json::from_str::<Status>("\"rss_new\"").is_err());
    }

    #[test]
    fn test_status_class_mapping() {
        assert_eq!(Status::MovedManually.class(), StatusClass::Moved);
        assert_eq!(Status::Downloading.class(), StatusClass::Pending);
        assert_eq!(Status::Missing.class(), StatusClass::Pending);
        assert_eq!(Status::Missing.label(), "Missing");
        assert_eq!(Status::Copying.class(), StatusClass::Copying);
    }

    #[test]
    fn test_decode_collection_keeps_good_elements() {
        let body = br#"[
            {"hash":"h1","name":"One","status":"moved","progress":1.0},
            {"hash":"h2","name":"Two","status":"bogus","progress":0.25},
            {"name":"no id","status":"new"},
            {"hash":"h3","name":"Three","status":"copying","progress":0.5}
        ]"#;
        let items = decode_collection::<TorrentRecord>(body).unwrap();
        assert_eq!(items.len(), 3);
        assert!(matches!(items[0], Entity::Valid(_)));
        match &items[1] {
            Entity::Malformed(m) => {
                assert_eq!(m.id, "h2");
                assert_eq!(m.title.as_deref(), Some("Two"));
                assert_eq!(m.progress, Some(0.25));
            }
            other => panic!("expected malformed, got {:?}", other),
        }
        assert_eq!(items[2].id(), "h3");
    }

    #[test]
    fn test_decode_collection_rejects_non_array() {
        let err = decode_collection::<TorrentRecord>(br#"{"detail":"boom"}"#).unwrap_err();
        assert!(matches!(
            err,
            ShapeError::Unexpected {
                expected: "array",
                found: "object"
            }
        ));
        assert!(decode_collection::<TorrentRecord>(b"<html>").is_err());
    }

    #[test]
    fn test_movie_list_both_shapes() {
        let wrapped = br#"{"movies":[{"torrent_hash":"a","title":"A","status":"new","year":"N/A"}],
                           "ignored_series":["Show S01"]}"#;
        let list = decode_movie_list(wrapped).unwrap();
        assert_eq!(list.movies.len(), 1);
        assert_eq!(list.ignored_series, vec!["Show S01".to_string()]);
        let year = list.movies[0].valid().and_then(|m| m.year.clone());
        assert_eq!(year, Some(Year::Text("N/A".into())));

        let bare = br#"[{"torrent_hash":"a","title":"A","status":"new","year":1999}]"#;
        let list = decode_movie_list(bare).unwrap();
        assert!(list.ignored_series.is_empty());
        assert_eq!(list.movies[0].valid().unwrap().year, Some(Year::Number(1999)));
    }

    #[test]
    fn test_decode_detail_error_and_live_fields() {
        let err = decode_detail(br#"{"error":"Movie not found"}"#).unwrap();
        assert_eq!(err, DetailResponse::Error("Movie not found".into()));

        let body = br#"{"torrent_hash":"e1","title":"E","status":"downloading",
                        "download_stats":{"progress":42.0,"speed":3.5},
                        "cast":[{"name":"Someone","character":"Lead"}]}"#;
        let DetailResponse::Movie(detail) = decode_detail(body).unwrap() else {
            panic!("expected movie");
        };
        assert_eq!(detail.id(), "e1");
        assert_eq!(detail.cast.len(), 1);
        assert_eq!(
            detail.live_fields(),
            Some(LiveFields {
                percent: 42.0,
                speed: 3.5
            })
        );
    }

    #[test]
    fn test_delete_options_validation() {
        let mut opts = BatchDeleteOptions {
            delete_from_db: false,
            delete_from_destination: false,
            ignore_movie: false,
            watchlist_movie: true,
            watchlist_days: 7,
        };
        assert_eq!(opts.validate(), Err(DeleteOptionsError::WatchlistNeedsDb));
        opts.watchlist_movie = false;
        assert_eq!(opts.validate(), Err(DeleteOptionsError::NothingSelected));
        opts.delete_from_destination = true;
        assert_eq!(opts.validate(), Ok(()));
    }

    #[test]
    fn test_delete_summary() {
        let opts = BatchDeleteOptions {
            delete_from_db: true,
            delete_from_destination: true,
            ..BatchDeleteOptions::default()
        };
        let res = BatchDeleteResult {
            success: true,
            deleted_from_db: 2,
            deleted_from_folder: 1,
            ..Default::default()
        };
        assert_eq!(res.summary(&opts), "2 removed from DB. 1 files deleted.");

        let res = BatchDeleteResult {
            success: true,
            added_to_watchlist: 3,
            ..Default::default()
        };
        assert_eq!(res.summary(&opts), "3 movie(s) added to watchlist for 7 days");
    }

    #[test]
    fn test_rss_countdown_label() {
        let rss = RssStatus {
            has_feeds: true,
            countdown_seconds: 125,
            next_feed_name: Some("YTS".into()),
            next_feed_url: None,
        };
        assert_eq!(rss.countdown_label().as_deref(), Some("Next RSS: YTS in 02:05"));
        let idle = RssStatus {
            has_feeds: false,
            ..rss
        };
        assert_eq!(idle.countdown_label(), None);
    }
}
