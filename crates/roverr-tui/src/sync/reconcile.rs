//! Turning freshly fetched collections into on-screen representations.
//!
//! Two strategies live here:
//! - [`KeyedReconciler`] keeps one view per id alive across polls and patches
//!   only the tracked fields that changed (movie grid).
//! - [`FullRebuild`] throws the rows away and regenerates them from a sorted
//!   collection every cycle (torrent table).

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use roverr_proto::protocol::{Entity, MovieRecord, Status, TorrentRecord};
use tracing::warn;

// ── Tracked fields ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageRef {
    Poster(String),
    Placeholder,
}

/// The subset of a record a card displays.
#[derive(Debug, Clone)]
pub struct CardFields {
    pub title: String,
    pub image: ImageRef,
    /// `None` renders as an "unknown" badge.
    pub status: Option<Status>,
    /// Fraction 0..=1.
    pub progress: f64,
}

impl CardFields {
    pub fn from_movie(entity: &Entity<MovieRecord>) -> Self {
        match entity {
            Entity::Valid(m) => Self {
                title: m.title.clone(),
                image: m
                    .poster_url
                    .as_deref()
                    .filter(|u| !u.is_empty())
                    .map_or(ImageRef::Placeholder, |u| ImageRef::Poster(u.to_string())),
                status: Some(m.status),
                progress: m.progress,
            },
            Entity::Malformed(bad) => Self {
                title: bad.title.clone().unwrap_or_else(|| short_id(&bad.id)),
                image: ImageRef::Placeholder,
                status: None,
                progress: 0.0,
            },
        }
    }

    fn diff(&self, next: &CardFields) -> Vec<FieldPatch> {
        let mut patches = Vec::new();
        if self.title != next.title {
            patches.push(FieldPatch::Title(next.title.clone()));
        }
        if self.image != next.image {
            patches.push(FieldPatch::Image(next.image.clone()));
        }
        if self.status != next.status {
            patches.push(FieldPatch::Status(next.status));
        }
        // Bitwise so a NaN progress still compares equal to itself.
        if self.progress.to_bits() != next.progress.to_bits() {
            patches.push(FieldPatch::Progress(next.progress));
        }
        patches
    }
}

pub fn short_id(id: &str) -> String {
    id.chars().take(8).collect()
}

/// One field write against an existing view.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldPatch {
    Title(String),
    Image(ImageRef),
    Status(Option<Status>),
    Progress(f64),
}

/// A retained visual node for one entity.
pub trait CardView {
    fn build(id: &str, fields: &CardFields) -> Self;
    fn patch(&mut self, patch: &FieldPatch);
}

// ── Keyed incremental ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconcileReport {
    pub created: Vec<String>,
    pub updated: Vec<String>,
    pub removed: Vec<String>,
    /// Field writes applied to surviving views.
    pub patches: usize,
}

impl ReconcileReport {
    pub fn is_noop(&self) -> bool {
        self.created.is_empty() && self.removed.is_empty() && self.patches == 0
    }
}

struct Entry<V> {
    fields: CardFields,
    view: V,
}

pub struct KeyedReconciler<V> {
    entries: HashMap<String, Entry<V>>,
    /// Visible order. New ids are appended; survivors keep their slot.
    order: Vec<String>,
}

impl<V> Default for KeyedReconciler<V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            order: Vec::new(),
        }
    }
}

impl<V: CardView> KeyedReconciler<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&V> {
        self.entries.get(id).map(|e| &e.view)
    }

    pub fn ids(&self) -> &[String] {
        &self.order
    }

    /// Views in visible order.
    pub fn views(&self) -> impl Iterator<Item = (&str, &V)> {
        self.order
            .iter()
            .filter_map(|id| self.entries.get(id).map(|e| (id.as_str(), &e.view)))
    }

    /// Bring the cache in line with `items`, the full latest collection.
    pub fn reconcile(&mut self, items: &[(String, CardFields)]) -> ReconcileReport {
        let mut report = ReconcileReport::default();
        let mut seen: HashSet<&str> = HashSet::with_capacity(items.len());

        for (id, fields) in items {
            if !seen.insert(id.as_str()) {
                warn!("[reconcile] duplicate id {} in collection, keeping first", id);
                continue;
            }
            match self.entries.get_mut(id) {
                Some(entry) => {
                    let patches = entry.fields.diff(fields);
                    for p in &patches {
                        entry.view.patch(p);
                    }
                    report.patches += patches.len();
                    if !patches.is_empty() {
                        entry.fields = fields.clone();
                    }
                    report.updated.push(id.clone());
                }
                None => {
                    let view = V::build(id, fields);
                    self.entries.insert(
                        id.clone(),
                        Entry {
                            fields: fields.clone(),
                            view,
                        },
                    );
                    self.order.push(id.clone());
                    report.created.push(id.clone());
                }
            }
        }

        let entries = &mut self.entries;
        self.order.retain(|id| {
            if seen.contains(id.as_str()) {
                true
            } else {
                entries.remove(id);
                report.removed.push(id.clone());
                false
            }
        });

        report
    }
}

// ── Full rebuild ──────────────────────────────────────────────────────────────

/// Rows regenerated wholesale on every fetch.
#[derive(Debug, Clone)]
pub struct FullRebuild<R> {
    rows: Vec<R>,
    generation: u64,
}

impl<R> Default for FullRebuild<R> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            generation: 0,
        }
    }
}

impl<R> FullRebuild<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rebuild(&mut self, rows: impl IntoIterator<Item = R>) {
        self.rows = rows.into_iter().collect();
        self.generation += 1;
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    /// Number of rebuilds so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

// ── Sorting ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Name,
    Size,
    Progress,
    Status,
    Ratio,
    AddedOn,
    CompletionOn,
}

impl SortField {
    pub const ALL: [SortField; 7] = [
        SortField::Name,
        SortField::Size,
        SortField::Progress,
        SortField::Status,
        SortField::Ratio,
        SortField::AddedOn,
        SortField::CompletionOn,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Size => "size",
            Self::Progress => "progress",
            Self::Status => "status",
            Self::Ratio => "ratio",
            Self::AddedOn => "added_on",
            Self::CompletionOn => "completion_on",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == s)
    }

    pub fn next(self) -> Self {
        let i = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            Self::Asc => "▲",
            Self::Desc => "▼",
        }
    }

    fn flipped(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            field: SortField::CompletionOn,
            direction: SortDirection::Desc,
        }
    }
}

enum SortKey {
    Num(f64),
    Text(String),
}

impl SortKey {
    fn cmp(&self, other: &SortKey) -> Ordering {
        match (self, other) {
            (Self::Num(a), Self::Num(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

impl SortSpec {
    pub fn from_names(field: &str, direction: &str) -> Self {
        let default = Self::default();
        Self {
            field: SortField::parse(field).unwrap_or(default.field),
            direction: SortDirection::parse(direction).unwrap_or(default.direction),
        }
    }

    /// Choosing the active field flips direction; a new field starts descending.
    pub fn toggle(&mut self, field: SortField) {
        if self.field == field {
            self.direction = self.direction.flipped();
        } else {
            self.field = field;
            self.direction = SortDirection::Desc;
        }
    }

    fn key(&self, entity: &Entity<TorrentRecord>) -> SortKey {
        let Entity::Valid(t) = entity else {
            return match self.field {
                SortField::Name | SortField::Status => SortKey::Text(String::new()),
                _ => SortKey::Num(0.0),
            };
        };
        match self.field {
            SortField::Name => SortKey::Text(t.name.to_lowercase()),
            SortField::Status => SortKey::Text(t.status.as_str().to_string()),
            SortField::Size => SortKey::Num(t.size as f64),
            SortField::Progress => SortKey::Num(t.progress),
            SortField::Ratio => SortKey::Num(t.ratio),
            SortField::AddedOn => SortKey::Num(t.added_on as f64),
            SortField::CompletionOn => SortKey::Num(t.completion_on as f64),
        }
    }

    /// Stable sort; ties keep fetch order in both directions.
    pub fn sorted<'a>(&self, items: &'a [Entity<TorrentRecord>]) -> Vec<&'a Entity<TorrentRecord>> {
        let mut keyed: Vec<(SortKey, &Entity<TorrentRecord>)> =
            items.iter().map(|e| (self.key(e), e)).collect();
        keyed.sort_by(|(a, _), (b, _)| match self.direction {
            SortDirection::Asc => a.cmp(b),
            SortDirection::Desc => b.cmp(a),
        });
        keyed.into_iter().map(|(_, e)| e).collect()
    }
}
