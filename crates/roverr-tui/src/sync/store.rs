//! Store: single owner of the latest known server state and the current view.
//!
//! Every write swaps a whole slice in one synchronous step and then notifies
//! that slice's subscribers in registration order. A subscriber that fails or
//! panics is logged and skipped; it never stops the others or the writer.

use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};

use roverr_proto::protocol::{
    Entity, LiveFields, MovieDetail, MovieList, MovieRecord, RssStatus, SettingsRecord,
    TorrentRecord,
};
use tracing::{debug, error};

use super::selection::SelectionSet;

/// Which screen is showing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Dashboard,
    Settings,
    MovieDetail(String),
}

impl View {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Settings => "settings",
            Self::MovieDetail(_) => "movie",
        }
    }

    pub fn detail_id(&self) -> Option<&str> {
        match self {
            Self::MovieDetail(id) => Some(id),
            _ => None,
        }
    }
}

/// Names of the notifications a subscriber can register for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreEvent {
    Torrents,
    Movies,
    Settings,
    Detail,
    DetailLive,
    Rss,
    View,
    Selection,
}

/// A whole replacement value for one slice.
#[derive(Debug, Clone)]
pub enum Slice {
    Torrents(Vec<Entity<TorrentRecord>>),
    Movies(MovieList),
    Settings(SettingsRecord),
    /// `None` clears the detail record (e.g. when leaving the detail view).
    Detail(Option<MovieDetail>),
    /// Live transfer figures for the displayed detail record.
    DetailLive(Option<LiveFields>),
    Rss(RssStatus),
    View(View),
}

impl Slice {
    fn event(&self) -> StoreEvent {
        match self {
            Self::Torrents(_) => StoreEvent::Torrents,
            Self::Movies(_) => StoreEvent::Movies,
            Self::Settings(_) => StoreEvent::Settings,
            Self::Detail(_) => StoreEvent::Detail,
            Self::DetailLive(_) => StoreEvent::DetailLive,
            Self::Rss(_) => StoreEvent::Rss,
            Self::View(_) => StoreEvent::View,
        }
    }
}

#[derive(Debug, Default)]
pub struct StoreData {
    pub torrents: Vec<Entity<TorrentRecord>>,
    pub movies: Vec<Entity<MovieRecord>>,
    pub ignored_series: Vec<String>,
    pub settings: Option<SettingsRecord>,
    pub detail: Option<MovieDetail>,
    pub detail_live: Option<LiveFields>,
    pub rss: Option<RssStatus>,
    pub selection: SelectionSet,
    pub view: View,
    /// Bumped on every write.
    pub revision: u64,
}

impl StoreData {
    pub fn movie(&self, id: &str) -> Option<&Entity<MovieRecord>> {
        self.movies.iter().find(|m| m.id() == id)
    }
}

type Subscriber = Box<dyn FnMut(&StoreData) -> anyhow::Result<()>>;

#[derive(Default)]
pub struct Store {
    data: StoreData,
    subscribers: HashMap<StoreEvent, Vec<(usize, Subscriber)>>,
    next_id: usize,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn data(&self) -> &StoreData {
        &self.data
    }

    pub fn view(&self) -> &View {
        &self.data.view
    }

    /// Register `callback` for `event`. Returns a handle for [`Store::unsubscribe`].
    pub fn subscribe(
        &mut self,
        event: StoreEvent,
        callback: impl FnMut(&StoreData) -> anyhow::Result<()> + 'static,
    ) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        self.subscribers
            .entry(event)
            .or_default()
            .push((id, Box::new(callback)));
        id
    }

    pub fn unsubscribe(&mut self, event: StoreEvent, handle: usize) {
        if let Some(list) = self.subscribers.get_mut(&event) {
            list.retain(|(id, _)| *id != handle);
        }
    }

    /// Swap one slice and notify its subscribers.
    pub fn replace(&mut self, slice: Slice) {
        let event = slice.event();
        match slice {
            Slice::Torrents(t) => self.data.torrents = t,
            Slice::Movies(list) => {
                self.data.movies = list.movies;
                self.data.ignored_series = list.ignored_series;
            }
            Slice::Settings(s) => self.data.settings = Some(s),
            Slice::Detail(d) => {
                self.data.detail_live = d.as_ref().and_then(MovieDetail::live_fields);
                self.data.detail = d;
            }
            Slice::DetailLive(live) => self.data.detail_live = live,
            Slice::Rss(r) => self.data.rss = Some(r),
            Slice::View(v) => self.data.view = v,
        }
        self.data.revision += 1;
        self.emit(event);
    }

    /// Navigate. Leaving a view drops the selection that belonged to it.
    /// Returns `false` when `view` is already current.
    pub fn set_view(&mut self, view: View) -> bool {
        if self.data.view == view {
            return false;
        }
        let had_selection = !self.data.selection.is_empty();
        self.data.selection.clear();
        self.replace(Slice::View(view));
        if had_selection {
            self.emit(StoreEvent::Selection);
        }
        true
    }

    /// Apply one selection operation and notify selection subscribers.
    pub fn update_selection<R>(&mut self, op: impl FnOnce(&mut SelectionSet) -> R) -> R {
        let out = op(&mut self.data.selection);
        self.data.revision += 1;
        self.emit(StoreEvent::Selection);
        out
    }

    fn emit(&mut self, event: StoreEvent) {
        let Some(list) = self.subscribers.get_mut(&event) else {
            return;
        };
        debug!("[store] {:?} -> {} subscriber(s)", event, list.len());
        let data = &self.data;
        for (id, callback) in list.iter_mut() {
            match catch_unwind(AssertUnwindSafe(|| callback(data))) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => error!("[store] subscriber {} for {:?} failed: {:#}", id, event, e),
                Err(_) => error!("[store] subscriber {} for {:?} panicked", id, event),
            }
        }
    }
}
