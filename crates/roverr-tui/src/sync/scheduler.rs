//! List poll scheduler.
//!
//! [`Cadence`] is the pure state machine (Active/Suspended, fast/slow).
//! [`ListScheduler`] drives it from a tokio task: one tick loop, both list
//! fetches joined per tick, the next tick armed only after both settle.

use std::future::Future;
use std::time::Duration;

use roverr_proto::client::{ApiClient, ApiResult};
use roverr_proto::protocol::{Entity, MovieList, TorrentRecord};
use tokio::sync::{mpsc, watch};
use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

// ── Cadence ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pace {
    Fast,
    Slow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Active,
    Suspended,
}

/// What a focus change did to the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    None,
    Suspended,
    /// Caller owes one immediate out-of-band fetch.
    Resumed,
}

#[derive(Debug, Clone)]
pub struct Cadence {
    fast: Duration,
    slow: Duration,
    pace: Pace,
    state: PollState,
}

impl Cadence {
    pub fn new(fast: Duration, slow: Duration) -> Self {
        Self {
            fast,
            slow,
            pace: Pace::Fast,
            state: PollState::Active,
        }
    }

    pub fn pace(&self) -> Pace {
        self.pace
    }

    pub fn state(&self) -> PollState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == PollState::Active
    }

    /// Time until the next tick.
    pub fn delay(&self) -> Duration {
        match self.pace {
            Pace::Fast => self.fast,
            Pace::Slow => self.slow,
        }
    }

    pub fn set_focus(&mut self, focused: bool) -> Transition {
        match (self.state, focused) {
            (PollState::Active, false) => {
                self.state = PollState::Suspended;
                Transition::Suspended
            }
            (PollState::Suspended, true) => {
                self.state = PollState::Active;
                Transition::Resumed
            }
            _ => Transition::None,
        }
    }

    /// Recompute the pace from a successful torrents fetch.
    pub fn observe_torrents(&mut self, torrents: &[Entity<TorrentRecord>]) {
        self.pace = if needs_fast_cadence(torrents) {
            Pace::Fast
        } else {
            Pace::Slow
        };
    }
}

/// Any transfer running, or anything short of fully downloaded.
///
/// A malformed record counts as unfinished unless its raw progress says
/// otherwise.
pub fn needs_fast_cadence(torrents: &[Entity<TorrentRecord>]) -> bool {
    torrents.iter().any(|entity| match entity {
        Entity::Valid(t) => t.status.is_in_progress() || t.progress < 1.0,
        Entity::Malformed(bad) => bad.progress.map_or(true, |p| p < 1.0),
    })
}

// ── Driver ────────────────────────────────────────────────────────────────────

/// Where list data comes from.
pub trait ListSource: Send + Sync + 'static {
    fn torrents(&self) -> impl Future<Output = ApiResult<Vec<Entity<TorrentRecord>>>> + Send;
    fn movies(&self) -> impl Future<Output = ApiResult<MovieList>> + Send;
}

impl ListSource for ApiClient {
    async fn torrents(&self) -> ApiResult<Vec<Entity<TorrentRecord>>> {
        self.list_torrents().await
    }

    async fn movies(&self) -> ApiResult<MovieList> {
        self.list_movies().await
    }
}

#[derive(Debug)]
pub enum ListPollEvent {
    Torrents(ApiResult<Vec<Entity<TorrentRecord>>>),
    Movies(ApiResult<MovieList>),
    Cadence { pace: Pace, state: PollState },
}

pub struct ListScheduler<S> {
    source: S,
    cadence: Cadence,
    focus: watch::Receiver<bool>,
    refresh: mpsc::Receiver<()>,
    events: mpsc::Sender<ListPollEvent>,
    cancel: CancellationToken,
}

impl<S: ListSource> ListScheduler<S> {
    pub fn new(
        source: S,
        cadence: Cadence,
        focus: watch::Receiver<bool>,
        refresh: mpsc::Receiver<()>,
        events: mpsc::Sender<ListPollEvent>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            source,
            cadence,
            focus,
            refresh,
            events,
            cancel,
        }
    }

    /// Run until cancelled or until the event receiver goes away.
    pub async fn run(mut self) {
        let focused = *self.focus.borrow_and_update();
        self.cadence.set_focus(focused);
        info!(
            "[poll] list scheduler started ({:?}, {:?})",
            self.cadence.state(),
            self.cadence.delay()
        );

        if self.cadence.is_active() && !self.poll_once().await {
            return;
        }
        let mut next_tick = Instant::now() + self.cadence.delay();

        loop {
            tokio::select! {
                biased;

                _ = self.cancel.cancelled() => break,

                changed = self.focus.changed() => {
                    if changed.is_err() {
                        debug!("[poll] focus sender dropped");
                        break;
                    }
                    let focused = *self.focus.borrow_and_update();
                    match self.cadence.set_focus(focused) {
                        Transition::Resumed => {
                            debug!("[poll] resumed, fetching now");
                            if !self.poll_once().await {
                                break;
                            }
                            next_tick = Instant::now() + self.cadence.delay();
                        }
                        Transition::Suspended => {
                            debug!("[poll] suspended");
                            if !self.report_cadence().await {
                                break;
                            }
                        }
                        Transition::None => {}
                    }
                }

                Some(()) = self.refresh.recv() => {
                    // The resume fetch covers anything asked for while suspended.
                    if !self.cadence.is_active() {
                        debug!("[poll] refresh dropped while suspended");
                        continue;
                    }
                    if !self.poll_once().await {
                        break;
                    }
                    next_tick = Instant::now() + self.cadence.delay();
                }

                _ = sleep_until(next_tick) => {
                    // Suspended ticks are dropped; the timer keeps running.
                    if self.cadence.is_active() && !self.poll_once().await {
                        break;
                    }
                    next_tick = Instant::now() + self.cadence.delay();
                }
            }
        }
        info!("[poll] list scheduler stopped");
    }

    /// One fetch of both lists. Returns `false` once nobody is listening.
    async fn poll_once(&mut self) -> bool {
        let (torrents, movies) = tokio::join!(self.source.torrents(), self.source.movies());

        match &torrents {
            Ok(list) => self.cadence.observe_torrents(list),
            Err(e) => warn!("[poll] torrents fetch failed: {}", e),
        }
        if let Err(e) = &movies {
            warn!("[poll] movies fetch failed: {}", e);
        }

        self.events.send(ListPollEvent::Torrents(torrents)).await.is_ok()
            && self.events.send(ListPollEvent::Movies(movies)).await.is_ok()
            && self.report_cadence().await
    }

    async fn report_cadence(&self) -> bool {
        self.events
            .send(ListPollEvent::Cadence {
                pace: self.cadence.pace(),
                state: self.cadence.state(),
            })
            .await
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use roverr_proto::client::ApiError;
    use roverr_proto::protocol::{MalformedEntity, ShapeError, Status};

    const FAST: Duration = Duration::from_millis(2000);
    const SLOW: Duration = Duration::from_millis(10000);

    fn torrent(hash: &str, status: Status, progress: f64) -> Entity<TorrentRecord> {
        Entity::Valid(TorrentRecord {
            hash: hash.into(),
            name: hash.into(),
            size: 0,
            progress,
            ratio: 0.0,
            added_on: 0,
            completion_on: 0,
            status,
            state: String::new(),
            copy_progress: None,
            message: None,
            content_path: None,
            tags: None,
            category: None,
        })
    }

    #[test]
    fn test_interval_follows_activity() {
        let mut c = Cadence::new(FAST, SLOW);
        c.observe_torrents(&[torrent("a", Status::Copying, 1.0), torrent("b", Status::Moved, 1.0)]);
        assert_eq!(c.delay(), FAST);

        c.observe_torrents(&[torrent("b", Status::Moved, 1.0)]);
        assert_eq!(c.delay(), SLOW);

        c.observe_torrents(&[torrent("c", Status::New, 0.3)]);
        assert_eq!(c.pace(), Pace::Fast);

        c.observe_torrents(&[]);
        assert_eq!(c.pace(), Pace::Slow);
    }

    fn malformed(hash: &str, progress: Option<f64>) -> Entity<TorrentRecord> {
        Entity::Malformed(MalformedEntity {
            id: hash.into(),
            title: None,
            progress,
            reason: "missing field `status`".into(),
        })
    }

    #[test]
    fn test_malformed_torrent_keeps_fast_pace_until_known_done() {
        let done = torrent("b", Status::Moved, 1.0);
        assert!(needs_fast_cadence(&[done.clone(), malformed("m", Some(0.4))]));
        assert!(needs_fast_cadence(&[done.clone(), malformed("m", None)]));
        assert!(!needs_fast_cadence(&[done, malformed("m", Some(1.0))]));
    }

    #[test]
    fn test_focus_transitions() {
        let mut c = Cadence::new(FAST, SLOW);
        assert_eq!(c.set_focus(true), Transition::None);
        assert_eq!(c.set_focus(false), Transition::Suspended);
        assert_eq!(c.set_focus(false), Transition::None);
        assert!(!c.is_active());
        assert_eq!(c.set_focus(true), Transition::Resumed);
        assert!(c.is_active());
    }

    /// Serves scripted torrent lists; the last one repeats.
    #[derive(Clone)]
    struct Scripted {
        torrents: Arc<Mutex<Vec<Vec<Entity<TorrentRecord>>>>>,
        calls: Arc<AtomicUsize>,
        fail: Option<fn() -> ApiError>,
    }

    impl Scripted {
        fn new(script: Vec<Vec<Entity<TorrentRecord>>>) -> Self {
            Self {
                torrents: Arc::new(Mutex::new(script)),
                calls: Arc::new(AtomicUsize::new(0)),
                fail: None,
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl ListSource for Scripted {
        async fn torrents(&self) -> ApiResult<Vec<Entity<TorrentRecord>>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(fail) = self.fail {
                return Err(fail());
            }
            let mut script = self.torrents.lock().unwrap();
            if script.len() > 1 {
                Ok(script.remove(0))
            } else {
                Ok(script.first().cloned().unwrap_or_default())
            }
        }

        async fn movies(&self) -> ApiResult<MovieList> {
            Ok(MovieList::default())
        }
    }

    struct Harness {
        focus: watch::Sender<bool>,
        refresh: mpsc::Sender<()>,
        events: mpsc::Receiver<ListPollEvent>,
        cancel: CancellationToken,
        task: tokio::task::JoinHandle<()>,
    }

    fn spawn(source: Scripted, focused: bool) -> Harness {
        let (focus, focus_rx) = watch::channel(focused);
        let (refresh, refresh_rx) = mpsc::channel(4);
        let (events_tx, events) = mpsc::channel(256);
        let cancel = CancellationToken::new();
        let scheduler = ListScheduler::new(
            source,
            Cadence::new(FAST, SLOW),
            focus_rx,
            refresh_rx,
            events_tx,
            cancel.clone(),
        );
        let task = tokio::spawn(scheduler.run());
        Harness {
            focus,
            refresh,
            events,
            cancel,
            task,
        }
    }

    async fn at(ms: u64, start: Instant) {
        sleep_until(start + Duration::from_millis(ms)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetches_immediately_then_on_cadence() {
        let source = Scripted::new(vec![vec![torrent("a", Status::Copying, 1.0)]]);
        let start = Instant::now();
        let h = spawn(source.clone(), true);

        at(10, start).await;
        assert_eq!(source.calls(), 1);
        at(1990, start).await;
        assert_eq!(source.calls(), 1);
        at(2010, start).await;
        assert_eq!(source.calls(), 2);
        at(4010, start).await;
        assert_eq!(source.calls(), 3);
        h.cancel.cancel();
    }

    #[tokio::test(start_paused = true)]
    async fn test_copying_record_then_idle_switches_to_slow() {
        let source = Scripted::new(vec![
            vec![torrent("a", Status::Copying, 1.0)],
            vec![torrent("b", Status::Moved, 1.0)],
        ]);
        let start = Instant::now();
        let mut h = spawn(source.clone(), true);

        // t=0 fast, t=2000 observes idle -> slow, next at t=12000.
        at(2010, start).await;
        assert_eq!(source.calls(), 2);
        at(11990, start).await;
        assert_eq!(source.calls(), 2);
        at(12010, start).await;
        assert_eq!(source.calls(), 3);

        let mut paces = Vec::new();
        while let Ok(ev) = h.events.try_recv() {
            if let ListPollEvent::Cadence { pace, .. } = ev {
                paces.push(pace);
            }
        }
        assert_eq!(paces, vec![Pace::Fast, Pace::Slow, Pace::Slow]);
        h.cancel.cancel();
    }

    #[tokio::test(start_paused = true)]
    async fn test_suspension_skips_ticks_and_resume_fetches_once() {
        let source = Scripted::new(vec![vec![torrent("a", Status::Downloading, 0.5)]]);
        let start = Instant::now();
        let h = spawn(source.clone(), true);

        at(1000, start).await;
        assert_eq!(source.calls(), 1);
        h.focus.send(false).unwrap();

        // The t=2000 tick passes with no fetch, and so does any later one.
        at(2500, start).await;
        assert_eq!(source.calls(), 1);
        at(9000, start).await;
        assert_eq!(source.calls(), 1);

        h.focus.send(true).unwrap();
        at(9010, start).await;
        assert_eq!(source.calls(), 2);

        // Normal cadence resumes from the out-of-band fetch.
        at(10990, start).await;
        assert_eq!(source.calls(), 2);
        at(11010, start).await;
        assert_eq!(source.calls(), 3);
        h.cancel.cancel();
    }

    #[tokio::test(start_paused = true)]
    async fn test_starting_unfocused_waits_for_focus() {
        let source = Scripted::new(vec![vec![]]);
        let start = Instant::now();
        let h = spawn(source.clone(), false);

        at(30000, start).await;
        assert_eq!(source.calls(), 0);
        h.focus.send(true).unwrap();
        at(30010, start).await;
        assert_eq!(source.calls(), 1);
        h.cancel.cancel();
    }

    #[tokio::test(start_paused = true)]
    async fn test_failures_keep_cadence_and_refresh_is_out_of_band() {
        let mut source = Scripted::new(vec![vec![torrent("a", Status::Copying, 1.0)]]);
        source.fail = Some(backend_down);
        let start = Instant::now();
        let mut h = spawn(source.clone(), true);

        at(2010, start).await;
        assert_eq!(source.calls(), 2);

        h.refresh.send(()).await.unwrap();
        at(2500, start).await;
        assert_eq!(source.calls(), 3);
        // The t=4000 tick was re-armed to t=4010 by the refresh.
        at(4000, start).await;
        assert_eq!(source.calls(), 3);
        at(4020, start).await;
        assert_eq!(source.calls(), 4);

        let first = h.events.try_recv().unwrap();
        assert!(matches!(first, ListPollEvent::Torrents(Err(_))));
        h.cancel.cancel();
    }

    fn backend_down() -> ApiError {
        ApiError::Application("backend down".into())
    }

    fn unreadable_body() -> ApiError {
        ApiError::Decode {
            route: "/torrents".into(),
            source: ShapeError::Unexpected {
                expected: "array",
                found: "object",
            },
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_unreadable_body_retries_at_constant_cadence() {
        let mut source = Scripted::new(vec![vec![torrent("a", Status::Copying, 1.0)]]);
        source.fail = Some(unreadable_body);
        let start = Instant::now();
        let mut h = spawn(source.clone(), true);

        // Starts fast and no failure ever moves it.
        at(10, start).await;
        assert_eq!(source.calls(), 1);
        at(2010, start).await;
        assert_eq!(source.calls(), 2);
        at(4010, start).await;
        assert_eq!(source.calls(), 3);
        at(6010, start).await;
        assert_eq!(source.calls(), 4);

        let mut failures = 0;
        while let Ok(ev) = h.events.try_recv() {
            match ev {
                ListPollEvent::Torrents(Err(ApiError::Decode { .. })) => failures += 1,
                ListPollEvent::Cadence { pace, .. } => assert_eq!(pace, Pace::Fast),
                _ => {}
            }
        }
        assert_eq!(failures, 4);
        h.cancel.cancel();
    }

    #[tokio::test(start_paused = true)]
    async fn test_refresh_while_suspended_waits_for_resume() {
        let source = Scripted::new(vec![vec![torrent("a", Status::Downloading, 0.5)]]);
        let start = Instant::now();
        let h = spawn(source.clone(), true);

        at(100, start).await;
        assert_eq!(source.calls(), 1);
        h.focus.send(false).unwrap();
        at(200, start).await;

        h.refresh.send(()).await.unwrap();
        at(1000, start).await;
        assert_eq!(source.calls(), 1);
        at(5000, start).await;
        assert_eq!(source.calls(), 1);

        // Resuming fetches exactly once; the dropped refresh is not replayed.
        h.focus.send(true).unwrap();
        at(5010, start).await;
        assert_eq!(source.calls(), 2);
        at(6990, start).await;
        assert_eq!(source.calls(), 2);
        h.cancel.cancel();
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_the_loop() {
        let source = Scripted::new(vec![vec![torrent("a", Status::Copying, 1.0)]]);
        let start = Instant::now();
        let h = spawn(source.clone(), true);

        at(100, start).await;
        h.cancel.cancel();
        h.task.await.unwrap();
        at(20000, start).await;
        assert_eq!(source.calls(), 1);
    }
}
