//! App: component-based event loop.
//!
//! Architecture:
//! - `App` owns the `Store`, every component and the polling health shown in
//!   the header.
//! - Components that mirror server data are subscribed to the store and
//!   rebuild or patch themselves when their slice is replaced.
//! - Background work (list scheduler, detail poller, one-shot requests) runs
//!   on tokio tasks and reports back over channels; only this loop writes the
//!   store.
//! - Components return `Vec<Action>`; `dispatch` carries them out.

use std::cell::RefCell;
use std::future::Future;
use std::io;
use std::rc::Rc;
use std::time::{Duration, Instant};

use ratatui::crossterm::{
    event::{
        self, DisableFocusChange, EnableFocusChange, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use tokio::sync::{mpsc, watch};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use roverr_proto::client::{ApiClient, ApiError, ApiResult};
use roverr_proto::config::Config;
use roverr_proto::protocol::{
    ActionResult, BatchCopyResult, BatchDeleteOptions, BatchDeleteResult, MovieDetail,
    MoveResult, RssStatus, SettingsRecord, TriggerResult,
};

use crate::{
    action::{Action, ComponentId},
    app_state::{AppState, SyncStatus},
    component::Component,
    components::{
        delete_dialog::DeleteDialog, header, help_overlay::HelpOverlay,
        identify_prompt::IdentifyPrompt, movie_detail::MovieDetailView, movie_grid::MovieGrid, settings_view::SettingsView,
        torrent_table::TorrentTable,
    },
    sync::detail::{DetailEvent, DetailPoller, EntityPoller},
    sync::reconcile::SortSpec,
    sync::scheduler::{Cadence, ListPollEvent, ListScheduler},
    sync::store::{Slice, Store, StoreEvent, View},
    widgets::{
        status_bar,
        toast::{Severity, ToastManager},
    },
};

/// Delay before re-reading a detail whose move was just accepted.
const MOVE_RELOAD_DELAY: Duration = Duration::from_millis(500);

// ── Internal event bus ────────────────────────────────────────────────────────

enum AppMessage {
    Event(Event),
    /// One-shot detail fetch for the detail view (open, reload).
    DetailLoaded {
        id: String,
        result: ApiResult<MovieDetail>,
    },
    Rss(ApiResult<RssStatus>),
    Settings(ApiResult<SettingsRecord>),
    Done(Outcome),
}

/// Result of a user-initiated backend request.
enum Outcome {
    BulkCopy(ApiResult<BatchCopyResult>),
    Delete {
        options: BatchDeleteOptions,
        result: ApiResult<BatchDeleteResult>,
    },
    Move {
        id: String,
        result: ApiResult<MoveResult>,
    },
    StopCopy {
        id: String,
        result: ApiResult<ActionResult>,
    },
    MarkMoved {
        id: String,
        result: ApiResult<ActionResult>,
    },
    Identify {
        id: String,
        result: ApiResult<ActionResult>,
    },
    Trigger(ApiResult<TriggerResult>),
    FetchRss(ApiResult<ActionResult>),
    SaveSettings {
        record: SettingsRecord,
        result: ApiResult<ActionResult>,
    },
}

/// Backend message when it sent one, otherwise `fallback`.
fn failure_text(err: &ApiError, fallback: &str) -> String {
    match err {
        ApiError::Application(msg) if !msg.is_empty() => msg.clone(),
        _ => fallback.to_string(),
    }
}

// ── App ───────────────────────────────────────────────────────────────────────

pub struct App {
    config: Config,
    client: ApiClient,

    // ── Shared state ──────────────────────────────────────────────────────────
    store: Store,
    sync: SyncStatus,

    // ── Components ────────────────────────────────────────────────────────────
    torrent_table: Rc<RefCell<TorrentTable>>,
    movie_grid: Rc<RefCell<MovieGrid>>,
    movie_detail: Rc<RefCell<MovieDetailView>>,
    settings_view: Rc<RefCell<SettingsView>>,
    delete_dialog: DeleteDialog,
    identify_prompt: IdentifyPrompt,
    help_overlay: HelpOverlay,
    toast: ToastManager,
    /// Which dashboard pane takes keys.
    dashboard_focus: ComponentId,
    /// Detail last opened, for the `3` key.
    last_detail: Option<String>,

    // ── Background plumbing ───────────────────────────────────────────────────
    cancel: CancellationToken,
    focus_tx: watch::Sender<bool>,
    focus_rx: watch::Receiver<bool>,
    view_rx: watch::Receiver<View>,
    tx: Option<mpsc::Sender<AppMessage>>,
    refresh_tx: Option<mpsc::Sender<()>>,
    detail_tx: Option<mpsc::Sender<DetailEvent>>,
    detail_cancel: Option<CancellationToken>,
    rss_in_flight: bool,

    /// Whether to quit on next iteration.
    should_quit: bool,
}

impl App {
    pub fn new(config: Config, client: ApiClient) -> Self {
        let sort = SortSpec::from_names(
            &config.ui.default_sort_field,
            &config.ui.default_sort_direction,
        );
        let torrent_table = Rc::new(RefCell::new(TorrentTable::new(sort)));
        let movie_grid = Rc::new(RefCell::new(MovieGrid::new()));
        let movie_detail = Rc::new(RefCell::new(MovieDetailView::new()));
        let settings_view = Rc::new(RefCell::new(SettingsView::new()));

        let (focus_tx, focus_rx) = watch::channel(true);
        let (view_tx, view_rx) = watch::channel(View::default());

        let mut store = Store::new();
        {
            let table = Rc::clone(&torrent_table);
            store.subscribe(StoreEvent::Torrents, move |data| {
                table.try_borrow_mut()?.rebuild(data);
                Ok(())
            });
        }
        {
            let grid = Rc::clone(&movie_grid);
            store.subscribe(StoreEvent::Movies, move |data| {
                grid.try_borrow_mut()?.sync(data);
                Ok(())
            });
        }
        {
            let detail = Rc::clone(&movie_detail);
            store.subscribe(StoreEvent::Detail, move |data| {
                detail.try_borrow_mut()?.rerender(data.detail.as_ref());
                Ok(())
            });
        }
        {
            let detail = Rc::clone(&movie_detail);
            store.subscribe(StoreEvent::DetailLive, move |data| {
                detail.try_borrow_mut()?.patch(data.detail_live);
                Ok(())
            });
        }
        {
            let settings = Rc::clone(&settings_view);
            store.subscribe(StoreEvent::Settings, move |data| {
                if let Some(record) = &data.settings {
                    settings.try_borrow_mut()?.rebuild(record);
                }
                Ok(())
            });
        }
        store.subscribe(StoreEvent::View, move |data| {
            view_tx.send_replace(data.view.clone());
            Ok(())
        });

        let sync = SyncStatus::new(
            client.base_url(),
            config.polling.fast(),
            config.polling.slow(),
        );
        let toast = ToastManager::new(Duration::from_millis(config.ui.toast_ms));

        Self {
            config,
            client,
            store,
            sync,
            torrent_table,
            movie_grid,
            movie_detail,
            settings_view,
            delete_dialog: DeleteDialog::new(),
            identify_prompt: IdentifyPrompt::new(),
            help_overlay: HelpOverlay::new(),
            toast,
            dashboard_focus: ComponentId::MovieGrid,
            last_detail: None,
            cancel: CancellationToken::new(),
            focus_tx,
            focus_rx,
            view_rx,
            tx: None,
            refresh_tx: None,
            detail_tx: None,
            detail_cancel: None,
            rss_in_flight: false,
            should_quit: false,
        }
    }

    // ── Main run loop ─────────────────────────────────────────────────────────

    pub async fn run(mut self) -> anyhow::Result<()> {
        debug!("run(): enabling raw mode");
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableFocusChange)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        debug!("run(): terminal created, size={:?}", terminal.size());

        let result = self.event_loop(&mut terminal).await;

        // ── Teardown ──────────────────────────────────────────────────────────
        self.cancel.cancel();
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableFocusChange
        )?;
        terminal.show_cursor()?;
        result
    }

    async fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        let (tx, mut rx) = mpsc::channel::<AppMessage>(1024);
        let (list_tx, mut list_rx) = mpsc::channel::<ListPollEvent>(64);
        let (detail_tx, mut detail_rx) = mpsc::channel::<DetailEvent>(64);
        // One queued refresh is enough; extra presses coalesce.
        let (refresh_tx, refresh_rx) = mpsc::channel::<()>(1);
        self.tx = Some(tx.clone());
        self.refresh_tx = Some(refresh_tx);
        self.detail_tx = Some(detail_tx);

        info!("roverr started, backend {}", self.client.base_url());

        // ── Background task: terminal events ──────────────────────────────────
        let event_tx = tx.clone();
        tokio::task::spawn_blocking(move || loop {
            match event::read() {
                Ok(ev) => {
                    if event_tx.blocking_send(AppMessage::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        });

        // ── Background task: list scheduler ───────────────────────────────────
        let scheduler = ListScheduler::new(
            self.client.clone(),
            Cadence::new(self.config.polling.fast(), self.config.polling.slow()),
            self.focus_rx.clone(),
            refresh_rx,
            list_tx,
            self.cancel.child_token(),
        );
        tokio::spawn(scheduler.run());

        // ── Periodic timers ───────────────────────────────────────────────────
        let mut rss_tick = tokio::time::interval(self.config.polling.rss());
        rss_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

        // Toast expiry + spinner animation + header countdown
        let mut toast_tick = tokio::time::interval(Duration::from_millis(100));
        toast_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

        // ── Main loop ─────────────────────────────────────────────────────────
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal.draw(|f| self.draw(f))?;
            }
            needs_redraw = false;

            if self.should_quit {
                break;
            }

            tokio::select! {
                Some(msg) = rx.recv() => {
                    needs_redraw = self.handle_message(msg);
                }

                Some(ev) = list_rx.recv() => {
                    self.on_list_poll(ev);
                    needs_redraw = true;
                }

                Some(ev) = detail_rx.recv() => {
                    self.on_detail_event(ev);
                    needs_redraw = true;
                }

                _ = rss_tick.tick() => {
                    self.poll_rss();
                }

                _ = toast_tick.tick() => {
                    self.toast.tick();
                    needs_redraw = true;
                }
            }
        }
        Ok(())
    }

    /// Returns whether the screen needs a redraw.
    fn handle_message(&mut self, msg: AppMessage) -> bool {
        match msg {
            AppMessage::Event(Event::Key(key)) => {
                if key.kind != KeyEventKind::Press {
                    return false;
                }
                for action in self.handle_key(key) {
                    self.dispatch(action);
                }
                true
            }
            AppMessage::Event(Event::FocusGained) => {
                debug!("[focus] gained");
                self.focus_tx.send_replace(true);
                false
            }
            AppMessage::Event(Event::FocusLost) => {
                debug!("[focus] lost");
                self.focus_tx.send_replace(false);
                false
            }
            AppMessage::Event(Event::Resize(..)) => true,
            AppMessage::Event(_) => false,
            AppMessage::DetailLoaded { id, result } => {
                self.on_detail_loaded(id, result);
                true
            }
            AppMessage::Rss(result) => {
                self.rss_in_flight = false;
                match result {
                    Ok(rss) => {
                        self.sync.rss_fetched_at = Some(Instant::now());
                        self.store.replace(Slice::Rss(rss));
                    }
                    Err(e) => warn!("[rss] status fetch failed: {}", e),
                }
                true
            }
            AppMessage::Settings(result) => {
                match result {
                    Ok(record) => self.store.replace(Slice::Settings(record)),
                    Err(e) => {
                        warn!("[settings] load failed: {}", e);
                        self.toast
                            .error(failure_text(&e, "Error loading settings"));
                    }
                }
                true
            }
            AppMessage::Done(outcome) => {
                self.on_outcome(outcome);
                true
            }
        }
    }

    // ── Poll results ──────────────────────────────────────────────────────────

    fn on_list_poll(&mut self, ev: ListPollEvent) {
        match ev {
            ListPollEvent::Torrents(Ok(torrents)) => {
                self.sync.connected = true;
                self.sync.last_error = None;
                self.store.replace(Slice::Torrents(torrents));
            }
            ListPollEvent::Torrents(Err(e)) => {
                if e.is_transport() {
                    self.sync.connected = false;
                }
                self.sync.last_error = Some(e.to_string());
            }
            ListPollEvent::Movies(Ok(list)) => self.store.replace(Slice::Movies(list)),
            // Already logged by the scheduler; the last good list stays up.
            ListPollEvent::Movies(Err(_)) => {}
            ListPollEvent::Cadence { pace, state } => {
                if self.sync.pace != pace || self.sync.poll_state != state {
                    info!("[poll] cadence {:?} / {:?}", pace, state);
                }
                self.sync.pace = pace;
                self.sync.poll_state = state;
            }
        }
    }

    fn on_detail_event(&mut self, ev: DetailEvent) {
        match ev {
            DetailEvent::Rerender(detail) => {
                if self.store.view().detail_id() == Some(detail.id()) {
                    self.store.replace(Slice::Detail(Some(*detail)));
                }
            }
            DetailEvent::Patch { id, live } => {
                if self.store.view().detail_id() == Some(id.as_str()) {
                    self.store.replace(Slice::DetailLive(live));
                }
            }
        }
    }

    fn on_detail_loaded(&mut self, id: String, result: ApiResult<MovieDetail>) {
        if self.store.view().detail_id() != Some(id.as_str()) {
            debug!("[detail] dropping load for {}, view moved on", id);
            return;
        }
        match result {
            Ok(detail) => {
                let poller = EntityPoller::should_start(&detail).then(|| EntityPoller::new(&detail));
                self.store.replace(Slice::Detail(Some(detail)));
                self.stop_detail_poller();
                if let Some(poller) = poller {
                    self.start_detail_poller(poller);
                }
            }
            Err(e) => {
                warn!("[detail] load {} failed: {}", id, e);
                self.toast
                    .error(failure_text(&e, "Error loading movie details"));
            }
        }
    }

    // ── Background helpers ────────────────────────────────────────────────────

    /// Run `fut` on the runtime and feed its message back into the loop.
    fn spawn_request<F>(&self, fut: F)
    where
        F: Future<Output = AppMessage> + Send + 'static,
    {
        let Some(tx) = self.tx.clone() else {
            return;
        };
        tokio::spawn(async move {
            let _ = tx.send(fut.await).await;
        });
    }

    fn request_refresh(&self) {
        if let Some(tx) = &self.refresh_tx {
            // Full means a refresh is already queued.
            let _ = tx.try_send(());
        }
    }

    fn load_detail(&self, id: String, delay: Duration) {
        let client = self.client.clone();
        self.spawn_request(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            let result = client.movie_detail(&id).await;
            AppMessage::DetailLoaded { id, result }
        });
    }

    fn load_settings(&self) {
        let client = self.client.clone();
        self.spawn_request(async move { AppMessage::Settings(client.settings().await) });
    }

    fn poll_rss(&mut self) {
        if self.rss_in_flight || self.tx.is_none() {
            return;
        }
        self.rss_in_flight = true;
        let client = self.client.clone();
        self.spawn_request(async move { AppMessage::Rss(client.rss_status().await) });
    }

    fn start_detail_poller(&mut self, poller: EntityPoller) {
        let Some(events) = self.detail_tx.clone() else {
            return;
        };
        let token = self.cancel.child_token();
        debug!("[detail] polling {}", poller.id());
        let task = DetailPoller::new(
            self.client.clone(),
            poller,
            self.config.polling.detail(),
            self.view_rx.clone(),
            events,
            token.clone(),
        );
        tokio::spawn(task.run());
        self.detail_cancel = Some(token);
    }

    fn stop_detail_poller(&mut self) {
        if let Some(token) = self.detail_cancel.take() {
            token.cancel();
        }
    }

    /// Reload the displayed detail if it is `id`.
    fn reload_detail_if_shown(&self, id: &str, delay: Duration) {
        if self.store.view().detail_id() == Some(id) {
            self.load_detail(id.to_string(), delay);
        }
    }

    // ── Keys ──────────────────────────────────────────────────────────────────

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Action> {
        if key.code == KeyCode::Char('c') && key.modifiers == KeyModifiers::CONTROL {
            return vec![Action::Quit];
        }

        let state = AppState {
            data: self.store.data(),
            sync: &self.sync,
        };

        // Modal layers capture every key
        if self.delete_dialog.is_open() {
            return self.delete_dialog.handle_key(key, &state);
        }
        if self.identify_prompt.is_open() {
            return self.identify_prompt.handle_key(key, &state);
        }
        if self.help_overlay.visible {
            return self.help_overlay.handle_key(key, &state);
        }

        let view = state.data.view.clone();
        let on_dashboard = view == View::Dashboard;
        match key.code {
            KeyCode::Char('q') => return vec![Action::Quit],
            KeyCode::Char('?') => return vec![Action::ToggleHelp],
            KeyCode::Char('1') => return vec![Action::Navigate(View::Dashboard)],
            KeyCode::Char('2') => return vec![Action::Navigate(View::Settings)],
            KeyCode::Char('3') => {
                return match &self.last_detail {
                    Some(id) => vec![Action::Navigate(View::MovieDetail(id.clone()))],
                    None => vec![],
                };
            }
            KeyCode::Esc if !on_dashboard => return vec![Action::Back],
            KeyCode::Char('r') => return vec![Action::RefreshNow],
            KeyCode::Char('t') => return vec![Action::TriggerCheck],
            KeyCode::Char('f') => return vec![Action::FetchRss],
            KeyCode::Tab | KeyCode::BackTab if on_dashboard => return vec![Action::FocusNext],
            KeyCode::Char('c') if on_dashboard => return vec![Action::BulkCopy],
            KeyCode::Char('d') if on_dashboard => {
                return vec![Action::OpenDeleteDialog(state.data.selection.ids())];
            }
            _ => {}
        }

        match view {
            View::Dashboard => match self.dashboard_focus {
                ComponentId::TorrentTable => self.torrent_table.borrow_mut().handle_key(key, &state),
                _ => self.movie_grid.borrow_mut().handle_key(key, &state),
            },
            View::MovieDetail(_) => self.movie_detail.borrow_mut().handle_key(key, &state),
            View::Settings => self.settings_view.borrow_mut().handle_key(key, &state),
        }
    }

    // ── Actions ───────────────────────────────────────────────────────────────

    fn dispatch(&mut self, action: Action) {
        match action {
            Action::Quit => {
                info!("quit requested");
                self.should_quit = true;
                self.cancel.cancel();
            }
            Action::FocusNext => {
                self.dashboard_focus = match self.dashboard_focus {
                    ComponentId::TorrentTable => ComponentId::MovieGrid,
                    _ => ComponentId::TorrentTable,
                };
            }
            Action::Navigate(view) => self.navigate(view),
            Action::Back => self.navigate(View::Dashboard),
            Action::ToggleHelp => self.help_overlay.toggle(),
            Action::Notify(severity, msg) => self.toast.push(msg, severity),

            Action::ToggleSelect(snapshot) => {
                self.store.update_selection(|s| s.toggle(snapshot));
            }
            Action::SelectAll(snapshots) => {
                self.store.update_selection(|s| {
                    for snapshot in snapshots {
                        s.select(snapshot);
                    }
                });
            }
            Action::ClearSelection => self.store.update_selection(|s| s.clear()),

            Action::BulkCopy => self.bulk_copy(),
            Action::OpenDeleteDialog(ids) => {
                if ids.is_empty() {
                    self.toast.info("No movies marked");
                } else {
                    self.delete_dialog.open(ids);
                }
            }
            Action::ConfirmDelete { ids, options } => {
                info!("[bulk] delete {} movie(s) {:?}", ids.len(), options);
                self.toast.spinner(format!("Deleting {} movie(s)…", ids.len()));
                let client = self.client.clone();
                self.spawn_request(async move {
                    let result = client.batch_delete(&ids, &options).await;
                    AppMessage::Done(Outcome::Delete { options, result })
                });
            }

            Action::Move(id) => {
                let client = self.client.clone();
                self.spawn_request(async move {
                    let result = client.move_entity(&id).await;
                    AppMessage::Done(Outcome::Move { id, result })
                });
            }
            Action::StopCopy(id) => {
                self.toast.info("Stopping copy...");
                let client = self.client.clone();
                self.spawn_request(async move {
                    let result = client.stop_copy(&id).await;
                    AppMessage::Done(Outcome::StopCopy { id, result })
                });
            }
            Action::MarkMoved(id) => {
                let client = self.client.clone();
                self.spawn_request(async move {
                    let result = client.mark_moved(&id).await;
                    AppMessage::Done(Outcome::MarkMoved { id, result })
                });
            }
            Action::OpenIdentify(id) => self.identify_prompt.open(id),
            Action::Identify { id, tmdb_id } => {
                info!("[identify] {} as tmdb {}", id, tmdb_id);
                self.toast.info("Identifying movie...");
                let client = self.client.clone();
                self.spawn_request(async move {
                    let result = client.identify_movie(&id, tmdb_id).await;
                    AppMessage::Done(Outcome::Identify { id, result })
                });
            }

            Action::RefreshNow => {
                self.request_refresh();
                match self.store.view().clone() {
                    View::MovieDetail(id) => self.load_detail(id, Duration::ZERO),
                    View::Settings => self.load_settings(),
                    View::Dashboard => {}
                }
            }
            Action::TriggerCheck => {
                let client = self.client.clone();
                self.spawn_request(async move {
                    AppMessage::Done(Outcome::Trigger(client.trigger_check().await))
                });
            }
            Action::FetchRss => {
                let client = self.client.clone();
                self.spawn_request(async move {
                    AppMessage::Done(Outcome::FetchRss(client.fetch_rss().await))
                });
            }
            Action::SaveSettings(record) => {
                let client = self.client.clone();
                self.spawn_request(async move {
                    let result = client.save_settings(&record).await;
                    AppMessage::Done(Outcome::SaveSettings { record, result })
                });
            }
        }
    }

    fn navigate(&mut self, view: View) {
        if !self.store.set_view(view.clone()) {
            return;
        }
        debug!("[nav] -> {}", view.label());
        self.stop_detail_poller();
        self.identify_prompt.close();
        match view {
            View::MovieDetail(id) => {
                self.last_detail = Some(id.clone());
                self.store.replace(Slice::Detail(None));
                self.load_detail(id, Duration::ZERO);
            }
            View::Settings => self.load_settings(),
            View::Dashboard => {}
        }
    }

    fn bulk_copy(&mut self) {
        let selection = &self.store.data().selection;
        if selection.is_empty() {
            return;
        }
        if !selection.copy_enabled() {
            self.toast.warning("No valid movies to copy");
            return;
        }
        let ids = selection.eligible_for_copy();
        info!("[bulk] copy {} movie(s)", ids.len());
        self.toast.spinner(format!("Copying {} movie(s)…", ids.len()));
        let client = self.client.clone();
        self.spawn_request(async move {
            AppMessage::Done(Outcome::BulkCopy(client.batch_copy(&ids).await))
        });
    }

    fn on_outcome(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::BulkCopy(Ok(result)) => {
                self.toast.resolve_spinner(
                    Severity::Success,
                    format!("{} movies queued for copy", result.copied),
                );
                self.store.update_selection(|s| s.finish(true));
                self.request_refresh();
            }
            Outcome::BulkCopy(Err(e)) => {
                warn!("[bulk] copy failed: {}", e);
                self.toast
                    .resolve_spinner(Severity::Error, failure_text(&e, "Error copying movies"));
                self.store.update_selection(|s| s.finish(false));
            }

            Outcome::Delete {
                options,
                result: Ok(result),
            } => {
                self.toast
                    .resolve_spinner(Severity::Success, result.summary(&options));
                for err in &result.errors {
                    warn!("[bulk] delete: {}", err);
                }
                self.store.update_selection(|s| s.finish(true));
                if self.store.view().detail_id().is_some() {
                    self.navigate(View::Dashboard);
                }
                self.request_refresh();
            }
            Outcome::Delete { result: Err(e), .. } => {
                warn!("[bulk] delete failed: {}", e);
                self.toast
                    .resolve_spinner(Severity::Error, failure_text(&e, "Error deleting movies"));
                self.store.update_selection(|s| s.finish(false));
            }

            Outcome::Move { id, result: Ok(_) } => {
                self.toast.success("Move started");
                self.reload_detail_if_shown(&id, MOVE_RELOAD_DELAY);
                self.request_refresh();
            }
            Outcome::Move { id, result: Err(e) } => {
                warn!("[move] {} failed: {}", id, e);
                self.toast.error(failure_text(&e, "Error starting move"));
            }

            Outcome::StopCopy { id, result: Ok(_) } => {
                self.toast.success("Copy process stopped");
                self.reload_detail_if_shown(&id, Duration::ZERO);
                self.request_refresh();
            }
            Outcome::StopCopy { id, result: Err(e) } => {
                warn!("[stop] {} failed: {}", id, e);
                self.toast.error(failure_text(&e, "Error stopping copy"));
            }

            Outcome::MarkMoved { id, result: Ok(_) } => {
                self.toast.success("Marked as moved");
                self.reload_detail_if_shown(&id, Duration::ZERO);
                self.request_refresh();
            }
            Outcome::MarkMoved { id, result: Err(e) } => {
                warn!("[mark] {} failed: {}", id, e);
                self.toast.error(failure_text(&e, "Error marking as moved"));
            }

            Outcome::Identify { id, result: Ok(_) } => {
                self.toast.success("Movie identified successfully!");
                self.reload_detail_if_shown(&id, Duration::ZERO);
                self.request_refresh();
            }
            Outcome::Identify { id, result: Err(e) } => {
                warn!("[identify] {} failed: {}", id, e);
                self.toast.error(failure_text(&e, "Error identifying movie"));
            }

            Outcome::Trigger(Ok(_)) => {
                self.toast.success("Auto-check triggered");
                self.request_refresh();
            }
            Outcome::Trigger(Err(e)) => {
                warn!("[trigger] failed: {}", e);
                self.toast.error("Error triggering check");
            }

            Outcome::FetchRss(Ok(result)) => {
                self.toast.success(
                    result
                        .message
                        .filter(|m| !m.is_empty())
                        .unwrap_or_else(|| "RSS feeds fetched".to_string()),
                );
                self.poll_rss();
                self.request_refresh();
            }
            Outcome::FetchRss(Err(e)) => {
                warn!("[rss] fetch failed: {}", e);
                self.toast.error(failure_text(&e, "Error fetching RSS movies"));
            }

            Outcome::SaveSettings {
                record,
                result: Ok(_),
            } => {
                self.toast.success("Settings saved successfully");
                self.store.replace(Slice::Settings(record));
            }
            Outcome::SaveSettings { result: Err(e), .. } => {
                warn!("[settings] save failed: {}", e);
                self.toast.error("Error saving settings");
            }
        }
    }

    // ── Drawing ───────────────────────────────────────────────────────────────

    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);

        let state = AppState {
            data: self.store.data(),
            sync: &self.sync,
        };

        header::draw(frame, outer[0], &state);
        status_bar::draw_separator(frame, outer[1]);

        let body = outer[2];
        match &state.data.view {
            View::Dashboard => {
                let panes = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
                    .split(body);
                let table_focused = self.dashboard_focus == self.torrent_table.borrow().id();
                self.torrent_table
                    .borrow_mut()
                    .draw(frame, panes[0], table_focused, &state);
                self.movie_grid
                    .borrow_mut()
                    .draw(frame, panes[1], !table_focused, &state);
            }
            View::MovieDetail(_) => self.movie_detail.borrow_mut().draw(frame, body, true, &state),
            View::Settings => self.settings_view.borrow_mut().draw(frame, body, true, &state),
        }

        status_bar::draw_keys_bar(frame, outer[3], &state.data.view, state.data.selection.len());

        // ── Overlays (on top of everything) ───────────────────────────────────
        self.delete_dialog.draw(frame, area, true, &state);
        self.identify_prompt.draw(frame, area, true, &state);
        self.help_overlay.draw(frame, area, true, &state);
        self.toast.draw(frame, area);
    }
}
