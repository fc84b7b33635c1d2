//! Action enum: all user-initiated intents.

use roverr_proto::protocol::{BatchDeleteOptions, SettingsRecord};

use crate::sync::selection::SelectionSnapshot;
use crate::sync::store::View;
use crate::widgets::toast::Severity;

/// Unique identifier for a focusable component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentId {
    TorrentTable,
    MovieGrid,
    MovieDetail,
    Settings,
    DeleteDialog,
    IdentifyPrompt,
    HelpOverlay,
}

/// Components produce Actions; the App dispatches them.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Navigation ───────────────────────────────────────────────────────────
    FocusNext,
    Navigate(View),
    Back,

    // ── Selection ────────────────────────────────────────────────────────────
    ToggleSelect(SelectionSnapshot),
    SelectAll(Vec<SelectionSnapshot>),
    ClearSelection,

    // ── Bulk actions ─────────────────────────────────────────────────────────
    BulkCopy,
    /// Ask which delete flags to use for these ids.
    OpenDeleteDialog(Vec<String>),
    ConfirmDelete {
        ids: Vec<String>,
        options: BatchDeleteOptions,
    },

    // ── Single entity ────────────────────────────────────────────────────────
    Move(String),
    StopCopy(String),
    MarkMoved(String),
    /// Ask for the TMDB id to re-identify this movie with.
    OpenIdentify(String),
    Identify {
        id: String,
        tmdb_id: u64,
    },

    // ── Backend ──────────────────────────────────────────────────────────────
    RefreshNow,
    TriggerCheck,
    FetchRss,
    SaveSettings(SettingsRecord),

    // ── System ───────────────────────────────────────────────────────────────
    Notify(Severity, String),
    ToggleHelp,
    Quit,
}
