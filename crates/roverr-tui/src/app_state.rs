//! AppState: read-only data passed to all components during render/event.
//!
//! Components read server data through the store snapshot and polling health
//! through [`SyncStatus`], but never mutate either. The App event loop is the
//! only writer.

use std::time::{Duration, Instant};

use crate::sync::scheduler::{Pace, PollState};
use crate::sync::store::StoreData;

/// Health of the background pollers, as last reported.
#[derive(Debug, Clone)]
pub struct SyncStatus {
    pub base_url: String,
    /// Last list fetch reached the backend.
    pub connected: bool,
    pub last_error: Option<String>,
    pub pace: Pace,
    pub poll_state: PollState,
    pub fast: Duration,
    pub slow: Duration,
    /// When the RSS status in the store was fetched; the countdown runs from it.
    pub rss_fetched_at: Option<Instant>,
}

impl SyncStatus {
    pub fn new(base_url: &str, fast: Duration, slow: Duration) -> Self {
        Self {
            base_url: base_url.to_string(),
            connected: false,
            last_error: None,
            pace: Pace::Fast,
            poll_state: PollState::Active,
            fast,
            slow,
            rss_fetched_at: None,
        }
    }

    /// `fast 2s`, `slow 10s` or `paused`.
    pub fn cadence_label(&self) -> String {
        match (self.poll_state, self.pace) {
            (PollState::Suspended, _) => "paused".to_string(),
            (PollState::Active, Pace::Fast) => format!("fast {}s", self.fast.as_secs_f64()),
            (PollState::Active, Pace::Slow) => format!("slow {}s", self.slow.as_secs_f64()),
        }
    }
}

pub struct AppState<'a> {
    pub data: &'a StoreData,
    pub sync: &'a SyncStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cadence_label() {
        let mut s = SyncStatus::new("http://nas:8000", Duration::from_secs(2), Duration::from_secs(10));
        assert_eq!(s.cadence_label(), "fast 2s");
        s.pace = Pace::Slow;
        assert_eq!(s.cadence_label(), "slow 10s");
        s.poll_state = PollState::Suspended;
        assert_eq!(s.cadence_label(), "paused");
    }
}
