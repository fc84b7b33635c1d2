//! Multi-item selection bound to snapshots taken at selection time.
//!
//! Snapshots are deliberately frozen: background polls never touch them, so
//! bulk-action eligibility stays stable while the user decides.

use std::collections::BTreeMap;

use roverr_proto::protocol::Status;

/// Fields of an entity captured when it was selected.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionSnapshot {
    pub id: String,
    pub title: String,
    /// `None` for entities whose record failed to decode.
    pub status: Option<Status>,
}

impl SelectionSnapshot {
    pub fn blocks_copy(&self) -> bool {
        self.status.map_or(true, Status::blocks_copy)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionSet {
    entries: BTreeMap<String, SelectionSnapshot>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, snapshot: SelectionSnapshot) {
        self.entries.insert(snapshot.id.clone(), snapshot);
    }

    pub fn deselect(&mut self, id: &str) -> bool {
        self.entries.remove(id).is_some()
    }

    /// Returns `true` when `snapshot` ended up selected.
    pub fn toggle(&mut self, snapshot: SelectionSnapshot) -> bool {
        if self.deselect(&snapshot.id) {
            false
        } else {
            self.select(snapshot);
            true
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&SelectionSnapshot> {
        self.entries.get(id)
    }

    pub fn members(&self) -> impl Iterator<Item = &SelectionSnapshot> {
        self.entries.values()
    }

    pub fn ids(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn any(&self, predicate: impl Fn(&SelectionSnapshot) -> bool) -> bool {
        self.members().any(predicate)
    }

    /// Ids a bulk copy may act on.
    pub fn eligible_for_copy(&self) -> Vec<String> {
        self.members()
            .filter(|s| !s.blocks_copy())
            .map(|s| s.id.clone())
            .collect()
    }

    /// Bulk copy is offered iff at least one member may be copied.
    pub fn copy_enabled(&self) -> bool {
        self.any(|s| !s.blocks_copy())
    }

    /// Settle a bulk action over this set. Clears only on success so a
    /// failed request can be retried with the same selection.
    pub fn finish(&mut self, success: bool) {
        if success {
            self.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(id: &str, status: Status) -> SelectionSnapshot {
        SelectionSnapshot {
            id: id.to_string(),
            title: format!("Movie {}", id),
            status: Some(status),
        }
    }

    #[test]
    fn test_toggle_selects_then_deselects() {
        let mut set = SelectionSet::new();
        assert!(set.toggle(snap("a", Status::Moved)));
        assert!(set.contains("a"));
        assert!(!set.toggle(snap("a", Status::Moved)));
        assert!(set.is_empty());
    }

    #[test]
    fn test_copy_eligibility_from_snapshots() {
        let mut set = SelectionSet::new();
        assert!(!set.copy_enabled());

        set.select(snap("a", Status::Error));
        set.select(snap("b", Status::Orphaned));
        assert!(!set.copy_enabled());
        assert!(set.eligible_for_copy().is_empty());

        set.select(snap("c", Status::Moved));
        assert!(set.copy_enabled());
        assert_eq!(set.eligible_for_copy(), vec!["c".to_string()]);
    }

    #[test]
    fn test_malformed_snapshot_is_not_copyable() {
        let mut set = SelectionSet::new();
        set.select(SelectionSnapshot {
            id: "x".into(),
            title: "x".into(),
            status: None,
        });
        assert!(!set.copy_enabled());
    }

    #[test]
    fn test_toggle_off_and_on_takes_a_fresh_snapshot() {
        let mut set = SelectionSet::new();
        set.select(snap("e", Status::Moved));
        assert_eq!(set.get("e").and_then(|s| s.status), Some(Status::Moved));

        // Toggling twice captures whatever the caller holds at that moment.
        set.toggle(snap("e", Status::Moved));
        set.toggle(snap("e", Status::Error));
        assert_eq!(set.get("e").and_then(|s| s.status), Some(Status::Error));
        assert!(!set.copy_enabled());
    }

    #[test]
    fn test_finish_clears_only_on_success() {
        let mut set = SelectionSet::new();
        set.select(snap("a", Status::Moved));
        set.finish(false);
        assert_eq!(set.len(), 1);
        set.finish(true);
        assert!(set.is_empty());
    }
}
