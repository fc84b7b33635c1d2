//! Cursor + scroll bookkeeping for list-like panes.
//!
//! Items are replaced wholesale on every data refresh; the cursor is kept on
//! the same key when that key survives, otherwise clamped.

pub struct ScrollableList<T> {
    items: Vec<T>,
    pub selected: usize,
    pub scroll_offset: usize,
    key_fn: fn(&T) -> &str,
}

impl<T> ScrollableList<T> {
    pub fn new(key_fn: fn(&T) -> &str) -> Self {
        Self {
            items: Vec::new(),
            selected: 0,
            scroll_offset: 0,
            key_fn,
        }
    }

    pub fn set_items(&mut self, items: Vec<T>) {
        let prev_key = self.selected_item().map(|i| (self.key_fn)(i).to_string());
        self.items = items;
        if let Some(key) = prev_key {
            if let Some(pos) = self.items.iter().position(|i| (self.key_fn)(i) == key) {
                self.selected = pos;
                return;
            }
        }
        self.clamp();
    }

    fn clamp(&mut self) {
        if self.selected >= self.items.len() {
            self.selected = self.items.len().saturating_sub(1);
        }
        if self.scroll_offset > self.selected {
            self.scroll_offset = self.selected;
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn select_up(&mut self, n: usize) {
        self.selected = self.selected.saturating_sub(n);
    }

    pub fn select_down(&mut self, n: usize) {
        if self.items.is_empty() {
            return;
        }
        self.selected = (self.selected + n).min(self.items.len() - 1);
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
        self.scroll_offset = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.items.len().saturating_sub(1);
    }

    pub fn selected_item(&self) -> Option<&T> {
        self.items.get(self.selected)
    }

    /// Adjust `scroll_offset` so the cursor is inside a `height`-row window.
    pub fn ensure_visible(&mut self, height: usize) {
        if height == 0 {
            return;
        }
        if self.selected < self.scroll_offset {
            self.scroll_offset = self.selected;
        } else if self.selected >= self.scroll_offset + height {
            self.scroll_offset = self.selected.saturating_sub(height - 1);
        }
    }

    /// `(index, item)` pairs inside the current window.
    pub fn visible_items(&self, height: usize) -> Vec<(usize, &T)> {
        self.items
            .iter()
            .enumerate()
            .skip(self.scroll_offset)
            .take(height)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &String) -> &str {
        s.as_str()
    }

    fn list(items: &[&str]) -> ScrollableList<String> {
        let mut l = ScrollableList::new(key);
        l.set_items(items.iter().map(|s| s.to_string()).collect());
        l
    }

    #[test]
    fn test_cursor_follows_key_across_refresh() {
        let mut l = list(&["a", "b", "c"]);
        l.select_down(2);
        l.set_items(vec!["c".into(), "a".into()]);
        assert_eq!(l.selected_item().map(String::as_str), Some("c"));
    }

    #[test]
    fn test_cursor_clamps_when_key_disappears() {
        let mut l = list(&["a", "b", "c"]);
        l.select_last();
        l.set_items(vec!["a".into()]);
        assert_eq!(l.selected, 0);
        l.set_items(Vec::new());
        assert!(l.selected_item().is_none());
    }

    #[test]
    fn test_window_tracks_cursor() {
        let mut l = list(&["a", "b", "c", "d", "e"]);
        l.select_down(4);
        l.ensure_visible(2);
        assert_eq!(l.scroll_offset, 3);
        let visible: Vec<usize> = l.visible_items(2).into_iter().map(|(i, _)| i).collect();
        assert_eq!(visible, vec![3, 4]);
    }
}
