//! Component trait: the interface every UI panel implements.
//!
//! - Components own their presentation state and render themselves.
//! - Server data arrives through `AppState` (read-only) or through store
//!   subscriptions that rebuild/patch the component's retained rows.
//! - Components produce `Vec<Action>`; they never mutate shared state directly.

use ratatui::crossterm::event::KeyEvent;
use ratatui::{layout::Rect, Frame};

use crate::action::{Action, ComponentId};
use crate::app_state::AppState;

pub trait Component {
    fn id(&self) -> ComponentId;

    /// Handle a key event. Only called when this component has focus.
    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action>;

    /// Render the component into `area`.
    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState);
}
