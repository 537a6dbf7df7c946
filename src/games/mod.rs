//! The interface the host loop drives.

pub mod boba;

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::Frame;

use crate::input::{ClickState, InputEvent};

/// A screen the browser loop can feed input and frames to. Every timestamp
/// is wall-clock milliseconds supplied by the caller, never read internally.
pub trait Game {
    /// Apply a key press or tap. False when nothing reacted to it.
    fn handle_input(&mut self, event: &InputEvent, now_ms: f64) -> bool;

    /// Catch the passive loop and the countdown up to `now_ms`.
    fn update(&mut self, now_ms: f64);

    /// Draw into `area` and register the frame's tap targets.
    fn render(&self, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>);
}
