//! Keyboard and tap input.
//!
//! Keys arrive as characters. Taps arrive as pixel offsets inside the grid
//! container and are resolved to the action registered for that cell during
//! the last rendered frame.

use ratzilla::ratatui::layout::{Position, Rect};

#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Key(char),
    /// A tap on a registered target, carrying its action id
    /// (see `games::boba::actions`).
    Click(u16),
}

#[derive(Debug, Clone)]
pub struct ClickTarget {
    /// Hit region in terminal cells.
    pub rect: Rect,
    pub action_id: u16,
}

/// Click targets of the current frame plus the grid size they were laid out
/// for. Shared between the draw callback and the mouse handler.
pub struct ClickState {
    pub targets: Vec<ClickTarget>,
    pub terminal_cols: u16,
    pub terminal_rows: u16,
}

impl ClickState {
    pub fn new() -> Self {
        Self {
            targets: Vec::new(),
            terminal_cols: 0,
            terminal_rows: 0,
        }
    }

    pub fn clear_targets(&mut self) {
        self.targets.clear();
    }

    pub fn add_click_target(&mut self, rect: Rect, action_id: u16) {
        self.targets.push(ClickTarget { rect, action_id });
    }

    /// Whole-width target on `row`, ignored if the row lies outside `area`.
    pub fn add_row_target(&mut self, area: Rect, row: u16, action_id: u16) {
        if (area.y..area.bottom()).contains(&row) {
            self.add_click_target(Rect::new(area.x, row, area.width, 1), action_id);
        }
    }

    /// Targets for a one-line tab strip.
    ///
    /// `tab_widths` is `(label width, action id)` per tab in drawing order.
    /// The gap between two labels is split at its midpoint, and the outer
    /// tabs reach the edges of the strip, so every column is tappable.
    pub fn register_tab_targets(
        &mut self,
        tab_widths: &[(u16, u16)],
        separator_width: u16,
        x: u16,
        y: u16,
        total_width: u16,
        height: u16,
    ) {
        if tab_widths.is_empty() || total_width == 0 {
            return;
        }

        // Column where each label starts and ends, relative to `x`.
        let mut spans = Vec::with_capacity(tab_widths.len());
        let mut col = 0u16;
        for &(width, _) in tab_widths {
            spans.push((col, col + width));
            col += width + separator_width;
        }

        let last = spans.len() - 1;
        for (i, &(start, end)) in spans.iter().enumerate() {
            let left = if i == 0 {
                0
            } else {
                let prev_end = spans[i - 1].1;
                prev_end + (start - prev_end) / 2
            };
            let right = if i == last {
                total_width
            } else {
                let next_start = spans[i + 1].0;
                end + (next_start - end) / 2
            };
            if right > left {
                self.add_click_target(
                    Rect::new(x + left, y, right - left, height),
                    tab_widths[i].1,
                );
            }
        }
    }

    /// Action at a cell. The most recently registered target wins.
    pub fn hit_test(&self, col: u16, row: u16) -> Option<u16> {
        let cell = Position::new(col, row);
        self.targets
            .iter()
            .rev()
            .find(|t| t.rect.contains(cell))
            .map(|t| t.action_id)
    }

    /// Action under a tap given in pixels relative to the grid's top-left.
    pub fn resolve_pixel(
        &self,
        click_x: f64,
        click_y: f64,
        grid_width: f64,
        grid_height: f64,
    ) -> Option<u16> {
        let col = pixel_x_to_col(click_x, grid_width, self.terminal_cols)?;
        let row = pixel_y_to_row(click_y, grid_height, self.terminal_rows)?;
        self.hit_test(col, row)
    }
}

/// Below this many columns panels drop their side borders and the log panel.
pub fn is_narrow_layout(width: u16) -> bool {
    width < 60
}

/// Index of the cell containing `offset`, for a grid of `cells` cells spread
/// evenly across `extent` pixels.
fn cell_at(offset: f64, extent: f64, cells: u16) -> Option<u16> {
    if cells == 0 || extent <= 0.0 || offset < 0.0 {
        return None;
    }
    let index = (offset * f64::from(cells) / extent).floor();
    (index < f64::from(cells)).then_some(index as u16)
}

pub fn pixel_y_to_row(click_y: f64, grid_height: f64, terminal_rows: u16) -> Option<u16> {
    cell_at(click_y, grid_height, terminal_rows)
}

pub fn pixel_x_to_col(click_x: f64, grid_width: f64, terminal_cols: u16) -> Option<u16> {
    cell_at(click_x, grid_width, terminal_cols)
}
