//! Widgets that register their own click targets while they are built, so a
//! tap always lands on what was actually drawn.

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::style::{Color, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::{Block, Paragraph};
use ratzilla::ratatui::Frame;

use crate::input::ClickState;

struct Tab {
    label: String,
    style: Style,
    action_id: u16,
}

impl Tab {
    /// Labels are drawn with one space of padding on each side.
    fn padded(&self) -> String {
        format!(" {} ", self.label)
    }
}

/// One-row tab strip.
///
/// ```ignore
/// TabBar::new(" │ ")
///     .tab("Shop", shop_style, TAB_SHOP)
///     .tab(format!("Challenges {}/{}", done, total), style, TAB_CHALLENGES)
///     .render(f, area, &mut cs);
/// ```
pub struct TabBar<'a> {
    tabs: Vec<Tab>,
    separator: &'a str,
}

impl<'a> TabBar<'a> {
    pub fn new(separator: &'a str) -> Self {
        Self {
            tabs: Vec::new(),
            separator,
        }
    }

    pub fn tab(mut self, label: impl Into<String>, style: Style, action_id: u16) -> Self {
        self.tabs.push(Tab {
            label: label.into(),
            style,
            action_id,
        });
        self
    }

    fn widths(&self) -> Vec<(u16, u16)> {
        self.tabs
            .iter()
            .map(|t| (Line::from(t.padded()).width() as u16, t.action_id))
            .collect()
    }

    pub fn render(self, f: &mut Frame, area: Rect, cs: &mut ClickState) {
        let widths = self.widths();
        let separator = Span::styled(self.separator, Style::default().fg(Color::DarkGray));
        let sep_width = separator.width() as u16;

        let mut spans = Vec::with_capacity(self.tabs.len() * 2);
        for (i, tab) in self.tabs.iter().enumerate() {
            if i > 0 {
                spans.push(separator.clone());
            }
            spans.push(Span::styled(tab.padded(), tab.style));
        }
        f.render_widget(Paragraph::new(Line::from(spans)), area);

        cs.register_tab_targets(&widths, sep_width, area.x, area.y, area.width, area.height.max(1));
    }
}

/// Lines of a bordered panel, some of which are buttons.
///
/// ```ignore
/// let mut cl = ClickableList::new();
/// cl.push(Line::from(" ── Staff ──"));
/// cl.push_clickable(Line::from(" [2] Hire Staff"), BUY_ENTRY_BASE + 1);
/// cl.register_targets_with_block(area, &block, &mut cs, 0);
/// f.render_widget(Paragraph::new(cl.into_lines()).block(block), area);
/// ```
pub struct ClickableList<'a> {
    rows: Vec<(Line<'a>, Option<u16>)>,
}

impl<'a> ClickableList<'a> {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn push(&mut self, line: Line<'a>) {
        self.rows.push((line, None));
    }

    pub fn push_clickable(&mut self, line: Line<'a>, action_id: u16) {
        self.rows.push((line, Some(action_id)));
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn into_lines(self) -> Vec<Line<'a>> {
        self.rows.into_iter().map(|(line, _)| line).collect()
    }

    /// Register every visible button row. `top_offset` and `bottom_offset`
    /// are the border rows above and below the content, and `scroll` is the
    /// number of lines scrolled off the top. Targets span the full `area` width.
    pub fn register_targets(
        &self,
        area: Rect,
        cs: &mut ClickState,
        top_offset: u16,
        bottom_offset: u16,
        scroll: u16,
    ) {
        let first_row = area.y + top_offset;
        let visible = area.height.saturating_sub(top_offset + bottom_offset);

        let buttons = self
            .rows
            .iter()
            .enumerate()
            .filter_map(|(i, (_, action))| action.map(|id| (i as u16, id)));
        for (index, action_id) in buttons {
            let Some(offset) = index.checked_sub(scroll) else {
                continue;
            };
            if offset < visible {
                cs.add_row_target(area, first_row + offset, action_id);
            }
        }
    }

    /// [`register_targets`](Self::register_targets) with the offsets read off
    /// the block the list is drawn in.
    pub fn register_targets_with_block(
        &self,
        area: Rect,
        block: &Block,
        cs: &mut ClickState,
        scroll: u16,
    ) {
        let inner = block.inner(area);
        let top = inner.y - area.y;
        let bottom = area.bottom() - inner.bottom();
        self.register_targets(area, cs, top, bottom, scroll);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::boba::actions::{
        BREW, BUY_ENTRY_BASE, DURATION_UP, RESET_PROGRESS, SAVE_NOW, TAB_CHALLENGES, TAB_SHOP,
        TAB_STATS, TIMER_RESET, TIMER_TOGGLE,
    };
    use ratzilla::ratatui::widgets::Borders;

    #[test]
    fn tab_widths_include_padding() {
        let bar = TabBar::new(" │ ")
            .tab("Shop", Style::default(), TAB_SHOP)
            .tab("Challenges 2/5", Style::default(), TAB_CHALLENGES)
            .tab("Stats", Style::default(), TAB_STATS);
        assert_eq!(
            bar.widths(),
            vec![(6, TAB_SHOP), (16, TAB_CHALLENGES), (7, TAB_STATS)]
        );
    }

    #[test]
    fn only_buttons_get_rows() {
        let mut cl = ClickableList::new();
        cl.push(Line::from(" 25:00 Focus"));
        cl.push(Line::from(""));
        cl.push_clickable(Line::from(" [s] Start"), TIMER_TOGGLE);
        cl.push_clickable(Line::from(" [r] Reset"), TIMER_RESET);
        cl.push_clickable(Line::from(" [+] Longer"), DURATION_UP);
        assert_eq!(cl.len(), 5);

        let area = Rect::new(0, 8, 60, 8);
        let mut cs = ClickState::new();
        cl.register_targets(area, &mut cs, 1, 1, 0);

        assert_eq!(cs.targets.len(), 3);
        assert_eq!(cs.hit_test(3, 10), None);
        assert_eq!(cs.hit_test(3, 11), Some(TIMER_TOGGLE));
        assert_eq!(cs.hit_test(3, 12), Some(TIMER_RESET));
        assert_eq!(cs.hit_test(3, 13), Some(DURATION_UP));
    }

    #[test]
    fn rows_past_the_border_are_skipped() {
        let mut cl = ClickableList::new();
        for i in 0..6u16 {
            cl.push_clickable(Line::from(format!("entry {}", i)), BUY_ENTRY_BASE + i);
        }
        // 5 rows, 1 border each side: 3 visible
        let area = Rect::new(0, 0, 60, 5);
        let mut cs = ClickState::new();
        cl.register_targets(area, &mut cs, 1, 1, 0);

        assert_eq!(cs.targets.len(), 3);
        assert_eq!(cs.hit_test(0, 3), Some(BUY_ENTRY_BASE + 2));
        assert_eq!(cs.hit_test(0, 4), None);
    }

    #[test]
    fn scrolled_rows_shift_up() {
        let mut cl = ClickableList::new();
        cl.push(Line::from(" ── Brewing ──"));
        cl.push_clickable(Line::from("tapioca"), BUY_ENTRY_BASE);
        cl.push_clickable(Line::from("staff"), BUY_ENTRY_BASE + 1);

        let area = Rect::new(0, 20, 60, 6);
        let mut cs = ClickState::new();
        cl.register_targets(area, &mut cs, 1, 1, 2);

        assert_eq!(cs.targets.len(), 1);
        assert_eq!(cs.hit_test(0, 21), Some(BUY_ENTRY_BASE + 1));
    }

    #[test]
    fn block_with_full_border() {
        let mut cl = ClickableList::new();
        cl.push(Line::from(" Boba  12"));
        cl.push_clickable(Line::from(" [w] Save now"), SAVE_NOW);
        cl.push_clickable(Line::from(" [X] Reset progress"), RESET_PROGRESS);

        let block = Block::default().borders(Borders::ALL);
        let area = Rect::new(0, 17, 60, 10);
        let mut cs = ClickState::new();
        cl.register_targets_with_block(area, &block, &mut cs, 0);

        assert_eq!(cs.hit_test(30, 19), Some(SAVE_NOW));
        assert_eq!(cs.hit_test(30, 20), Some(RESET_PROGRESS));
    }

    #[test]
    fn block_without_top_border() {
        let mut cl = ClickableList::new();
        cl.push_clickable(Line::from(" [c] Brew boba"), BREW);

        let block = Block::default().borders(Borders::BOTTOM);
        let area = Rect::new(0, 0, 40, 2);
        let mut cs = ClickState::new();
        cl.register_targets_with_block(area, &block, &mut cs, 0);

        assert_eq!(cs.hit_test(0, 0), Some(BREW));
        assert_eq!(cs.targets.len(), 1);
    }

    #[test]
    fn lines_come_back_in_order() {
        let mut cl = ClickableList::new();
        cl.push(Line::from("a"));
        cl.push_clickable(Line::from("b"), BREW);
        let lines = cl.into_lines();
        assert_eq!(lines, vec![Line::from("a"), Line::from("b")]);
    }
}
