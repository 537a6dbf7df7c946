//! Boba Focus rendering: brew counter, pomodoro timer, shop / challenges /
//! stats tabs, and the message log.

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratzilla::ratatui::style::{Color, Modifier, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::{Block, Borders, Gauge, Paragraph};
use ratzilla::ratatui::Frame;

use crate::input::{is_narrow_layout, ClickState};
use crate::widgets::{ClickableList, TabBar};

use super::actions::*;
use super::catalog::{self, Category};
use super::challenges;
use super::economy::{can_afford, format_number};
use super::timer::TimerMode;
use super::{BobaGame, Tab};

/// Cup art, 3 lines. The second frame is shown right after a click.
const CUP_ART: &[&[&str]] = &[
    &[" ╭───╮ ", " │°o°│ ", " ╰───╯ "],
    &[" ╭═══╮ ", " │o°o│ ", " ╰═══╯ "],
];

pub fn render(game: &BobaGame, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
    let narrow = is_narrow_layout(area.width);

    // Log panel on the right when wide enough
    let (main_area, log_area) = if area.width >= 80 {
        let h_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(area);
        (h_chunks[0], Some(h_chunks[1]))
    } else {
        (area, None)
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8), // counter
            Constraint::Length(8), // timer
            Constraint::Length(1), // tab bar
            Constraint::Min(5),    // tab content
        ])
        .split(main_area);

    render_counter(game, f, chunks[0], click_state, narrow);
    render_timer(game, f, chunks[1], click_state, narrow);
    render_tab_bar(game, f, chunks[2], click_state);
    match game.tab {
        Tab::Shop => render_shop(game, f, chunks[3], click_state, narrow),
        Tab::Challenges => render_challenges(game, f, chunks[3], narrow),
        Tab::Stats => render_stats(game, f, chunks[3], click_state, narrow),
    }

    if let Some(log_area) = log_area {
        render_log(game, f, log_area);
    }
}

fn panel<'a>(title: &'a str, color: Color, narrow: bool) -> Block<'a> {
    let borders = if narrow {
        Borders::TOP | Borders::BOTTOM
    } else {
        Borders::ALL
    };
    Block::default()
        .borders(borders)
        .border_style(Style::default().fg(color))
        .title(title)
}

fn key_line<'a>(key: char, label: &str, style: Style) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!(" [{}] ", key), style.add_modifier(Modifier::BOLD)),
        Span::styled(label.to_string(), style),
    ])
}

fn render_counter(
    game: &BobaGame,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
    narrow: bool,
) {
    let s = &game.state;
    let combo = game.combo.active(game.now_ms);
    let art = CUP_ART[if combo > 0 { 1 } else { 0 }];

    let mut cl = ClickableList::new();
    cl.push(Line::from(vec![
        Span::styled(art[0], Style::default().fg(Color::Magenta)),
        Span::styled(
            format!("{} boba", format_number(s.currency.floor())),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
    ]));
    cl.push(Line::from(vec![
        Span::styled(art[1], Style::default().fg(Color::Magenta)),
        Span::styled(
            format!(
                "{}/click  {}/s",
                format_number(s.per_click_rate),
                format_number(s.passive_rate)
            ),
            Style::default().fg(Color::Gray),
        ),
    ]));
    let combo_text = if combo > 1 {
        format!("{}x combo", combo)
    } else {
        String::new()
    };
    cl.push(Line::from(vec![
        Span::styled(art[2], Style::default().fg(Color::Magenta)),
        Span::styled(combo_text, Style::default().fg(Color::LightRed)),
    ]));
    cl.push(Line::from(Span::styled(
        format!(
            " Goal: {} / {}",
            format_number(s.total_earned.floor()),
            format_number(s.current_goal)
        ),
        Style::default().fg(Color::Cyan),
    )));
    cl.push_clickable(key_line('c', "Brew boba", Style::default().fg(Color::Green)), BREW);

    let block = panel(" Boba Focus ", Color::Magenta, narrow);
    let inner = block.inner(area);
    let mut cs = click_state.borrow_mut();
    cl.register_targets_with_block(area, &block, &mut cs, 0);
    drop(cs);
    f.render_widget(Paragraph::new(cl.into_lines()).block(block), area);

    // Goal gauge on the last inner row
    if inner.height >= 6 {
        let gauge_area = Rect::new(inner.x, inner.y + inner.height - 1, inner.width, 1);
        let ratio = s.goal_progress();
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(Color::Cyan).bg(Color::Black))
            .ratio(ratio)
            .label(format!("{:.0}%", ratio * 100.0));
        f.render_widget(gauge, gauge_area);
    }
}

fn render_timer(
    game: &BobaGame,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
    narrow: bool,
) {
    let timer = &game.timer;
    let color = match timer.mode {
        TimerMode::Focus => Color::LightRed,
        TimerMode::Break => Color::LightGreen,
    };

    let mut cl = ClickableList::new();
    let status = if timer.is_running() { "running" } else { "paused" };
    cl.push(Line::from(vec![
        Span::styled(
            format!(" {} ", timer.display()),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(
                "{} · {} min · {}",
                timer.mode.label(),
                timer.settings.minutes(timer.mode),
                status
            ),
            Style::default().fg(Color::Gray),
        ),
    ]));
    cl.push(Line::from(""));
    let toggle_label = if timer.is_running() { "Pause" } else { "Start" };
    cl.push_clickable(key_line('s', toggle_label, Style::default().fg(color)), TIMER_TOGGLE);
    cl.push_clickable(key_line('r', "Reset", Style::default().fg(Color::Gray)), TIMER_RESET);
    cl.push_clickable(key_line('+', "Longer", Style::default().fg(Color::Gray)), DURATION_UP);
    cl.push_clickable(key_line('-', "Shorter", Style::default().fg(Color::Gray)), DURATION_DOWN);

    let title = match timer.mode {
        TimerMode::Focus => " Focus ",
        TimerMode::Break => " Break ",
    };
    let block = panel(title, color, narrow);
    let inner = block.inner(area);
    let mut cs = click_state.borrow_mut();
    cl.register_targets_with_block(area, &block, &mut cs, 0);
    drop(cs);
    f.render_widget(Paragraph::new(cl.into_lines()).block(block), area);

    // Countdown gauge over the blank second row
    if inner.height >= 2 {
        let gauge_area = Rect::new(inner.x, inner.y + 1, inner.width, 1);
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(color).bg(Color::Black))
            .ratio(timer.progress())
            .label("");
        f.render_widget(gauge, gauge_area);
    }
}

fn render_tab_bar(
    game: &BobaGame,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let tab_style = |tab: Tab, color: Color| -> Style {
        if game.tab == tab {
            Style::default()
                .fg(Color::Black)
                .bg(color)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(color)
        }
    };

    let done = game.state.completed_challenge_ids.len();
    let mut cs = click_state.borrow_mut();
    TabBar::new(" │ ")
        .tab("Shop", tab_style(Tab::Shop, Color::Green), TAB_SHOP)
        .tab(
            format!("Challenges {}/{}", done, challenges::CHALLENGES.len()),
            tab_style(Tab::Challenges, Color::Yellow),
            TAB_CHALLENGES,
        )
        .tab("Stats", tab_style(Tab::Stats, Color::Cyan), TAB_STATS)
        .render(f, area, &mut cs);
}

fn render_shop(
    game: &BobaGame,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
    narrow: bool,
) {
    let s = &game.state;
    let mut cl = ClickableList::new();

    for (category, entries) in catalog::grouped() {
        let color = match category {
            Category::Click => Color::Yellow,
            Category::Passive => Color::Green,
            Category::Multiplier => Color::Magenta,
        };
        cl.push(Line::from(Span::styled(
            format!(" ── {} ──", category.label()),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )));
        for (index, entry) in entries {
            let affordable = can_afford(s, index);
            let style = if affordable {
                Style::default().fg(Color::White)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            let key = char::from_digit(index as u32 + 1, 10).unwrap_or(' ');
            let level = s.level(entry.id);
            let mut line = key_line(key, entry.name, style);
            line.spans.push(Span::styled(
                format!("  Lv.{}  {} boba", level, format_number(entry.next_cost(s) as f64)),
                if affordable {
                    Style::default().fg(Color::Yellow)
                } else {
                    Style::default().fg(Color::DarkGray)
                },
            ));
            if !narrow {
                line.spans.push(Span::styled(
                    format!(
                        "  → {} {}",
                        format_number(entry.next_effect(s)),
                        entry.effect_unit
                    ),
                    Style::default().fg(Color::Gray),
                ));
            }
            cl.push_clickable(line, BUY_ENTRY_BASE + index as u16);
        }
    }

    let block = panel(" Shop ", Color::Green, narrow);
    let mut cs = click_state.borrow_mut();
    cl.register_targets_with_block(area, &block, &mut cs, 0);
    drop(cs);
    f.render_widget(Paragraph::new(cl.into_lines()).block(block), area);
}

fn render_challenges(game: &BobaGame, f: &mut Frame, area: Rect, narrow: bool) {
    let mut lines: Vec<Line> = Vec::new();
    for p in challenges::progress(&game.state) {
        let c = p.challenge;
        if p.completed {
            lines.push(Line::from(vec![
                Span::styled(" ✓ ", Style::default().fg(Color::Green)),
                Span::styled(c.name, Style::default().fg(Color::Green)),
                Span::styled(
                    format!("  +{} boba", format_number(c.reward)),
                    Style::default().fg(Color::DarkGray),
                ),
            ]));
        } else {
            lines.push(Line::from(vec![
                Span::styled(" ○ ", Style::default().fg(Color::Yellow)),
                Span::styled(c.name, Style::default().fg(Color::White)),
                Span::styled(
                    format!(
                        "  {}/{} ({:.0}%)",
                        format_number(p.current.min(c.target)),
                        format_number(c.target),
                        p.fraction * 100.0
                    ),
                    Style::default().fg(Color::Yellow),
                ),
            ]));
        }
        if !narrow {
            lines.push(Line::from(Span::styled(
                format!("     {}", c.description),
                Style::default().fg(Color::DarkGray),
            )));
        }
    }

    let widget = Paragraph::new(lines).block(panel(" Challenges ", Color::Yellow, narrow));
    f.render_widget(widget, area);
}

fn render_stats(
    game: &BobaGame,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
    narrow: bool,
) {
    let s = &game.state;
    let label = Style::default().fg(Color::Gray);
    let value = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);
    let stat = |name: &str, v: String| -> Line<'static> {
        Line::from(vec![
            Span::styled(format!(" {:<16}", name), label),
            Span::styled(v, value),
        ])
    };

    let mut cl = ClickableList::new();
    cl.push(stat("Boba", format_number(s.currency)));
    cl.push(stat("Lifetime boba", format_number(s.total_earned)));
    cl.push(stat("Clicks", s.total_clicks.to_string()));
    cl.push(stat("Sessions", s.completed_sessions.to_string()));
    cl.push(stat("Per click", format_number(s.per_click_rate)));
    cl.push(stat("Per second", format_number(s.passive_rate)));
    cl.push(stat(
        "Goal",
        format!(
            "{:.0}% of {}",
            s.goal_progress() * 100.0,
            format_number(s.current_goal)
        ),
    ));
    cl.push(Line::from(""));

    let account = match game.auth.user_id() {
        Some(user) => format!("cloud ({})", user),
        None => "this browser".to_string(),
    };
    cl.push(stat("Saving to", account));
    let saved = match game.last_saved_at() {
        _ if game.sync_blocked() => "paused, progress not loaded".to_string(),
        Some(at) => format!("{}s ago", ((game.now_ms - at) / 1000.0).max(0.0).floor()),
        None => "never".to_string(),
    };
    cl.push(stat("Last save", saved));

    cl.push_clickable(key_line('w', "Save now", Style::default().fg(Color::Cyan)), SAVE_NOW);
    let reset_text = if game.reset_armed() {
        "Press again to erase everything"
    } else {
        "Reset progress"
    };
    cl.push_clickable(key_line('X', reset_text, Style::default().fg(Color::Red)), RESET_PROGRESS);

    let block = panel(" Stats ", Color::Cyan, narrow);
    let mut cs = click_state.borrow_mut();
    cl.register_targets_with_block(area, &block, &mut cs, 0);
    drop(cs);
    f.render_widget(Paragraph::new(cl.into_lines()).block(block), area);
}

fn render_log(game: &BobaGame, f: &mut Frame, area: Rect) {
    let visible_height = area.height.saturating_sub(2) as usize;

    // Newest first
    let log_lines: Vec<Line> = game
        .log
        .recent(visible_height)
        .iter()
        .rev()
        .enumerate()
        .map(|(i, entry)| {
            let style = match (entry.is_important, i < 3) {
                (true, true) => Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
                (true, false) => Style::default().fg(Color::Yellow),
                (false, true) => Style::default().fg(Color::White),
                (false, false) => Style::default().fg(Color::DarkGray),
            };
            Line::from(Span::styled(entry.text.as_str(), style))
        })
        .collect();

    let widget = Paragraph::new(log_lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Log "),
    );
    f.render_widget(widget, area);
}
