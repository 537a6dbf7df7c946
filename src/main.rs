mod games;
mod input;
mod logging;
mod time;
mod widgets;

use std::{cell::RefCell, io, rc::Rc};

use games::boba::save::{LocalStore, MemoryStore};
use games::boba::BobaGame;
use games::Game;
use input::{ClickState, InputEvent};
use ratzilla::event::{KeyCode, MouseButton, MouseEventKind};
use ratzilla::ratatui::Terminal;
use ratzilla::{DomBackend, WebRenderer};

/// Pixel position relative to the grid container, plus the grid's size.
fn grid_relative(mouse_x: u32, mouse_y: u32) -> Option<(f64, f64, f64, f64)> {
    let document = web_sys::window()?.document()?;

    // The DOM backend mounts its cell grid as the first div under body.
    let grid = document.query_selector("body > div").ok()??;
    let rect = grid.get_bounding_client_rect();

    Some((
        mouse_x as f64 - rect.left(),
        mouse_y as f64 - rect.top(),
        rect.width(),
        rect.height(),
    ))
}

#[cfg(target_arch = "wasm32")]
fn open_local_store() -> Box<dyn LocalStore> {
    match games::boba::save::WebLocalStorage::open() {
        Some(storage) => Box::new(storage),
        None => {
            log::warn!("[LOAD] localStorage unavailable, progress will not survive a reload");
            Box::new(MemoryStore::new())
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn open_local_store() -> Box<dyn LocalStore> {
    Box::new(MemoryStore::new())
}

fn main() -> io::Result<()> {
    console_error_panic_hook::set_once();
    logging::init();

    let game = Rc::new(RefCell::new(BobaGame::new(
        open_local_store(),
        None,
        js_sys::Date::now(),
    )));
    let click_state = Rc::new(RefCell::new(ClickState::new()));
    let backend = DomBackend::new()?;
    let terminal = Terminal::new(backend)?;

    // Taps: pixel position -> cell -> registered action.
    terminal.on_mouse_event({
        let game = game.clone();
        let click_state = click_state.clone();
        move |mouse_event| {
            let pressed = mouse_event.event == MouseEventKind::Pressed
                && mouse_event.button == MouseButton::Left;
            if !pressed {
                return;
            }
            // click_state must be released before the game is borrowed.
            let action = grid_relative(mouse_event.x, mouse_event.y)
                .and_then(|(x, y, w, h)| click_state.borrow().resolve_pixel(x, y, w, h));
            if let Some(id) = action {
                game.borrow_mut()
                    .handle_input(&InputEvent::Click(id), js_sys::Date::now());
            }
        }
    });

    terminal.on_key_event({
        let game = game.clone();
        move |key_event| {
            if let KeyCode::Char(c) = key_event.code {
                game.borrow_mut()
                    .handle_input(&InputEvent::Key(c), js_sys::Date::now());
            }
        }
    });

    terminal.draw_web({
        let click_state = click_state.clone();
        move |f| {
            let area = f.area();
            {
                let mut cs = click_state.borrow_mut();
                cs.terminal_cols = area.width;
                cs.terminal_rows = area.height;
                cs.clear_targets();
            }
            let mut boba = game.borrow_mut();
            boba.update(js_sys::Date::now());
            boba.render(f, area, &click_state);
        }
    });

    Ok(())
}
