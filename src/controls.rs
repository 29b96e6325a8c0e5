// src/controls.rs
// Maps key presses to app actions for each page. Actions that need the
// network start a request and return at once.

use crate::app::{App, Page};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Enter,
    Tab,
    Backspace,
    Esc,
    Up,
    Down,
    Left,
    Right,
    F(u8),
    CtrlC,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub fn handle_key(app: &mut App, key: Key) -> Flow {
    if key == Key::CtrlC {
        return Flow::Quit;
    }
    match app.page() {
        Page::Login | Page::Register => credentials_key(app, key),
        Page::Dashboard => dashboard_key(app, key),
        Page::Game => game_key(app, key),
    }
}

fn credentials_key(app: &mut App, key: Key) -> Flow {
    if app.form.busy && key != Key::Esc {
        return Flow::Continue;
    }
    match key {
        Key::Esc => return Flow::Quit,
        Key::Tab | Key::Up | Key::Down => app.form.switch_focus(),
        Key::F(2) => app.toggle_credentials_mode(),
        Key::Backspace => {
            app.form.focused_mut().pop();
        }
        Key::Char(c) if !c.is_control() => app.form.focused_mut().push(c),
        Key::Enter => {
            if app.form.is_complete() {
                app.submit_credentials();
            } else {
                app.form.error = Some("Username and password are required".to_string());
            }
        }
        _ => {}
    }
    Flow::Continue
}

fn dashboard_key(app: &mut App, key: Key) -> Flow {
    match key {
        Key::Char('q') | Key::Esc => return Flow::Quit,
        Key::Up | Key::Char('k') => app.dashboard.select_previous(),
        Key::Down | Key::Char('j') => app.dashboard.select_next(),
        Key::Enter => app.activate_selected(),
        Key::Char('n') => app.start_game(),
        Key::Char('o') => app.toggle_filter(true, false),
        Key::Char('m') => app.toggle_filter(false, true),
        Key::Char('r') | Key::F(5) => app.refresh_games(),
        Key::Char('l') => app.logout(),
        _ => {}
    }
    Flow::Continue
}

fn game_key(app: &mut App, key: Key) -> Flow {
    match key {
        Key::Char('q') => return Flow::Quit,
        Key::Char('b') | Key::Esc => app.back_to_dashboard(),
        Key::Char('l') => app.logout(),
        Key::Char('a') => app.toggle_auto_refresh(),
        Key::Char('r') | Key::F(5) => app.refresh_game(),
        Key::Char(c @ '1'..='9') => {
            let cell = c as usize - '1' as usize;
            if let Some(view) = app.game_view_mut() {
                view.cursor = cell;
            }
            app.submit_move(cell);
        }
        Key::Enter | Key::Char(' ') => {
            if let Some(cell) = app.game_view().map(|v| v.cursor) {
                app.submit_move(cell);
            }
        }
        Key::Up | Key::Down | Key::Left | Key::Right => {
            let (d_row, d_col) = match key {
                Key::Up => (-1, 0),
                Key::Down => (1, 0),
                Key::Left => (0, -1),
                _ => (0, 1),
            };
            if let Some(view) = app.game_view_mut() {
                view.move_cursor(d_row, d_col);
            }
        }
        _ => {}
    }
    Flow::Continue
}
