// src/views/mod.rs
// Terminal renderers. Each view turns state into a list of lines; drawing
// them is left to the terminal module.

pub mod navbar;
pub mod login;
pub mod dashboard;
pub mod player_box;
pub mod board;
pub mod game;

use crate::app::{App, Screen};

/// Full screen for the app: navbar, then the body of the current page.
pub fn render(app: &App) -> Vec<String> {
    let mut lines = navbar::render(app.user());
    lines.push(String::new());
    lines.extend(render_body(&app.screen()));
    lines
}

pub fn render_body(screen: &Screen<'_>) -> Vec<String> {
    match screen {
        Screen::Credentials { page, form } => login::render(*page, form),
        Screen::Dashboard { user, dashboard } => dashboard::render(user, dashboard),
        Screen::Game { view } => game::render(view),
        Screen::Blank => Vec::new(),
    }
}

/// Strip ANSI colour codes, for width calculations and tests.
pub fn plain(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut chars = line.chars();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            for c in chars.by_ref() {
                if c == 'm' {
                    break;
                }
            }
        } else {
            out.push(c);
        }
    }
    out
}
