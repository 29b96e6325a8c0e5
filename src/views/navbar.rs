// src/views/navbar.rs

use crate::defs::{paint, Colors};
use crate::game::User;

pub fn render(user: Option<&User>) -> Vec<String> {
    let brand = paint(Colors::cyan(), "Tic Tac Toe");
    let line = match user {
        Some(user) => format!("{brand}   {}   [l] Logout", paint(Colors::green(), &user.username)),
        None => brand,
    };
    vec![line, "=".repeat(40)]
}
