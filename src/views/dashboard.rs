// src/views/dashboard.rs
// Game list with filters.

use crate::app::DashboardState;
use crate::defs::{paint, Colors};
use crate::game::{Game, Mark, User, UserId};

pub fn status_label(game: &Game) -> String {
    if game.is_finished() {
        "Finished".to_string()
    } else if game.is_open() {
        "Open".to_string()
    } else {
        match game.current_turn {
            Some(mark) => format!("{mark}'s turn"),
            None => "In progress".to_string(),
        }
    }
}

pub fn action_label(game: &Game, user_id: UserId) -> &'static str {
    if game.is_joinable_by(user_id) { "Join" } else { "Enter" }
}

fn player_name(player: &Option<User>, id: Option<UserId>) -> String {
    match (player, id) {
        (Some(user), _) => user.username.clone(),
        (None, Some(id)) => format!("user {id}"),
        (None, None) => "-".to_string(),
    }
}

/// One uncoloured row, also used by the `--listgames` output.
pub fn game_row(game: &Game, user_id: UserId) -> String {
    let mine = game.letter_of(user_id);
    let marker = |mark: Mark| if mine == Some(mark) { "*" } else { " " };
    format!(
        "#{:<5} X{} {:<12} O{} {:<12} {:<12} [{}]",
        game.id,
        marker(Mark::X),
        player_name(&game.player_x, game.player_x_id),
        marker(Mark::O),
        player_name(&game.player_o, game.player_o_id),
        status_label(game),
        action_label(game, user_id),
    )
}

fn filter_line(state: &DashboardState) -> String {
    let check = |on: bool| if on { "x" } else { " " };
    format!(
        "[{}] (o) only open   [{}] (m) only mine",
        check(state.filter.only_open),
        check(state.filter.only_mine)
    )
}

pub fn render(user: &User, state: &DashboardState) -> Vec<String> {
    let mut lines = vec![format!("Welcome, {}!", user.username), String::new(), filter_line(state), String::new()];

    if state.loading {
        lines.push(paint(Colors::dim(), "Loading games..."));
    } else if state.games.is_empty() {
        lines.push("No games found.".to_string());
    } else {
        for (index, game) in state.games.iter().enumerate() {
            let row = game_row(game, user.id);
            if index == state.selected {
                lines.push(paint(Colors::reverse(), &row));
            } else {
                lines.push(row);
            }
        }
    }

    if state.opening {
        lines.push(String::new());
        lines.push(paint(Colors::dim(), "Opening game..."));
    }
    if let Some(error) = &state.error {
        lines.push(String::new());
        lines.push(paint(Colors::red(), error));
    }
    lines.push(String::new());
    lines.push("[Enter] join/enter  [n] new game  [r] refresh  [l] logout  [q] quit".to_string());
    lines
}
