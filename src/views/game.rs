// src/views/game.rs
// Game screen: players, board, status and move history.

use crate::defs::{paint, Colors};
use crate::game::Mark;
use crate::game_view::{GameView, Outcome};
use crate::views::board::{self, BoardStyle};
use crate::views::player_box;

fn mark_color(mark: Mark) -> &'static str {
    match mark {
        Mark::X => Colors::cyan(),
        Mark::O => Colors::magenta(),
    }
}

pub fn render(view: &GameView) -> Vec<String> {
    let mut lines = vec![format!("Game #{}", view.game_id), String::new()];

    if view.is_loading() {
        lines.push(paint(Colors::dim(), "Loading game..."));
        lines.push(String::new());
        lines.push("[b] back  [q] quit".to_string());
        return lines;
    }

    if let Some(panels) = view.player_panels() {
        let boxes: Vec<String> = panels.iter().map(player_box::render).collect();
        lines.push(boxes.join("  vs  "));
        lines.push(String::new());
    }

    let style = BoardStyle {
        cursor: Some(view.cursor),
        winning: view.winning_cells(),
        disabled: !view.can_move() || view.move_pending,
    };
    lines.extend(board::render(&view.board(), &style));
    lines.push(String::new());

    let status = view.status_line();
    lines.push(match view.outcome() {
        Outcome::InProgress if view.can_move() => paint(Colors::green(), &status),
        Outcome::InProgress => status,
        _ => paint(Colors::yellow(), &status),
    });
    if view.move_pending {
        lines.push(paint(Colors::dim(), "Sending move..."));
    }
    if let Some(error) = &view.error {
        lines.push(paint(Colors::red(), error));
    }

    lines.push(String::new());
    lines.push("Move History".to_string());
    let history = view.history_lines();
    if history.is_empty() {
        lines.push(paint(Colors::dim(), "No moves yet."));
    } else {
        lines.extend(history.into_iter().map(|(mark, line)| paint(mark_color(mark), &line)));
    }

    let refresh = if view.auto_refresh { "Pause updates" } else { "Auto-Refresh" };
    lines.push(String::new());
    lines.push(format!(
        "[arrows/1-9] pick  [Enter] play  [a] {refresh}  [r] refresh  [b] back  [l] logout  [q] quit"
    ));
    lines
}
