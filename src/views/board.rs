// src/views/board.rs
// 3x3 grid. Cell numbers show through empty cells so 1-9 can be typed.

use crate::board::Board;
use crate::defs::{paint, Colors, BOARD_SIDE};

pub struct BoardStyle {
    pub cursor: Option<usize>,
    pub winning: Option<[usize; 3]>,
    pub disabled: bool,
}

fn cell_text(board: &Board, index: usize, style: &BoardStyle) -> String {
    let text = match board.get(index) {
        Some(mark) => format!(" {mark} "),
        None if style.disabled => "   ".to_string(),
        None => format!(" {} ", index + 1),
    };
    let winning = style.winning.is_some_and(|line| line.contains(&index));
    let text = match board.get(index) {
        Some(_) if winning => paint(Colors::yellow(), &text),
        None if !style.disabled => paint(Colors::dim(), &text),
        _ => text,
    };
    if style.cursor == Some(index) && !style.disabled {
        paint(Colors::reverse(), &text)
    } else {
        text
    }
}

pub fn render(board: &Board, style: &BoardStyle) -> Vec<String> {
    let separator = vec!["---"; BOARD_SIDE].join("+");
    let mut lines = Vec::with_capacity(BOARD_SIDE * 2 - 1);
    for row in 0..BOARD_SIDE {
        if row > 0 {
            lines.push(separator.clone());
        }
        let cells: Vec<String> = (0..BOARD_SIDE)
            .map(|col| cell_text(board, row * BOARD_SIDE + col, style))
            .collect();
        lines.push(cells.join("|"));
    }
    lines
}
