// src/board.rs
// Board reconstruction from a move history and three-in-a-row detection.

use crate::defs::{CELL_COUNT, CENTER_CELL, WINNING_LINES};
use crate::game::{Mark, Move, UserId};

/// A 3x3 board derived from the move history. Never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Board([Option<Mark>; CELL_COUNT]);

impl Board {
    pub fn new() -> Self {
        Board([None; CELL_COUNT])
    }

    /// Rebuilds the board from moves ordered by `move_number`.
    ///
    /// `player_x_id` is the game's X player, used when a move record does not
    /// embed its game. Out of range positions are skipped.
    pub fn from_moves(moves: &[Move], player_x_id: Option<UserId>) -> Self {
        let mut board = Board::new();
        for mv in moves {
            if mv.position >= CELL_COUNT {
                continue;
            }
            let letter = board.letter_for(mv, player_x_id);
            board.0[mv.position] = Some(letter);

            if mv.move_number == 1 {
                board.0[mv.position] = Some(Mark::X);
            }
            if mv.move_number == 2 && board.0[CENTER_CELL].is_none() {
                board.0[CENTER_CELL] = Some(Mark::O);
            }
        }
        board
    }

    // explicit letter, then existing cell, then player id, then parity
    fn letter_for(&self, mv: &Move, player_x_id: Option<UserId>) -> Mark {
        if let Some(letter) = mv.letter {
            return letter;
        }
        if let Some(existing) = self.0[mv.position] {
            return existing;
        }
        let x_id = mv.game.as_ref().and_then(|g| g.player_x_id).or(player_x_id);
        match (mv.player_id, x_id) {
            (Some(player), Some(x)) if player == x => Mark::X,
            (Some(_), Some(_)) => Mark::O,
            _ => Mark::for_move_number(mv.move_number),
        }
    }

    pub fn get(&self, index: usize) -> Option<Mark> {
        self.0.get(index).copied().flatten()
    }

    pub fn is_empty_cell(&self, index: usize) -> bool {
        index < CELL_COUNT && self.0[index].is_none()
    }

    pub fn winning_line(&self) -> Option<[usize; 3]> {
        winning_line(&self.0)
    }
}

impl From<[Option<Mark>; CELL_COUNT]> for Board {
    fn from(cells: [Option<Mark>; CELL_COUNT]) -> Self {
        Board(cells)
    }
}

/// First completed line in rows, columns, diagonals order.
pub fn winning_line(cells: &[Option<Mark>; CELL_COUNT]) -> Option<[usize; 3]> {
    WINNING_LINES.iter().copied().find(|&[a, b, c]| {
        cells[a].is_some() && cells[a] == cells[b] && cells[b] == cells[c]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::MoveGame;

    fn mv(move_number: u32, position: usize, player_id: Option<UserId>) -> Move {
        Move {
            id: move_number as i64,
            game_id: 1,
            player_id,
            position,
            move_number,
            game: None,
            letter: None,
        }
    }

    fn cells(pattern: &str) -> [Option<Mark>; CELL_COUNT] {
        let mut out = [None; CELL_COUNT];
        for (i, ch) in pattern.chars().enumerate() {
            out[i] = Mark::parse(&ch.to_string());
        }
        out
    }

    #[test]
    fn test_first_move_in_center() {
        let board = Board::from_moves(&[mv(1, 4, None)], None);
        assert_eq!(board, Board::from(cells("____X____")));
    }

    #[test]
    fn test_first_move_always_x() {
        // Player id says O, but move one is X regardless.
        let history = [mv(1, 0, Some(2))];
        let board = Board::from_moves(&history, Some(1));
        assert_eq!(board.get(0), Some(Mark::X));

        let explicit = Move { letter: Some(Mark::O), ..mv(1, 8, Some(2)) };
        assert_eq!(Board::from_moves(&[explicit], Some(1)).get(8), Some(Mark::X));
    }

    #[test]
    fn test_second_move_fills_empty_center() {
        let history = [mv(1, 0, Some(1)), mv(2, 8, Some(2))];
        let board = Board::from_moves(&history, Some(1));
        assert_eq!(board.get(0), Some(Mark::X));
        assert_eq!(board.get(8), Some(Mark::O));
        assert_eq!(board.get(CENTER_CELL), Some(Mark::O));
    }

    #[test]
    fn test_second_move_leaves_occupied_center() {
        let history = [mv(1, 4, Some(1)), mv(2, 0, Some(2))];
        let board = Board::from_moves(&history, Some(1));
        assert_eq!(board.get(4), Some(Mark::X));
        assert_eq!(board.get(0), Some(Mark::O));
    }

    #[test]
    fn test_player_id_comparison() {
        let history = [mv(1, 4, Some(1)), mv(2, 0, Some(2)), mv(3, 2, Some(2)), mv(4, 6, Some(1))];
        let board = Board::from_moves(&history, Some(1));
        assert_eq!(board.get(2), Some(Mark::O));
        assert_eq!(board.get(6), Some(Mark::X));
    }

    #[test]
    fn test_nested_game_takes_precedence() {
        let nested = Move { game: Some(MoveGame { player_x_id: Some(5) }), ..mv(3, 2, Some(5)) };
        let board = Board::from_moves(&[mv(1, 4, Some(1)), nested], Some(1));
        assert_eq!(board.get(2), Some(Mark::X));
    }

    #[test]
    fn test_parity_fallback_without_identities() {
        let history = [mv(1, 4, None), mv(2, 0, None), mv(3, 1, None), mv(4, 2, None)];
        let board = Board::from_moves(&history, None);
        assert_eq!(board, Board::from(cells("OXO_X____")));
    }

    #[test]
    fn test_existing_cell_value_is_reused() {
        let history = [mv(1, 4, Some(1)), mv(2, 0, Some(2)), mv(3, 4, Some(2))];
        let board = Board::from_moves(&history, Some(1));
        assert_eq!(board.get(4), Some(Mark::X));
    }

    #[test]
    fn test_explicit_letter_wins_over_existing() {
        let history = [mv(1, 4, Some(1)), Move { letter: Some(Mark::O), ..mv(3, 4, Some(1)) }];
        let board = Board::from_moves(&history, Some(1));
        assert_eq!(board.get(4), Some(Mark::O));
    }

    #[test]
    fn test_out_of_range_position_skipped() {
        let board = Board::from_moves(&[mv(1, 9, None), mv(2, 42, None)], None);
        assert_eq!(board, Board::new());
    }

    #[test]
    fn test_reconstruction_is_idempotent() {
        let history = [mv(1, 0, Some(1)), mv(2, 3, Some(2)), mv(3, 1, Some(1))];
        assert_eq!(Board::from_moves(&history, Some(1)), Board::from_moves(&history, Some(1)));
    }

    #[test]
    fn test_winning_line_top_row() {
        assert_eq!(winning_line(&cells("XXX______")), Some([0, 1, 2]));
    }

    #[test]
    fn test_winning_line_each_triple() {
        for line in WINNING_LINES {
            let mut board = [None; CELL_COUNT];
            for i in line {
                board[i] = Some(Mark::O);
            }
            assert_eq!(winning_line(&board), Some(line));
        }
    }

    #[test]
    fn test_winning_line_scan_order() {
        // Complete row and column both present: the row is reported.
        assert_eq!(winning_line(&cells("XXXX__X__")), Some([0, 1, 2]));
        // Column before diagonal.
        assert_eq!(winning_line(&cells("X__XX_X_X")), Some([0, 3, 6]));
    }

    #[test]
    fn test_no_winning_line() {
        assert_eq!(winning_line(&cells("_________")), None);
        assert_eq!(winning_line(&cells("XOXXOOOXX")), None);
        assert_eq!(winning_line(&cells("XXO______")), None);
    }
}
