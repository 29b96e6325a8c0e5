// src/game.rs
// Data model for the records exchanged with the game service.

use std::fmt;

use serde::{Deserialize, Serialize};

pub type UserId = i64;
pub type GameId = i64;

/// A board letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mark {
    #[serde(rename = "X", alias = "x")]
    X,
    #[serde(rename = "O", alias = "o")]
    O,
}

impl Mark {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mark::X => "X",
            Mark::O => "O",
        }
    }

    /// Letter implied by move parity: odd move numbers belong to X.
    pub fn for_move_number(move_number: u32) -> Mark {
        if move_number % 2 == 1 { Mark::X } else { Mark::O }
    }

    pub fn parse(value: &str) -> Option<Mark> {
        match value.trim() {
            "X" | "x" => Some(Mark::X),
            "O" | "o" => Some(Mark::O),
            _ => None,
        }
    }
}

impl fmt::Display for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
}

/// Outcome recorded by the service once a game is over.
///
/// The service reports either the winning user's id or a string sentinel
/// (a draw, or a letter).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Winner {
    Player(UserId),
    Outcome(String),
}

impl Winner {
    pub fn is_draw(&self) -> bool {
        matches!(self, Winner::Outcome(s) if s.eq_ignore_ascii_case("draw"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub id: GameId,
    #[serde(default)]
    pub player_x_id: Option<UserId>,
    #[serde(default)]
    pub player_o_id: Option<UserId>,
    #[serde(default)]
    pub current_turn: Option<Mark>,
    #[serde(default)]
    pub winner: Option<Winner>,
    #[serde(default)]
    pub player_x: Option<User>,
    #[serde(default)]
    pub player_o: Option<User>,
    #[serde(default, alias = "winnerLetter")]
    pub winner_letter: Option<Mark>,
}

impl Game {
    pub fn is_finished(&self) -> bool {
        self.winner.is_some()
    }

    pub fn is_open(&self) -> bool {
        self.player_o_id.is_none()
    }

    /// Letter played by `user_id` in this game, if they are a player.
    pub fn letter_of(&self, user_id: UserId) -> Option<Mark> {
        if self.player_x_id == Some(user_id) {
            Some(Mark::X)
        } else if self.player_o_id == Some(user_id) {
            Some(Mark::O)
        } else {
            None
        }
    }

    /// Letter of the winner, from the explicit field or the winner's id.
    pub fn winning_letter(&self) -> Option<Mark> {
        if self.winner_letter.is_some() {
            return self.winner_letter;
        }
        match &self.winner {
            Some(Winner::Player(id)) => self.letter_of(*id),
            Some(Winner::Outcome(s)) => Mark::parse(s),
            None => None,
        }
    }

    /// Whether `user_id` may join: unfinished, no O player yet, not already X.
    pub fn is_joinable_by(&self, user_id: UserId) -> bool {
        self.winner.is_none() && self.player_o_id.is_none() && self.player_x_id != Some(user_id)
    }
}

/// Nested game reference some services embed in move records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveGame {
    #[serde(default)]
    pub player_x_id: Option<UserId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Move {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub game_id: GameId,
    #[serde(default)]
    pub player_id: Option<UserId>,
    pub position: usize,
    pub move_number: u32,
    #[serde(default)]
    pub game: Option<MoveGame>,
    #[serde(default, alias = "symbol")]
    pub letter: Option<Mark>,
}

impl Move {
    /// One-based (row, column) of the move on a 3x3 board.
    pub fn row_col(&self) -> (usize, usize) {
        (self.position / 3 + 1, self.position % 3 + 1)
    }
}

/// Board/turn snapshot returned by `/games/{id}/state`.
///
/// Any JSON body is accepted: cells that are not a letter read as empty and
/// fields of an unexpected shape read as unset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "serde_json::Value")]
pub struct GameState {
    pub board: Vec<Option<Mark>>,
    pub current_turn: Option<Mark>,
    pub winner: Option<Winner>,
}

impl From<serde_json::Value> for GameState {
    fn from(value: serde_json::Value) -> Self {
        let letter = |v: &serde_json::Value| v.as_str().and_then(Mark::parse);
        let board = value
            .get("board")
            .and_then(|b| b.as_array())
            .map(|cells| cells.iter().map(letter).collect())
            .unwrap_or_default();
        let winner = value
            .get("winner")
            .and_then(|w| serde_json::from_value(w.clone()).ok());
        Self {
            board,
            current_turn: value.get("current_turn").and_then(letter),
            winner,
        }
    }
}

/// Filter for the game list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GameFilter {
    pub only_open: bool,
    pub only_mine: bool,
}

impl GameFilter {
    /// Query parameters, only for the filters that are set.
    pub fn query_pairs(&self) -> Vec<(&'static str, &'static str)> {
        let mut params = Vec::new();
        if self.only_open {
            params.push(("only_open", "true"));
        }
        if self.only_mine {
            params.push(("only_mine", "true"));
        }
        params
    }
}

/// The three reads issued together on every poll tick.
#[derive(Debug, Clone, PartialEq)]
pub struct GameSnapshot {
    pub game: Game,
    pub moves: Vec<Move>,
    pub state: GameState,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_deserialize_minimal() {
        let game: Game = serde_json::from_str(
            r#"{"id": 7, "player_x_id": 1, "player_o_id": null, "current_turn": "x", "winner": null}"#,
        )
        .unwrap();
        assert_eq!(game.id, 7);
        assert_eq!(game.player_x_id, Some(1));
        assert!(game.is_open());
        assert_eq!(game.current_turn, Some(Mark::X));
        assert!(!game.is_finished());
    }

    #[test]
    fn test_winner_variants() {
        let by_id: Game = serde_json::from_str(r#"{"id": 1, "player_x_id": 3, "player_o_id": 4, "winner": 4}"#).unwrap();
        assert_eq!(by_id.winner, Some(Winner::Player(4)));
        assert_eq!(by_id.winning_letter(), Some(Mark::O));

        let draw: Game = serde_json::from_str(r#"{"id": 1, "winner": "draw"}"#).unwrap();
        assert!(draw.winner.as_ref().unwrap().is_draw());
        assert_eq!(draw.winning_letter(), None);
    }

    #[test]
    fn test_state_accepts_loose_bodies() {
        let state: GameState = serde_json::from_str(
            r#"{"board": [null, "", "x", null, "O", 3, null, null, null], "current_turn": "", "winner": null}"#,
        )
        .unwrap();
        assert_eq!(state.board.len(), 9);
        assert_eq!(state.board[2], Some(Mark::X));
        assert_eq!(state.board[4], Some(Mark::O));
        assert!(state.board.iter().enumerate().all(|(i, c)| c.is_some() == (i == 2 || i == 4)));
        assert_eq!(state.current_turn, None);
        assert_eq!(state.winner, None);

        let empty: GameState = serde_json::from_str("null").unwrap();
        assert_eq!(empty, GameState::default());

        let draw: GameState = serde_json::from_str(r#"{"board": "??", "winner": "draw", "current_turn": "O"}"#).unwrap();
        assert!(draw.board.is_empty());
        assert_eq!(draw.current_turn, Some(Mark::O));
        assert_eq!(draw.winner, Some(Winner::Outcome("draw".into())));
    }

    #[test]
    fn test_winner_letter_alias() {
        let game: Game = serde_json::from_str(r#"{"id": 1, "winner": 9, "winnerLetter": "X"}"#).unwrap();
        assert_eq!(game.winning_letter(), Some(Mark::X));
    }

    #[test]
    fn test_is_joinable_by() {
        let game = Game {
            id: 1,
            player_x_id: Some(10),
            player_o_id: None,
            current_turn: Some(Mark::X),
            winner: None,
            player_x: None,
            player_o: None,
            winner_letter: None,
        };
        assert!(game.is_joinable_by(11));
        assert!(!game.is_joinable_by(10));

        let finished = Game { winner: Some(Winner::Outcome("draw".into())), ..game };
        assert!(!finished.is_joinable_by(11));
    }

    #[test]
    fn test_move_row_col() {
        let mv: Move = serde_json::from_str(r#"{"id": 1, "game_id": 2, "player_id": 3, "position": 5, "move_number": 1}"#).unwrap();
        assert_eq!(mv.row_col(), (2, 3));
        assert_eq!(mv.letter, None);
    }

    #[test]
    fn test_filter_query_pairs() {
        assert!(GameFilter::default().query_pairs().is_empty());
        let filter = GameFilter { only_open: true, only_mine: true };
        assert_eq!(filter.query_pairs(), vec![("only_open", "true"), ("only_mine", "true")]);
    }

    #[test]
    fn test_mark_parity() {
        assert_eq!(Mark::for_move_number(1), Mark::X);
        assert_eq!(Mark::for_move_number(2), Mark::O);
        assert_eq!(Mark::for_move_number(9), Mark::X);
    }
}
