// src/game_view.rs
// State behind the game screen: last snapshot, pending move, derived board.

use crate::board::Board;
use crate::clients::ApiError;
use crate::defs::{BOARD_SIDE, CELL_COUNT};
use crate::game::{Game, GameId, GameSnapshot, GameState, Mark, Move, User, Winner};

pub const FETCH_ERROR: &str = "Could not load game data";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    InProgress,
    YouWin,
    YouLose,
    Draw,
    /// Sentinel winner the client has no special wording for.
    Other(String),
}

/// One player's panel next to the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerPanel {
    pub label: &'static str,
    pub name: String,
    pub active: bool,
    pub winner: bool,
    pub highlight: bool,
}

impl PlayerPanel {
    pub fn is_waiting(&self) -> bool {
        self.name == "waiting"
    }
}

#[derive(Debug, Clone)]
pub struct GameView {
    pub game_id: GameId,
    pub user: User,
    pub game: Option<Game>,
    pub moves: Vec<Move>,
    pub state: Option<GameState>,
    pub fetching: bool,
    pub error: Option<String>,
    pub move_pending: bool,
    pub auto_refresh: bool,
    pub cursor: usize,
}

impl GameView {
    pub fn new(game_id: GameId, user: User) -> Self {
        Self {
            game_id,
            user,
            game: None,
            moves: Vec::new(),
            state: None,
            fetching: true,
            error: None,
            move_pending: false,
            auto_refresh: true,
            cursor: CELL_COUNT / 2,
        }
    }

    pub fn begin_fetch(&mut self) {
        self.fetching = true;
    }

    /// Apply one poll tick. A failure keeps whatever was shown before.
    pub fn apply_snapshot(&mut self, result: Result<GameSnapshot, ApiError>) {
        self.fetching = false;
        match result {
            Ok(snapshot) => {
                self.game = Some(snapshot.game);
                self.moves = snapshot.moves;
                self.state = Some(snapshot.state);
                self.error = None;
            }
            Err(_) => self.error = Some(FETCH_ERROR.to_string()),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.fetching && self.game.is_none()
    }

    pub fn board(&self) -> Board {
        let x_id = self.game.as_ref().and_then(|g| g.player_x_id);
        Board::from_moves(&self.moves, x_id)
    }

    pub fn winning_cells(&self) -> Option<[usize; 3]> {
        self.board().winning_line()
    }

    /// Turn from the game record, else from the last `/state` body.
    pub fn current_turn(&self) -> Option<Mark> {
        self.game
            .as_ref()
            .and_then(|g| g.current_turn)
            .or_else(|| self.state.as_ref().and_then(|s| s.current_turn))
    }

    pub fn my_letter(&self) -> Option<Mark> {
        self.game.as_ref().and_then(|g| g.letter_of(self.user.id))
    }

    pub fn can_move(&self) -> bool {
        match &self.game {
            Some(game) => {
                game.winner.is_none() && self.my_letter().is_some() && self.current_turn() == self.my_letter()
            }
            None => false,
        }
    }

    /// Marks a move as in flight. Returns false, and changes nothing, when
    /// the move is not allowed or another one is still pending.
    pub fn try_begin_move(&mut self, cell: usize) -> bool {
        if !self.can_move() || !self.board().is_empty_cell(cell) || self.move_pending {
            return false;
        }
        self.move_pending = true;
        self.error = None;
        true
    }

    /// The board itself only changes on the next poll.
    pub fn finish_move(&mut self, result: Result<serde_json::Value, ApiError>) {
        self.move_pending = false;
        if let Err(e) = result {
            let reason = match &e {
                ApiError::MoveRejected(reason) => reason.clone(),
                other => other.to_string(),
            };
            self.error = Some(format!("Move failed: {reason}"));
        }
    }

    pub fn toggle_auto_refresh(&mut self) -> bool {
        self.auto_refresh = !self.auto_refresh;
        self.auto_refresh
    }

    pub fn move_cursor(&mut self, d_row: isize, d_col: isize) {
        let side = BOARD_SIDE as isize;
        let row = (self.cursor as isize / side + d_row).rem_euclid(side);
        let col = (self.cursor as isize % side + d_col).rem_euclid(side);
        self.cursor = (row * side + col) as usize;
    }

    pub fn outcome(&self) -> Outcome {
        match self.game.as_ref().and_then(|g| g.winner.as_ref()) {
            None => Outcome::InProgress,
            Some(Winner::Player(id)) if *id == self.user.id => Outcome::YouWin,
            Some(Winner::Player(_)) => Outcome::YouLose,
            Some(w) if w.is_draw() => Outcome::Draw,
            Some(Winner::Outcome(s)) => Outcome::Other(s.clone()),
        }
    }

    pub fn status_line(&self) -> String {
        let turn = self.current_turn().map_or("", |m| m.as_str());
        match self.outcome() {
            Outcome::InProgress => {
                if self.can_move() {
                    format!("Your turn ({turn})")
                } else if self.current_turn().is_some() && self.current_turn() == self.my_letter() {
                    "Waiting...".to_string()
                } else {
                    format!("Waiting for {turn}")
                }
            }
            Outcome::YouWin => "Game Over: You win!".to_string(),
            Outcome::YouLose => "Game Over: You lose!".to_string(),
            Outcome::Draw => "Game Over: Draw".to_string(),
            Outcome::Other(s) => format!("Game Over: Win: {s}"),
        }
    }

    pub fn player_panels(&self) -> Option<[PlayerPanel; 2]> {
        let game = self.game.as_ref()?;
        let turn = self.current_turn();
        let winner = game.winning_letter();
        let mine = self.my_letter();
        let panel = |label, player: &Option<User>, letter| PlayerPanel {
            label,
            name: player.as_ref().map_or_else(|| "waiting".to_string(), |u| u.username.clone()),
            active: turn == Some(letter),
            winner: winner == Some(letter),
            highlight: mine == Some(letter),
        };
        Some([
            panel("Player X", &game.player_x, Mark::X),
            panel("Player O", &game.player_o, Mark::O),
        ])
    }

    /// "X moved to [row,col] #n" for each recorded move.
    pub fn history_lines(&self) -> Vec<(Mark, String)> {
        let x_id = self.game.as_ref().and_then(|g| g.player_x_id);
        self.moves
            .iter()
            .map(|mv| {
                let letter = if mv.player_id.is_some() && mv.player_id == x_id { Mark::X } else { Mark::O };
                let (row, col) = mv.row_col();
                (letter, format!("{letter} moved to [{row},{col}] #{}", mv.move_number))
            })
            .collect()
    }
}
