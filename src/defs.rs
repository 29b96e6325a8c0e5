// src/defs.rs
// Shared constants for the tic tac toe client.

pub const BOARD_SIDE: usize = 3;
pub const CELL_COUNT: usize = BOARD_SIDE * BOARD_SIDE;
pub const CENTER_CELL: usize = CELL_COUNT / 2;

// Rows, then columns, then diagonals. The scan order is observable.
pub const WINNING_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

pub const SESSION_HEADER: &str = "x-session-token";
pub const API_BASE_ENV: &str = "TICTACTOE_API_BASE";

pub const DEFAULT_API_HOST: &str = "localhost";
pub const DEFAULT_API_PORT: u16 = 8000;
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1750;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_SESSION_FILE: &str = "conf/session.token";
pub const DEFAULT_LOG_FILE: &str = "logs/client.log";

pub struct Colors;

impl Colors {
    pub fn green() -> &'static str { "\x1b[1;32m" }
    pub fn yellow() -> &'static str { "\x1b[1;33m" }
    pub fn red() -> &'static str { "\x1b[1;31m" }
    pub fn cyan() -> &'static str { "\x1b[1;36m" }
    pub fn magenta() -> &'static str { "\x1b[1;35m" }
    pub fn dim() -> &'static str { "\x1b[2m" }
    pub fn reverse() -> &'static str { "\x1b[7m" }
    pub fn reset() -> &'static str { "\x1b[0m" }
}

/// Wrap `text` in a colour code, resetting afterwards.
pub fn paint(color: &str, text: &str) -> String {
    format!("{color}{text}{}", Colors::reset())
}
