// src/clients/error.rs
// Error taxonomy for calls to the game service

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    /// The service refused the new account
    #[error("Registration failed")]
    Registration,

    /// Bad credentials, or a login response without a session token
    #[error("Login failed")]
    Login,

    /// Illegal move (wrong turn, occupied cell, finished game)
    #[error("{0}")]
    MoveRejected(String),

    /// Any other non-success status
    #[error("HTTP request failed with status: {status}")]
    Status { status: u16, detail: Option<String> },

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Session storage error: {0}")]
    Session(#[from] std::io::Error),
}

impl ApiError {
    pub fn is_auth(&self) -> bool {
        matches!(self, ApiError::Registration | ApiError::Login)
    }
}
