// src/clients/common.rs
// Request/response structures and HTTP helpers shared by the API client

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::error::ApiError;

// ============================================================================
// Request/Response Structures
// ============================================================================

/// Account creation request
#[derive(Debug, Serialize)]
pub struct RegisterRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Form body for `/login`
#[derive(Debug, Serialize)]
pub struct LoginForm<'a> {
    pub username: &'a str,
    pub password: &'a str,
    pub grant_type: &'a str,
}

/// Successful login
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginResponse {
    pub session_token: String,
}

#[derive(Debug, Serialize)]
pub struct JoinGameRequest {
    pub game_id: i64,
}

#[derive(Debug, Serialize)]
pub struct MoveRequest {
    pub position: usize,
}

// ============================================================================
// HTTP Utilities
// ============================================================================

/// Pulls a human readable reason out of an error body.
///
/// Accepts `{"detail": "..."}` and `{"error": "..."}`; anything else yields `None`.
pub fn error_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["detail", "error"]
        .iter()
        .find_map(|key| value.get(key).and_then(|v| v.as_str()))
        .map(str::to_string)
}

/// Decode a success body, or turn the status and body into an error.
pub async fn read_json<T>(response: reqwest::Response) -> Result<T, ApiError>
where
    T: DeserializeOwned,
{
    let status = response.status();
    if status.is_success() {
        Ok(response.json().await?)
    } else {
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::Status {
            status: status.as_u16(),
            detail: error_detail(&body),
        })
    }
}
