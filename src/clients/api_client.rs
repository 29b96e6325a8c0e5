// src/clients/api_client.rs
// HTTP API client for the tic tac toe game service

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, RequestBuilder};

use super::common::{
    read_json, JoinGameRequest, LoginForm, LoginResponse, MoveRequest, RegisterRequest,
};
use super::error::ApiError;
use super::session::SessionStore;
use crate::defs::SESSION_HEADER;
use crate::game::{Game, GameFilter, GameId, GameSnapshot, GameState, Move, User};
use crate::logging::{log_info, log_warning};

/// Thin wrapper around the service's REST endpoints.
///
/// Cloning is cheap: the HTTP client and the session store are shared.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
    session: Arc<dyn SessionStore>,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration, session: Arc<dyn SessionStore>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .cookie_store(true)
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // Every request carries the session header when a token is stored
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{path}", self.base_url);
        let builder = self.http.request(method, url);
        match self.session.get() {
            Some(token) => builder.header(SESSION_HEADER, token),
            None => builder,
        }
    }

    // ========================================================================
    // Account & Session
    // ========================================================================

    /// Create an account.
    pub async fn register(&self, username: &str, password: &str) -> Result<serde_json::Value, ApiError> {
        let response = self
            .request(Method::POST, "/register")
            .json(&RegisterRequest { username, password })
            .send()
            .await?;

        if !response.status().is_success() {
            log_warning(&format!("Registration of '{username}' refused: {}", response.status()));
            return Err(ApiError::Registration);
        }
        Ok(response.json().await?)
    }

    /// Log in and store the issued session token.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let form = LoginForm { username, password, grant_type: "password" };
        let response = self.request(Method::POST, "/login").form(&form).send().await?;

        let status = response.status();
        let body: serde_json::Value = response.json().await.unwrap_or(serde_json::Value::Null);
        let token = body
            .get("session_token")
            .and_then(|t| t.as_str())
            .filter(|t| !t.is_empty());

        match token {
            Some(token) if status.is_success() => {
                self.session.set(token)?;
                log_info(&format!("Logged in as '{username}'"));
                Ok(LoginResponse { session_token: token.to_string() })
            }
            _ => {
                log_warning(&format!("Login of '{username}' failed: {status}"));
                Err(ApiError::Login)
            }
        }
    }

    /// Invalidate the session on the server and forget the local token.
    ///
    /// The local token is cleared whatever happens to the request; server
    /// side failures are only logged.
    pub async fn logout(&self) -> Result<(), ApiError> {
        let request = self.begin_logout()?;
        Self::send_logout(request).await;
        Ok(())
    }

    /// Forget the local token now. Returns the `/logout` request, still
    /// carrying the old token, for the caller to send.
    pub fn begin_logout(&self) -> Result<RequestBuilder, ApiError> {
        let request = self.request(Method::POST, "/logout");
        self.session.clear()?;
        Ok(request)
    }

    pub async fn send_logout(request: RequestBuilder) {
        match request.send().await {
            Ok(response) if !response.status().is_success() => {
                log_warning(&format!("Logout returned status: {}", response.status()));
            }
            Ok(_) => log_info("Logged out"),
            Err(e) => log_warning(&format!("Logout request failed: {e}")),
        }
    }

    /// Current user, or `None` when the service does not recognise the session.
    pub async fn get_me(&self) -> Result<Option<User>, ApiError> {
        let response = self.request(Method::GET, "/me").send().await?;
        if !response.status().is_success() {
            return Ok(None);
        }
        Ok(Some(response.json().await?))
    }

    // ========================================================================
    // Games
    // ========================================================================

    pub async fn list_games(&self, filter: GameFilter) -> Result<Vec<Game>, ApiError> {
        let params = filter.query_pairs();
        let mut builder = self.request(Method::GET, "/games");
        if !params.is_empty() {
            builder = builder.query(&params);
        }
        read_json(builder.send().await?).await
    }

    /// Create a new open game with the caller as X.
    pub async fn start_game(&self) -> Result<Game, ApiError> {
        let response = self.request(Method::POST, "/games").send().await?;
        read_json(response).await
    }

    /// Take the O seat of an open game.
    pub async fn join_game(&self, game_id: GameId) -> Result<Game, ApiError> {
        let response = self
            .request(Method::POST, "/games/join")
            .json(&JoinGameRequest { game_id })
            .send()
            .await?;
        read_json(response).await
    }

    pub async fn get_game_detail(&self, game_id: GameId) -> Result<Game, ApiError> {
        let response = self.request(Method::GET, &format!("/games/{game_id}")).send().await?;
        read_json(response).await
    }

    pub async fn get_move_history(&self, game_id: GameId) -> Result<Vec<Move>, ApiError> {
        let response = self
            .request(Method::GET, &format!("/games/{game_id}/move_history"))
            .send()
            .await?;
        read_json(response).await
    }

    pub async fn get_game_state(&self, game_id: GameId) -> Result<GameState, ApiError> {
        let response = self
            .request(Method::GET, &format!("/games/{game_id}/state"))
            .send()
            .await?;
        read_json(response).await
    }

    /// Detail, history and state fetched concurrently.
    pub async fn get_game_snapshot(&self, game_id: GameId) -> Result<GameSnapshot, ApiError> {
        let (game, moves, state) = tokio::try_join!(
            self.get_game_detail(game_id),
            self.get_move_history(game_id),
            self.get_game_state(game_id),
        )?;
        Ok(GameSnapshot { game, moves, state })
    }

    /// Propose a move; the service alone decides whether it is legal.
    pub async fn make_move(&self, game_id: GameId, position: usize) -> Result<serde_json::Value, ApiError> {
        let response = self
            .request(Method::POST, &format!("/games/{game_id}/move"))
            .json(&MoveRequest { position })
            .send()
            .await?;

        match read_json(response).await {
            Err(ApiError::Status { status, detail }) => {
                let reason = detail.unwrap_or_else(|| format!("status {status}"));
                log_warning(&format!("Move {position} in game {game_id} rejected: {reason}"));
                Err(ApiError::MoveRejected(reason))
            }
            other => other,
        }
    }
}
