// src/app.rs
// Page state machine: session bootstrap, login, dashboard and game routing.
//
// Every network call runs on a spawned task and reports back as an `AppEvent`
// through an unbounded channel, so the UI keeps drawing while it waits.
// Game view results carry the mount generation that requested them and a
// fetch sequence number; late or out of order results are dropped.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;

use crate::clients::{ApiClient, ApiError};
use crate::game::{Game, GameFilter, GameId, GameSnapshot, User};
use crate::game_view::GameView;
use crate::logging::{log_error, log_info, log_warning};
use crate::poller::{self, PollHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Login,
    Register,
    Dashboard,
    Game,
}

impl Page {
    /// Whether the shell may go from `self` to `next`.
    pub fn allows(self, next: Page) -> bool {
        matches!(
            (self, next),
            (Page::Login, Page::Register)
                | (Page::Register, Page::Login)
                | (Page::Login | Page::Register, Page::Dashboard)
                | (Page::Dashboard, Page::Game)
                | (Page::Game, Page::Dashboard)
                | (_, Page::Login)
        )
    }
}

#[derive(Debug)]
pub enum AppEvent {
    Authenticated { result: Result<Option<User>, ApiError> },
    GamesListed { request: u64, result: Result<Vec<Game>, ApiError> },
    GameStarted { result: Result<Game, ApiError> },
    GameJoined { game_id: GameId, result: Result<Game, ApiError> },
    Snapshot { mount: u64, fetch: u64, result: Result<GameSnapshot, ApiError> },
    MoveFinished { mount: u64, result: Result<serde_json::Value, ApiError> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Username,
    Password,
}

#[derive(Debug, Clone)]
pub struct CredentialsForm {
    pub username: String,
    pub password: String,
    pub focus: Field,
    pub busy: bool,
    pub error: Option<String>,
}

impl Default for CredentialsForm {
    fn default() -> Self {
        Self {
            username: String::new(),
            password: String::new(),
            focus: Field::Username,
            busy: false,
            error: None,
        }
    }
}

impl CredentialsForm {
    pub fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            Field::Username => &mut self.username,
            Field::Password => &mut self.password,
        }
    }

    pub fn switch_focus(&mut self) {
        self.focus = match self.focus {
            Field::Username => Field::Password,
            Field::Password => Field::Username,
        };
    }

    pub fn is_complete(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub games: Vec<Game>,
    pub loading: bool,
    /// A start or join request is in flight.
    pub opening: bool,
    pub selected: usize,
    pub filter: GameFilter,
    pub error: Option<String>,
}

impl DashboardState {
    pub fn selected_game(&self) -> Option<&Game> {
        self.games.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if !self.games.is_empty() {
            self.selected = (self.selected + 1).min(self.games.len() - 1);
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }
}

struct MountedGame {
    mount: u64,
    view: GameView,
    poller: Option<PollHandle>,
    // Last fetch number handed out, shared with the poller
    fetches: Arc<AtomicU64>,
    // Fetch number of the snapshot on screen
    applied: u64,
}

/// What the current page renders.
pub enum Screen<'a> {
    Credentials { page: Page, form: &'a CredentialsForm },
    Dashboard { user: &'a User, dashboard: &'a DashboardState },
    Game { view: &'a GameView },
    Blank,
}

pub struct App {
    client: ApiClient,
    events: UnboundedSender<AppEvent>,
    poll_interval: Duration,
    page: Page,
    user: Option<User>,
    game_id: Option<GameId>,
    pub form: CredentialsForm,
    pub dashboard: DashboardState,
    mounted: Option<MountedGame>,
    mounts: u64,
    list_requests: u64,
}

async fn authenticate(
    client: &ApiClient,
    register: bool,
    username: &str,
    password: &str,
) -> Result<Option<User>, ApiError> {
    if register {
        client.register(username, password).await?;
    }
    client.login(username, password).await?;
    client.get_me().await
}

impl App {
    pub fn new(client: ApiClient, events: UnboundedSender<AppEvent>, poll_interval: Duration) -> Self {
        Self {
            client,
            events,
            poll_interval,
            page: Page::Login,
            user: None,
            game_id: None,
            form: CredentialsForm::default(),
            dashboard: DashboardState::default(),
            mounted: None,
            mounts: 0,
            list_requests: 0,
        }
    }

    pub fn page(&self) -> Page {
        self.page
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn game_id(&self) -> Option<GameId> {
        self.game_id
    }

    pub fn game_view(&self) -> Option<&GameView> {
        self.mounted.as_ref().map(|m| &m.view)
    }

    pub fn game_view_mut(&mut self) -> Option<&mut GameView> {
        self.mounted.as_mut().map(|m| &mut m.view)
    }

    fn go_to(&mut self, next: Page) -> bool {
        if !self.page.allows(next) {
            log_warning(&format!("Ignoring transition {:?} -> {:?}", self.page, next));
            return false;
        }
        if self.page == Page::Game && next != Page::Game {
            self.unmount_game();
        }
        self.page = next;
        true
    }

    pub fn screen(&self) -> Screen<'_> {
        match (self.page, self.user.as_ref(), self.game_id, self.game_view()) {
            (Page::Login | Page::Register, None, _, _) => Screen::Credentials { page: self.page, form: &self.form },
            (Page::Dashboard, Some(user), _, _) => Screen::Dashboard { user, dashboard: &self.dashboard },
            (Page::Game, Some(_), Some(_), Some(view)) => Screen::Game { view },
            _ => Screen::Blank,
        }
    }

    fn spawn_request<F>(&self, request: F)
    where
        F: std::future::Future<Output = AppEvent> + Send + 'static,
    {
        let events = self.events.clone();
        tokio::spawn(async move {
            let _ = events.send(request.await);
        });
    }

    /// Apply a network result. Returns false when it no longer applies.
    pub fn handle_event(&mut self, event: AppEvent) -> bool {
        match event {
            AppEvent::Authenticated { result } => self.finish_credentials(result),
            AppEvent::GamesListed { request, result } => self.finish_list(request, result),
            AppEvent::GameStarted { result } => {
                self.finish_open(result.map(|game| game.id).map_err(|e| format!("Could not start game: {e}")))
            }
            AppEvent::GameJoined { game_id, result } => self.finish_open(
                result.map(|_| game_id).map_err(|e| format!("Could not join game #{game_id}: {e}")),
            ),
            AppEvent::Snapshot { mount, fetch, result } => {
                let Some(mounted) = self.mounted_for(mount) else { return false };
                if fetch <= mounted.applied {
                    return false;
                }
                mounted.applied = fetch;
                mounted.view.apply_snapshot(result);
                true
            }
            AppEvent::MoveFinished { mount, result } => {
                let Some(mounted) = self.mounted_for(mount) else { return false };
                mounted.view.finish_move(result);
                true
            }
        }
    }

    // ========================================================================
    // Session
    // ========================================================================

    /// Resume a stored session, going straight to the dashboard if it is valid.
    /// Runs before the UI is up, so it waits for the game list itself.
    pub async fn bootstrap(&mut self) {
        match self.client.get_me().await {
            Ok(Some(user)) => {
                log_info(&format!("Resumed session for '{}'", user.username));
                self.user = Some(user);
                if self.go_to(Page::Dashboard) {
                    let request = self.begin_list();
                    let result = self.client.list_games(self.dashboard.filter).await;
                    self.finish_list(request, result);
                }
            }
            Ok(None) => log_info("No active session"),
            Err(e) => log_warning(&format!("Session check failed: {e}")),
        }
    }

    pub fn toggle_credentials_mode(&mut self) {
        if self.form.busy {
            return;
        }
        let next = match self.page {
            Page::Login => Page::Register,
            Page::Register => Page::Login,
            _ => return,
        };
        if self.go_to(next) {
            self.form.error = None;
        }
    }

    /// Register (on the register page) then log in with the form's credentials.
    pub fn submit_credentials(&mut self) {
        if !matches!(self.page, Page::Login | Page::Register) || self.form.busy {
            return;
        }
        self.form.error = None;
        self.form.busy = true;

        let client = self.client.clone();
        let register = self.page == Page::Register;
        let username = self.form.username.clone();
        let password = self.form.password.clone();
        self.spawn_request(async move {
            let result = authenticate(&client, register, &username, &password).await;
            AppEvent::Authenticated { result }
        });
    }

    fn finish_credentials(&mut self, result: Result<Option<User>, ApiError>) -> bool {
        if !matches!(self.page, Page::Login | Page::Register) || !self.form.busy {
            return false;
        }
        self.form.busy = false;
        match result {
            Ok(Some(user)) => {
                self.user = Some(user);
                self.form = CredentialsForm::default();
                if self.go_to(Page::Dashboard) {
                    self.refresh_games();
                }
            }
            Ok(None) => self.form.error = Some(ApiError::Login.to_string()),
            Err(e) => {
                if !e.is_auth() {
                    log_error(&format!("Sign in request failed: {e}"));
                }
                self.form.error = Some(e.to_string());
            }
        }
        true
    }

    /// Forget the session locally right away; the server is told in the background.
    pub fn logout(&mut self) {
        match self.client.begin_logout() {
            Ok(request) => {
                tokio::spawn(ApiClient::send_logout(request));
            }
            Err(e) => log_error(&format!("Could not clear session: {e}")),
        }
        self.user = None;
        self.game_id = None;
        self.form = CredentialsForm::default();
        self.dashboard = DashboardState::default();
        self.go_to(Page::Login);
    }

    // ========================================================================
    // Dashboard
    // ========================================================================

    fn begin_list(&mut self) -> u64 {
        self.list_requests += 1;
        self.dashboard.loading = true;
        self.list_requests
    }

    pub fn refresh_games(&mut self) {
        if self.page != Page::Dashboard || self.user.is_none() {
            return;
        }
        let request = self.begin_list();
        let client = self.client.clone();
        let filter = self.dashboard.filter;
        self.spawn_request(async move {
            let result = client.list_games(filter).await;
            AppEvent::GamesListed { request, result }
        });
    }

    // Only the newest list request counts
    fn finish_list(&mut self, request: u64, result: Result<Vec<Game>, ApiError>) -> bool {
        if request != self.list_requests || self.page != Page::Dashboard {
            return false;
        }
        match result {
            Ok(games) => {
                self.dashboard.games = games;
                self.dashboard.error = None;
            }
            Err(e) => {
                log_warning(&format!("Could not list games: {e}"));
                self.dashboard.games.clear();
            }
        }
        self.dashboard.selected = self.dashboard.selected.min(self.dashboard.games.len().saturating_sub(1));
        self.dashboard.loading = false;
        true
    }

    pub fn toggle_filter(&mut self, only_open: bool, only_mine: bool) {
        let filter = &mut self.dashboard.filter;
        filter.only_open ^= only_open;
        filter.only_mine ^= only_mine;
        self.dashboard.selected = 0;
        self.refresh_games();
    }

    pub fn start_game(&mut self) {
        if self.page != Page::Dashboard || self.dashboard.opening {
            return;
        }
        self.dashboard.opening = true;
        self.dashboard.error = None;
        let client = self.client.clone();
        self.spawn_request(async move {
            let result = client.start_game().await;
            AppEvent::GameStarted { result }
        });
    }

    pub fn join_game(&mut self, game_id: GameId) {
        if self.page != Page::Dashboard || self.dashboard.opening {
            return;
        }
        self.dashboard.opening = true;
        self.dashboard.error = None;
        let client = self.client.clone();
        self.spawn_request(async move {
            let result = client.join_game(game_id).await;
            AppEvent::GameJoined { game_id, result }
        });
    }

    fn finish_open(&mut self, result: Result<GameId, String>) -> bool {
        if self.page != Page::Dashboard || !self.dashboard.opening {
            return false;
        }
        self.dashboard.opening = false;
        match result {
            Ok(game_id) => self.enter_game(game_id),
            Err(message) => self.dashboard.error = Some(message),
        }
        true
    }

    /// Join or enter the highlighted game, as the dashboard row offers.
    pub fn activate_selected(&mut self) {
        let Some(user_id) = self.user.as_ref().map(|u| u.id) else { return };
        let Some(game) = self.dashboard.selected_game() else { return };
        let game_id = game.id;
        if game.is_joinable_by(user_id) {
            self.join_game(game_id);
        } else {
            self.enter_game(game_id);
        }
    }

    // ========================================================================
    // Game
    // ========================================================================

    /// Open a game without joining it.
    pub fn enter_game(&mut self, game_id: GameId) {
        if self.user.is_none() || !self.go_to(Page::Game) {
            return;
        }
        self.game_id = Some(game_id);
        self.mount_game(game_id);
    }

    pub fn back_to_dashboard(&mut self) {
        if self.page != Page::Game {
            return;
        }
        self.game_id = None;
        if self.go_to(Page::Dashboard) {
            self.refresh_games();
        }
    }

    fn mounted_for(&mut self, mount: u64) -> Option<&mut MountedGame> {
        self.mounted.as_mut().filter(|m| m.mount == mount)
    }

    fn mount_game(&mut self, game_id: GameId) {
        self.unmount_game();
        let Some(user) = self.user.clone() else { return };
        self.mounts += 1;
        let mut mounted = MountedGame {
            mount: self.mounts,
            view: GameView::new(game_id, user),
            poller: None,
            fetches: Arc::new(AtomicU64::new(0)),
            applied: 0,
        };
        mounted.poller = Some(self.spawn_poller(&mounted));
        log_info(&format!("Opened game #{game_id}"));
        self.mounted = Some(mounted);
    }

    fn unmount_game(&mut self) {
        if let Some(mounted) = self.mounted.take() {
            if let Some(poller) = &mounted.poller {
                poller.stop();
            }
            log_info(&format!("Closed game #{}", mounted.view.game_id));
        }
    }

    fn spawn_poller(&self, mounted: &MountedGame) -> PollHandle {
        let (mount, game_id) = (mounted.mount, mounted.view.game_id);
        let fetches = Arc::clone(&mounted.fetches);
        let client = self.client.clone();
        let events = self.events.clone();
        poller::start(
            self.poll_interval,
            move || {
                let client = client.clone();
                let fetch = fetches.fetch_add(1, Ordering::SeqCst) + 1;
                async move { (fetch, client.get_game_snapshot(game_id).await) }
            },
            move |(fetch, result)| {
                let _ = events.send(AppEvent::Snapshot { mount, fetch, result });
            },
        )
    }

    /// Fetch once, outside the polling schedule.
    pub fn refresh_game(&mut self) {
        let Some(mounted) = self.mounted.as_mut() else { return };
        mounted.view.begin_fetch();
        let (mount, game_id) = (mounted.mount, mounted.view.game_id);
        let fetch = mounted.fetches.fetch_add(1, Ordering::SeqCst) + 1;
        let client = self.client.clone();
        self.spawn_request(async move {
            let result = client.get_game_snapshot(game_id).await;
            AppEvent::Snapshot { mount, fetch, result }
        });
    }

    /// Pause or resume polling; fetched data stays on screen either way.
    pub fn toggle_auto_refresh(&mut self) {
        let Some(mut mounted) = self.mounted.take() else { return };
        if mounted.view.toggle_auto_refresh() {
            mounted.poller = Some(self.spawn_poller(&mounted));
        } else if let Some(poller) = mounted.poller.take() {
            poller.stop();
        }
        self.mounted = Some(mounted);
    }

    pub fn submit_move(&mut self, cell: usize) {
        let Some(mounted) = self.mounted.as_mut() else { return };
        if !mounted.view.try_begin_move(cell) {
            return;
        }
        let (mount, game_id) = (mounted.mount, mounted.view.game_id);
        let client = self.client.clone();
        self.spawn_request(async move {
            let result = client.make_move(game_id, cell).await;
            AppEvent::MoveFinished { mount, result }
        });
    }
}
