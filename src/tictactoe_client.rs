// src/tictactoe_client.rs
// Terminal client for the tic tac toe service.
//
// Interactive Controls:
// - Login: type, TAB switch field, ENTER submit, F2 login/register, ESC quit
// - Dashboard: UP/DOWN select, ENTER join/enter, n new game, o/m filters,
//   r or F5 refresh, l logout, q quit
// - Game: arrows or 1-9 pick a cell, ENTER/SPACE play, a pause/resume
//   updates, r or F5 refresh, b/ESC back, l logout, q quit
//
// CLI Options:
// - --server: override the API base URL
// - --listgames [--only-open] [--only-mine]: print the game list and exit
// - --gameid: open a game right after resuming the session
// - --newgame: start a game right after resuming the session
// - --logout: clear the stored session and exit

use std::error::Error;
use std::sync::Arc;

use clap::Parser;
use tokio::sync::mpsc;

use tictactoe::app::App;
use tictactoe::clients::{ApiClient, FileSessionStore};
use tictactoe::config::ClientConfig;
use tictactoe::controls::{self, Flow};
use tictactoe::game::{GameFilter, GameId};
use tictactoe::logging::{self, log_info, log_warning};
use tictactoe::terminal::{self, KeyReader, RawModeGuard};
use tictactoe::views;

#[derive(Parser)]
#[command(name = env!("CARGO_BIN_NAME"))]
#[command(about = "Tic Tac Toe Client - Play games on a remote tic tac toe service")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Args {
    /// API base URL (overrides config file and environment)
    #[arg(long)]
    server: Option<String>,

    /// Print the list of games and exit
    #[arg(long)]
    listgames: bool,

    /// With --listgames, only games still waiting for a second player
    #[arg(long, requires = "listgames")]
    only_open: bool,

    /// With --listgames, only games you play in
    #[arg(long, requires = "listgames")]
    only_mine: bool,

    /// Open this game after resuming the session
    #[arg(long, conflicts_with = "newgame")]
    gameid: Option<GameId>,

    /// Start a new game after resuming the session
    #[arg(long)]
    newgame: bool,

    /// Clear the stored session and exit
    #[arg(long, conflicts_with_all = ["listgames", "gameid", "newgame"])]
    logout: bool,
}

async fn list_games(client: &ApiClient, filter: GameFilter) -> Result<(), Box<dyn Error>> {
    let Some(user) = client.get_me().await? else {
        return Err("Not logged in: start the client once to sign in".into());
    };
    let games = client.list_games(filter).await?;
    if games.is_empty() {
        println!("No games found.");
    }
    for game in &games {
        println!("{}", views::dashboard::game_row(game, user.id));
    }
    Ok(())
}

async fn run_ui(mut app: App, mut events: mpsc::UnboundedReceiver<tictactoe::app::AppEvent>) -> Result<(), Box<dyn Error>> {
    let (key_tx, mut keys) = mpsc::unbounded_channel();
    let _raw = RawModeGuard::new()?;
    let _reader = KeyReader::spawn(key_tx);

    loop {
        terminal::draw(&views::render(&app))?;
        tokio::select! {
            Some(key) = keys.recv() => {
                if controls::handle_key(&mut app, key) == Flow::Quit {
                    break;
                }
            }
            Some(event) = events.recv() => {
                app.handle_event(event);
            }
            else => break,
        }
    }
    Ok(())
}

async fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let mut config = ClientConfig::load_or_default();
    if let Some(server) = args.server {
        config.api_base = Some(server);
    }

    let session = Arc::new(FileSessionStore::open(&config.session_file)?);
    let client = ApiClient::new(&config.server_url(), config.request_timeout(), session)?;

    if args.logout {
        client.logout().await?;
        println!("Logged out.");
        return Ok(());
    }
    if args.listgames {
        let filter = GameFilter { only_open: args.only_open, only_mine: args.only_mine };
        return list_games(&client, filter).await;
    }

    // From here on stdout belongs to the terminal UI
    if let Err(e) = logging::init_file(&config.log_file) {
        eprintln!("Cannot open log file {}: {e}", config.log_file);
    }
    log_info(&format!("Connecting to {}", client.base_url()));

    let (event_tx, events) = mpsc::unbounded_channel();
    let mut app = App::new(client, event_tx, config.poll_interval());
    app.bootstrap().await;

    if app.user().is_some() {
        if let Some(game_id) = args.gameid {
            app.enter_game(game_id);
        } else if args.newgame {
            app.start_game();
        }
    } else if args.gameid.is_some() || args.newgame {
        log_warning("Ignoring --gameid/--newgame: no active session");
    }

    run_ui(app, events).await
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    if let Err(e) = run(args).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
