/**
 * Board Watch Entry Point
 *
 * Logs in, loads one board and follows its push channel, logging every
 * change the store absorbs until Ctrl-C or until the board is deleted.
 */

use boardsync::client::{Config, ListenerExit, Session};
use boardsync::shared::models::UserLogin;

const USERNAME_ENV: &str = "BOARDSYNC_USERNAME";
const PASSWORD_ENV: &str = "BOARDSYNC_PASSWORD";
const BOARD_ID_ENV: &str = "BOARDSYNC_BOARD_ID";

fn required_env(name: &str) -> Result<String, Box<dyn std::error::Error>> {
    std::env::var(name).map_err(|_| format!("{} is not set", name).into())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file if present
    dotenv::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&env_filter))
        .init();

    let credentials = UserLogin {
        username: required_env(USERNAME_ENV)?,
        password: required_env(PASSWORD_ENV)?,
        remember_me: None,
    };
    let board_id: i64 = required_env(BOARD_ID_ENV)?.parse()?;

    let config = Config::from_env()?;
    tracing::info!("[STARTUP] Connecting to {}", config.server_url());
    let session = Session::new(config)?;

    let user = session.login(&credentials).await?;
    tracing::info!("[STARTUP] Logged in as {}", user.username);
    session.load_board(board_id).await?;

    let mut socket = session.connect().await;
    let exit = tokio::select! {
        exit = session.listen(&mut socket) => Some(exit),
        _ = tokio::signal::ctrl_c() => None,
    };

    match exit {
        Some(ListenerExit::BoardDeleted) => tracing::warn!("Board {} was deleted", board_id),
        Some(ListenerExit::TransportStopped) => tracing::warn!("Push channel stopped"),
        None => tracing::info!("Interrupted, shutting down"),
    }
    socket.shutdown().await;

    if let Some(board) = session.store().read().await.board.board() {
        tracing::info!(
            "Final state of '{}': {} lists, {} cards",
            board.title,
            board.lists.len(),
            board.lists.iter().map(|list| list.cards.len()).sum::<usize>()
        );
    }
    Ok(())
}
