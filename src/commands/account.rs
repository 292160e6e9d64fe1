//! Account commands: connect, disconnect and boards

use super::open_storage;
use crate::config::Config;
use crate::error::{PinforgeError, Result};
use crate::models::{Board, PinterestUser};
use crate::proxy::ProxyClient;
use crate::storage::UserStore;

use colored::Colorize;
use prettytable::{format, Table};
use std::time::Duration;

fn proxy_client(config: &Config) -> Result<ProxyClient> {
    ProxyClient::new(
        config.proxy.endpoint.clone(),
        Duration::from_secs(config.pinterest.timeout_seconds),
    )
}

/// Build the user record for a verified token
///
/// The default board is `board_id` when given, otherwise the first board.
pub fn connected_user(
    username: &str,
    token: &str,
    board_id: Option<String>,
    boards: &[Board],
) -> Result<PinterestUser> {
    let board_id = match board_id {
        Some(id) => {
            if !boards.iter().any(|b| b.id == id) {
                tracing::warn!("Board {} was not in the account's board list", id);
            }
            id
        }
        None => boards
            .first()
            .map(|b| b.id.clone())
            .ok_or_else(|| PinforgeError::Config("The account has no boards".to_string()))?,
    };

    let names = boards.iter().map(|b| b.name.clone()).collect();
    Ok(PinterestUser::connected(username, names, token, board_id))
}

/// Verify a token through the proxy and store the connected user
pub async fn run_connect(
    config: Config,
    username: String,
    token: String,
    board_id: Option<String>,
) -> Result<()> {
    let store = UserStore::new(open_storage(&config)?);
    let proxy = proxy_client(&config)?;

    tracing::info!("Verifying Pinterest token through {}", proxy.endpoint());
    let boards = proxy.get_boards(&token).await?;
    let user = connected_user(&username, &token, board_id, &boards)?;
    store.save(&user)?;

    println!(
        "{}",
        format!(
            "Connected as {} ({} boards, default board {})",
            user.username,
            boards.len(),
            user.board_id.as_deref().unwrap_or("-")
        )
        .green()
    );
    Ok(())
}

/// Forget the connected user
pub fn run_disconnect(config: Config) -> Result<()> {
    let store = UserStore::new(open_storage(&config)?);
    store.disconnect()?;
    println!("{}", "Disconnected from Pinterest.".green());
    Ok(())
}

/// List boards using the stored token
pub async fn run_boards(config: Config) -> Result<()> {
    let store = UserStore::new(open_storage(&config)?);
    let user = store.load().ok_or(PinforgeError::NotConnected)?;
    let token = user
        .access_token
        .as_deref()
        .filter(|t| !t.is_empty())
        .ok_or(PinforgeError::NotConnected)?;

    let boards = proxy_client(&config)?.get_boards(token).await?;
    if boards.is_empty() {
        println!("{}", "No boards found.".yellow());
        return Ok(());
    }

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
    table.add_row(prettytable::row!["ID".bold(), "Name".bold(), "Default".bold()]);
    for board in boards {
        let default = if user.board_id.as_deref() == Some(board.id.as_str()) {
            "*".green()
        } else {
            "".normal()
        };
        table.add_row(prettytable::row![board.id.cyan(), board.name, default]);
    }

    println!("\nPinterest Boards:");
    table.printstd();
    println!();
    Ok(())
}
