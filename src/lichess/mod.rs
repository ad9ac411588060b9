//! Lichess: single entities over JSON, game lists and rosters over NDJSON.

mod format;
mod raw;

use tracing::{debug, instrument};

use crate::error::{deliver, CallbackResult, ChessError, Result};
use crate::model::{Game, GameParams, Profile, Tournament};
use crate::transport::Transport;
use raw::{LichessGame, LichessUser};

#[instrument(skip(transport))]
pub(crate) async fn get_profile(transport: &Transport, base: &str, username: &str) -> Result<Profile> {
    let url = format!("{base}/api/user/{username}");
    let user: LichessUser = transport.get_json(&url).await?;
    format::format_profile(&user)
}

#[instrument(skip(transport))]
pub(crate) async fn get_arena(transport: &Transport, base: &str, id: &str) -> Result<Tournament> {
    get_tournament(transport, &format!("{base}/api/tournament/{id}")).await
}

#[instrument(skip(transport))]
pub(crate) async fn get_swiss(transport: &Transport, base: &str, id: &str) -> Result<Tournament> {
    get_tournament(transport, &format!("{base}/api/swiss/{id}")).await
}

async fn get_tournament(transport: &Transport, url: &str) -> Result<Tournament> {
    let json: serde_json::Value = transport.get_json(url).await?;
    format::format_tournament(json)
}

#[instrument(skip(transport, callback))]
pub(crate) async fn get_player_games(
    transport: &Transport,
    base: &str,
    username: &str,
    params: &GameParams,
    callback: impl FnMut(Game) -> CallbackResult,
) -> Result<()> {
    let url = format!("{base}/api/games/user/{username}");
    stream_games(transport, &url, params, callback).await
}

#[instrument(skip(transport, callback))]
pub(crate) async fn get_arena_games(
    transport: &Transport,
    base: &str,
    id: &str,
    params: &GameParams,
    callback: impl FnMut(Game) -> CallbackResult,
) -> Result<()> {
    let url = format!("{base}/api/tournament/{id}/games");
    stream_games(transport, &url, params, callback).await
}

#[instrument(skip(transport, callback))]
pub(crate) async fn get_swiss_games(
    transport: &Transport,
    base: &str,
    id: &str,
    params: &GameParams,
    callback: impl FnMut(Game) -> CallbackResult,
) -> Result<()> {
    let url = format!("{base}/api/swiss/{id}/games");
    stream_games(transport, &url, params, callback).await
}

/// Deliver each game of an NDJSON export as soon as its line arrives.
///
/// Filters travel upstream in the query string; nothing is filtered here.
async fn stream_games(
    transport: &Transport,
    url: &str,
    params: &GameParams,
    mut callback: impl FnMut(Game) -> CallbackResult,
) -> Result<()> {
    let url = with_query(url, &params.to_query_pairs())?;
    let mut stream = transport.get_ndjson(&url).await?;

    let mut count = 0usize;
    while let Some(game) = stream.next::<LichessGame>().await? {
        deliver(&mut callback, format::format_game(&game)?)?;
        count += 1;
    }

    debug!(count, %url, "streamed lichess games");
    Ok(())
}

/// Fetch one game by the id taken from its URL.
///
/// The 12-character id of a player-specific link is cut down to the game's
/// own 8 characters.
#[instrument(skip(transport))]
pub(crate) async fn get_game(transport: &Transport, base: &str, id: &str) -> Result<Game> {
    let id = normalize_game_id(id)?;
    let url = with_query(
        &format!("{base}/game/export/{id}"),
        &[("pgnInJson", "true".to_string()), ("clocks", "true".to_string())],
    )?;
    let game: LichessGame = transport.get_json(&url).await?;
    format::format_game(&game)
}

pub(crate) fn normalize_game_id(id: &str) -> Result<&str> {
    match id.len() {
        8 => Ok(id),
        12 if id.is_char_boundary(8) => Ok(&id[..8]),
        _ => Err(ChessError::InvalidGameId(id.to_string())),
    }
}

#[instrument(skip(transport, callback))]
pub(crate) async fn get_team_members(
    transport: &Transport,
    base: &str,
    team: &str,
    mut callback: impl FnMut(Profile) -> CallbackResult,
) -> Result<()> {
    let url = format!("{base}/api/team/{team}/users");
    let mut stream = transport.get_ndjson(&url).await?;

    let mut count = 0usize;
    while let Some(user) = stream.next::<LichessUser>().await? {
        deliver(&mut callback, format::format_profile(&user)?)?;
        count += 1;
    }

    debug!(count, team, "streamed lichess team members");
    Ok(())
}

fn with_query(url: &str, pairs: &[(&'static str, String)]) -> Result<String> {
    if pairs.is_empty() {
        return Ok(url.to_string());
    }

    let mut parsed = reqwest::Url::parse(url).map_err(|_| ChessError::InvalidUrl {
        url: url.to_string(),
        expected: "Invalid base URL",
    })?;
    parsed.query_pairs_mut().extend_pairs(pairs);
    Ok(parsed.into())
}
