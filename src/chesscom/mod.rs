//! Chess.com: everything is plain JSON; games live in monthly archives.

mod format;
mod raw;

use chrono::{Datelike, NaiveDate};
use tracing::{debug, instrument};

use crate::error::{deliver, CallbackResult, ChessError, Result};
use crate::model::{Game, GameParams, Profile, Title, TitledPlayers, Tournament};
use crate::transport::Transport;
use raw::{
    ChesscomArchive, ChesscomArchives, ChesscomCallbackGame, ChesscomGame, ChesscomPlayer,
    ChesscomStats, ChesscomTitled, ChesscomTournament,
};

/// Engine accounts Chess.com publishes no titled list for.
const BOT_ACCOUNTS: [&str; 2] = ["stockfish", "computer4-impossible"];
const KOMODO_LEVELS: u32 = 25;

#[instrument(skip(transport))]
pub(crate) async fn get_profile(transport: &Transport, api: &str, username: &str) -> Result<Profile> {
    let url = format!("{api}/pub/player/{username}");
    let player: ChesscomPlayer = transport.get_json(&url).await?;

    // Closed accounts have no stats worth fetching.
    let stats = if player.status.starts_with("closed") {
        ChesscomStats::new()
    } else {
        get_stats(transport, api, username).await?
    };
    format::format_profile(&player, &stats)
}

#[instrument(skip(transport))]
pub(crate) async fn get_stats(transport: &Transport, api: &str, username: &str) -> Result<ChesscomStats> {
    let url = format!("{api}/pub/player/{username}/stats");
    transport.get_json(&url).await
}

/// Monthly archive URLs, oldest first.
#[instrument(skip(transport))]
pub(crate) async fn get_archives(transport: &Transport, api: &str, username: &str) -> Result<Vec<String>> {
    let url = format!("{api}/pub/player/{username}/games/archives");
    let archives: ChesscomArchives = transport.get_json(&url).await?;
    debug!(count = archives.archives.len(), username, "fetched archive list");
    Ok(archives.archives)
}

/// Every game of one monthly archive, in archive order.
#[instrument(skip(transport, titled))]
pub(crate) async fn get_archive(
    transport: &Transport,
    url: &str,
    titled: &TitledPlayers,
) -> Result<Vec<Game>> {
    fetch_archive(transport, url)
        .await?
        .iter()
        .map(|game| format::format_game(game, titled))
        .collect()
}

async fn fetch_archive(transport: &Transport, url: &str) -> Result<Vec<ChesscomGame>> {
    let archive: ChesscomArchive = transport.get_json(url).await?;
    Ok(archive.games)
}

/// Titled players of the requested categories, fetched one category at a time.
#[instrument(skip(transport))]
pub(crate) async fn get_titled_players(
    transport: &Transport,
    api: &str,
    titles: &[Title],
) -> Result<TitledPlayers> {
    let mut players = TitledPlayers::new();
    for title in titles {
        let url = format!("{api}/pub/titled/{title}");
        let titled: ChesscomTitled = transport.get_json(&url).await?;
        for username in &titled.players {
            players.insert(username, *title);
        }
    }

    debug!(count = players.len(), "fetched titled players");
    Ok(players)
}

/// Every published human title plus the known engine accounts.
pub(crate) async fn get_all_titled_players(transport: &Transport, api: &str) -> Result<TitledPlayers> {
    let mut players = get_titled_players(transport, api, &Title::CHESSCOM_CATEGORIES).await?;
    for bot in BOT_ACCOUNTS {
        players.insert(bot, Title::Bot);
    }
    for level in 1..=KOMODO_LEVELS {
        players.insert(&format!("komodo{level}"), Title::Bot);
    }
    Ok(players)
}

/// `since` must be epoch milliseconds; seconds are the usual mistake.
pub(crate) fn validate_since(params: &GameParams) -> Result<()> {
    match params.since {
        Some(since) if !(1_000_000_000_000..=9_999_999_999_999).contains(&since) => {
            Err(ChessError::InvalidTimestamp(since))
        }
        _ => Ok(()),
    }
}

/// Walk a player's archives newest month first, newest game first.
///
/// Only `since` and `max` are honored. Both end the whole walk: archives are
/// ordered, so nothing older can pass once `since` is violated.
#[instrument(skip(transport, callback))]
pub(crate) async fn get_player_games(
    transport: &Transport,
    api: &str,
    username: &str,
    params: &GameParams,
    mut callback: impl FnMut(Game) -> CallbackResult,
) -> Result<()> {
    validate_since(params)?;

    let archives = get_archives(transport, api, username).await?;
    let titled = get_all_titled_players(transport, api).await?;

    let mut delivered = 0u32;
    let reached_max = |delivered: u32| params.max.is_some_and(|max| delivered >= max);
    'archives: for archive_url in archives.iter().rev() {
        if reached_max(delivered) {
            break;
        }
        for game in fetch_archive(transport, archive_url).await?.iter().rev() {
            if params.since.is_some_and(|since| game.end_time * 1000 < since) {
                break 'archives;
            }

            deliver(&mut callback, format::format_game(game, &titled)?)?;
            delivered += 1;
            if reached_max(delivered) {
                break 'archives;
            }
        }
    }

    debug!(delivered, username, "walked chess.com archives");
    Ok(())
}

/// Every game of one month, in archive order.
#[instrument(skip(transport, callback))]
pub(crate) async fn get_player_games_for_month(
    transport: &Transport,
    api: &str,
    username: &str,
    year: i32,
    month: u32,
    mut callback: impl FnMut(Game) -> CallbackResult,
) -> Result<()> {
    let url = archive_url(api, username, year, month);
    let games = fetch_archive(transport, &url).await?;
    let titled = get_all_titled_players(transport, api).await?;

    for game in &games {
        deliver(&mut callback, format::format_game(game, &titled)?)?;
    }

    debug!(count = games.len(), username, year, month, "delivered monthly archive");
    Ok(())
}

fn archive_url(api: &str, username: &str, year: i32, month: u32) -> String {
    format!("{api}/pub/player/{username}/games/{year}/{month:02}")
}

#[instrument(skip(transport))]
pub(crate) async fn get_tournament(transport: &Transport, api: &str, id: &str) -> Result<Tournament> {
    let tournament = fetch_tournament(transport, api, id).await?;
    format::format_tournament(&tournament)
}

async fn fetch_tournament(transport: &Transport, api: &str, id: &str) -> Result<ChesscomTournament> {
    let url = format!("{api}/pub/tournament/{id}");
    transport.get_json(&url).await
}

/// Games of a tournament's first round.
///
/// An arena has a single implicit round; a round-based tournament lists its
/// rounds and the games of round one are read from its first group.
#[instrument(skip(transport, callback))]
pub(crate) async fn get_tournament_games(
    transport: &Transport,
    api: &str,
    id: &str,
    mut callback: impl FnMut(Game) -> CallbackResult,
) -> Result<()> {
    let tournament = fetch_tournament(transport, api, id).await?;
    let round = tournament
        .rounds
        .first()
        .ok_or_else(|| ChessError::MalformedField {
            field: "chess.com tournament rounds",
            value: tournament.url.clone(),
        })?;
    let url = match tournament.settings.kind.as_str() {
        "standard" => round.clone(),
        _ => format!("{round}/1"),
    };

    let titled = get_all_titled_players(transport, api).await?;
    let games = fetch_archive(transport, &url).await?;
    for game in &games {
        deliver(&mut callback, format::format_game(game, &titled)?)?;
    }

    debug!(count = games.len(), id, "delivered tournament games");
    Ok(())
}

/// Look a single game up through the monthly archive it belongs to.
///
/// The website's game detail names the white player and the date, which
/// together locate the archive; the whole archive is then searched for the id.
#[instrument(skip(transport))]
pub(crate) async fn get_game(
    transport: &Transport,
    api: &str,
    web: &str,
    id: &str,
    daily: bool,
) -> Result<Game> {
    let kind = if daily { "daily" } else { "live" };
    let url = format!("{web}/callback/{kind}/game/{id}");
    let detail: ChesscomCallbackGame = transport.get_json(&url).await?;
    let headers = detail.game.pgn_headers;

    let date = NaiveDate::parse_from_str(&headers.date, "%Y.%m.%d").map_err(|_| {
        ChessError::MalformedField {
            field: "chess.com game date",
            value: headers.date.clone(),
        }
    })?;
    let archive = archive_url(api, &headers.white.to_lowercase(), date.year(), date.month());

    let games = fetch_archive(transport, &archive).await?;
    let suffix = format!("/{id}");
    let game = games
        .iter()
        .find(|game| game.url.ends_with(&suffix))
        .ok_or_else(|| ChessError::GameNotInArchive {
            id: id.to_string(),
            archive: archive.clone(),
        })?;

    format::format_game(game, &TitledPlayers::new())
}
