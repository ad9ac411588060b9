//! Maps public Lichess and Chess.com URLs to the entity they denote.
//!
//! Matching is purely textual and happens before any request is made.

use crate::error::{ChessError, Result};

const LICHESS_PROFILE: &str = "https://lichess.org/@/";
const LICHESS_ARENA: &str = "https://lichess.org/tournament/";
const LICHESS_SWISS: &str = "https://lichess.org/swiss/";
const LICHESS_TEAM: &str = "https://lichess.org/team/";
const LICHESS_GAME: &str = "https://lichess.org/";
const CHESSCOM_PROFILE: &str = "https://www.chess.com/member/";
const CHESSCOM_TOURNAMENT: &str = "https://www.chess.com/tournament/";
const CHESSCOM_LIVE_GAME: &str = "https://www.chess.com/game/live/";
const CHESSCOM_DAILY_GAME: &str = "https://www.chess.com/game/daily/";

pub(crate) const PLAYER_EXPECTED: &str = "Must specify the URL to a Lichess or Chess.com player profile";
pub(crate) const TEAM_EXPECTED: &str = "Must specify the URL of a Lichess team";
pub(crate) const TOURNAMENT_EXPECTED: &str = "Invalid tournament URL";
pub(crate) const INFO_EXPECTED: &str = "Invalid profile or tournament URL";
pub(crate) const GAME_EXPECTED: &str = "Must specify the URL to a Lichess or Chess.com game";
pub(crate) const GAMES_EXPECTED: &str =
    "Must specify the URL to a Lichess or Chess.com player profile or tournament";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ProfileRoute {
    Lichess(String),
    Chesscom(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TournamentRoute {
    LichessArena(String),
    LichessSwiss(String),
    Chesscom(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum InfoRoute {
    Profile(ProfileRoute),
    Tournament(TournamentRoute),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum GameRoute {
    Lichess(String),
    ChesscomLive(String),
    ChesscomDaily(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum GamesRoute {
    Player(ProfileRoute),
    Tournament(TournamentRoute),
}

pub(crate) fn profile(url: &str) -> Result<ProfileRoute> {
    match_profile(url).ok_or_else(|| invalid(url, PLAYER_EXPECTED))
}

pub(crate) fn team(url: &str) -> Result<String> {
    url.strip_prefix(LICHESS_TEAM)
        .and_then(identifier)
        .ok_or_else(|| invalid(url, TEAM_EXPECTED))
}

pub(crate) fn tournament(url: &str) -> Result<TournamentRoute> {
    match_tournament(url).ok_or_else(|| invalid(url, TOURNAMENT_EXPECTED))
}

pub(crate) fn info(url: &str) -> Result<InfoRoute> {
    match_profile(url)
        .map(InfoRoute::Profile)
        .or_else(|| match_tournament(url).map(InfoRoute::Tournament))
        .ok_or_else(|| invalid(url, INFO_EXPECTED))
}

pub(crate) fn games(url: &str) -> Result<GamesRoute> {
    match_profile(url)
        .map(GamesRoute::Player)
        .or_else(|| match_tournament(url).map(GamesRoute::Tournament))
        .ok_or_else(|| invalid(url, GAMES_EXPECTED))
}

/// Lichess game links carry the id as their first path segment, optionally
/// followed by `/black` and a `#ply` fragment.
pub(crate) fn game(url: &str) -> Result<GameRoute> {
    if let Some(id) = url.strip_prefix(CHESSCOM_LIVE_GAME).and_then(identifier) {
        return Ok(GameRoute::ChesscomLive(id));
    }
    if let Some(id) = url.strip_prefix(CHESSCOM_DAILY_GAME).and_then(identifier) {
        return Ok(GameRoute::ChesscomDaily(id));
    }

    url.strip_prefix(LICHESS_GAME)
        .map(strip_query)
        .and_then(|path| path.split('/').next())
        .filter(|id| !id.is_empty() && !id.starts_with('@'))
        .map(|id| GameRoute::Lichess(id.to_string()))
        .ok_or_else(|| invalid(url, GAME_EXPECTED))
}

fn match_profile(url: &str) -> Option<ProfileRoute> {
    if let Some(username) = url.strip_prefix(LICHESS_PROFILE).and_then(identifier) {
        return Some(ProfileRoute::Lichess(username));
    }
    url.strip_prefix(CHESSCOM_PROFILE)
        .and_then(identifier)
        .map(ProfileRoute::Chesscom)
}

fn match_tournament(url: &str) -> Option<TournamentRoute> {
    if let Some(id) = url.strip_prefix(LICHESS_ARENA).and_then(identifier) {
        return Some(TournamentRoute::LichessArena(id));
    }
    if let Some(id) = url.strip_prefix(LICHESS_SWISS).and_then(identifier) {
        return Some(TournamentRoute::LichessSwiss(id));
    }
    url.strip_prefix(CHESSCOM_TOURNAMENT)
        .and_then(identifier)
        .map(TournamentRoute::Chesscom)
}

/// Last path segment of whatever follows a matched prefix.
fn identifier(rest: &str) -> Option<String> {
    strip_query(rest)
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}

fn strip_query(path: &str) -> &str {
    path.split(['?', '#']).next().unwrap_or(path)
}

fn invalid(url: &str, expected: &'static str) -> ChessError {
    ChessError::InvalidUrl {
        url: url.to_string(),
        expected,
    }
}
