//! Wire shapes of the Chess.com published-data API. Timestamps are epoch seconds.

use std::collections::BTreeMap;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ChesscomPlayer {
    pub url: String,
    pub username: String,
    pub status: String,
    pub title: Option<String>,
    pub name: Option<String>,
    pub location: Option<String>,
    pub joined: Option<i64>,
    pub last_online: Option<i64>,
}

/// `chess_*` buckets are per-speed ratings; other keys (`fide`, `tactics`,
/// `puzzle_rush`, ...) have unrelated shapes.
pub(crate) type ChesscomStats = BTreeMap<String, serde_json::Value>;

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ChesscomPerf {
    pub last: Option<ChesscomPerfLast>,
    #[serde(default)]
    pub record: ChesscomRecord,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub(crate) struct ChesscomPerfLast {
    pub rating: u32,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub(crate) struct ChesscomRecord {
    #[serde(default)]
    pub win: u32,
    #[serde(default)]
    pub loss: u32,
    #[serde(default)]
    pub draw: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ChesscomArchives {
    pub archives: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ChesscomArchive {
    pub games: Vec<ChesscomGame>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ChesscomGame {
    pub url: String,
    #[serde(default)]
    pub pgn: String,
    pub time_control: String,
    pub end_time: i64,
    #[serde(default)]
    pub initial_setup: String,
    pub rules: String,
    pub white: ChesscomGamePlayer,
    pub black: ChesscomGamePlayer,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ChesscomGamePlayer {
    pub username: String,
    pub rating: Option<u32>,
    pub result: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ChesscomTournament {
    pub name: String,
    pub url: String,
    pub status: String,
    pub settings: ChesscomTournamentSettings,
    #[serde(default)]
    pub rounds: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ChesscomTournamentSettings {
    #[serde(rename = "type")]
    pub kind: String,
    pub time_control: String,
    #[serde(default)]
    pub registered_user_count: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ChesscomTitled {
    pub players: Vec<String>,
}

/// The website's game detail callback; only the PGN headers are read.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ChesscomCallbackGame {
    pub game: ChesscomCallbackGameInner,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ChesscomCallbackGameInner {
    pub pgn_headers: ChesscomPgnHeaders,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct ChesscomPgnHeaders {
    pub date: String,
    pub white: String,
}
