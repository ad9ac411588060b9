//! Wire shapes of the Lichess API. Only the fields we read are declared.

use serde::Deserialize;

use crate::model::{Analysis, Color};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LichessUser {
    pub username: String,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub tos_violation: bool,
    pub title: Option<String>,
    pub created_at: Option<i64>,
    pub seen_at: Option<i64>,
    pub url: Option<String>,
    pub profile: Option<LichessUserProfile>,
    #[serde(default)]
    pub perfs: LichessPerfs,
    pub count: Option<LichessCount>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LichessUserProfile {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub real_name: Option<String>,
    pub location: Option<String>,
}

/// Rated speeds only. Puzzle modes (`storm`, `racer`, `streak`) share the
/// map upstream but carry `runs`/`score` instead of a rating.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub(crate) struct LichessPerfs {
    pub bullet: Option<LichessPerf>,
    pub blitz: Option<LichessPerf>,
    pub rapid: Option<LichessPerf>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub(crate) struct LichessPerf {
    pub games: u32,
    pub rating: u32,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub(crate) struct LichessCount {
    #[serde(default)]
    pub all: u64,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub(crate) struct LichessClock {
    #[serde(alias = "limit")]
    pub initial: u32,
    pub increment: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LichessArena {
    pub id: String,
    pub full_name: String,
    pub clock: LichessClock,
    #[serde(default)]
    pub is_finished: bool,
    pub nb_players: u32,
    pub stats: Option<LichessTournamentStats>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LichessSwiss {
    pub id: String,
    pub name: String,
    pub clock: LichessClock,
    pub status: String,
    pub nb_players: u32,
    pub stats: Option<LichessTournamentStats>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub(crate) struct LichessTournamentStats {
    pub games: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LichessGame {
    pub id: String,
    #[serde(default = "standard_variant")]
    pub variant: String,
    pub created_at: i64,
    pub last_move_at: Option<i64>,
    pub status: String,
    pub players: LichessGamePlayers,
    pub winner: Option<Color>,
    pub initial_fen: Option<String>,
    pub moves: Option<String>,
    pub pgn: Option<String>,
    pub clock: Option<LichessClock>,
    pub days_per_turn: Option<u32>,
    pub clocks: Option<Vec<u32>>,
    pub analysis: Option<Vec<Analysis>>,
    pub opening: Option<LichessOpening>,
}

fn standard_variant() -> String {
    "standard".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct LichessGamePlayers {
    pub white: LichessGamePlayer,
    pub black: LichessGamePlayer,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LichessGamePlayer {
    pub user: Option<LichessGameUser>,
    pub rating: Option<u32>,
    pub ai_level: Option<u8>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct LichessGameUser {
    pub name: String,
    pub title: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct LichessOpening {
    #[serde(default)]
    pub eco: String,
    #[serde(default)]
    pub name: String,
}
